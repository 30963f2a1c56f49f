//! Error types for Storedesk

use thiserror::Error;

use crate::auth::DenyReason;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'storedesk init' first.")]
    ConfigNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request never produced a response (connection refused, DNS, TLS...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    /// The backend answered `success: false`
    #[error("{0}")]
    Business(String),

    /// The session is missing or does not satisfy the route's role
    #[error("Access denied: {0}")]
    Session(DenyReason),

    #[error("Unknown user role '{0}'")]
    UnknownRole(String),

    #[error("Invalid token: {0}")]
    Token(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A record id that cannot stand as a single URL path segment
    #[error("Invalid record id '{0}'")]
    InvalidId(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<DenyReason> for Error {
    fn from(reason: DenyReason) -> Self {
        Error::Session(reason)
    }
}

impl Error {
    /// Whether this error means the user has to log in again
    pub fn requires_login(&self) -> bool {
        match self {
            Error::Session(_) => true,
            Error::Status { status, .. } => *status == 401,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
