//! Per-route access gate
//!
//! The gate answers one question on every navigation: may the page mount
//! for the session currently in storage? Nothing is cached between calls.
//!
//! In the default [`GateMode::Trusting`] mode the decision rests on key
//! presence and a string comparison of the stored role. That role is
//! client-writable, so a forged value passes the gate; the backend still
//! rejects the bearer token on every request. [`GateMode::Strict`] narrows
//! the gap by cross-checking the role embedded in the token.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::models::Role;
use crate::auth::token::inspect_token;
use crate::session::{Session, SessionStorage, StoredCredentials};

/// Where every denied navigation ends up
pub const AUTH_PATH: &str = "/auth";

/// How much the gate trusts client storage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GateMode {
    /// Presence and role string equality only
    #[default]
    Trusting,
    /// Also require the token's embedded role and expiry to agree
    Strict,
}

/// Why access was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    #[error("no session token")]
    MissingToken,

    #[error("no role stored for the session")]
    MissingRole,

    #[error("no user id stored for the session")]
    MissingUserId,

    #[error("role mismatch, expected {expected} but session is {found}")]
    RoleMismatch { expected: Role, found: String },

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("stored user is a {user} but the session role is {stored}")]
    InconsistentUser { stored: Role, user: Role },

    #[error("token role '{token}' does not match session role {stored}")]
    TokenRoleMismatch { stored: Role, token: String },

    #[error("token expired")]
    TokenExpired,

    #[error("token could not be read")]
    MalformedToken,
}

/// Gate lifecycle. `Checking` resolves immediately to one of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Checking,
    Granted,
    Denied,
}

/// Outcome of one gate evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Granted(Session),
    Denied(DenyReason),
}

impl GateDecision {
    pub fn state(&self) -> GateState {
        match self {
            GateDecision::Granted(_) => GateState::Granted,
            GateDecision::Denied(_) => GateState::Denied,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, GateDecision::Granted(_))
    }

    /// Redirect target for a denied decision
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            GateDecision::Granted(_) => None,
            GateDecision::Denied(_) => Some(AUTH_PATH),
        }
    }

    pub fn into_result(self) -> Result<Session, DenyReason> {
        match self {
            GateDecision::Granted(session) => Ok(session),
            GateDecision::Denied(reason) => Err(reason),
        }
    }
}

/// Evaluates a route's required role against session storage
#[derive(Clone)]
pub struct AuthGate {
    storage: Arc<dyn SessionStorage>,
    mode: GateMode,
}

impl AuthGate {
    pub fn new(storage: Arc<dyn SessionStorage>, mode: GateMode) -> Self {
        Self { storage, mode }
    }

    /// Decide whether a view requiring `required` may render
    pub fn check(&self, required: Option<Role>) -> GateDecision {
        let decision = self.evaluate(required);
        match &decision {
            GateDecision::Granted(session) => {
                debug!(
                    role = %session.role,
                    user_id = %session.user_id,
                    mode = ?self.mode,
                    "Access granted (role read from client storage)"
                );
            }
            GateDecision::Denied(reason) => {
                info!(required = ?required, "Access denied, redirecting to {}: {}", AUTH_PATH, reason);
            }
        }
        decision
    }

    fn evaluate(&self, required: Option<Role>) -> GateDecision {
        let storage = self.storage.as_ref();

        let credentials = match StoredCredentials::read(storage) {
            Ok(credentials) => credentials,
            Err(reason) => return GateDecision::Denied(reason),
        };

        if let Some(required) = required {
            if credentials.role != required.as_str() {
                return GateDecision::Denied(DenyReason::RoleMismatch {
                    expected: required,
                    found: credentials.role,
                });
            }
        }

        let session = match Session::from_credentials(credentials, storage) {
            Ok(session) => session,
            Err(reason) => return GateDecision::Denied(reason),
        };

        if self.mode == GateMode::Strict {
            if let Err(reason) = cross_check_token(&session) {
                return GateDecision::Denied(reason);
            }
        }

        GateDecision::Granted(session)
    }
}

fn cross_check_token(session: &Session) -> Result<(), DenyReason> {
    let claims = inspect_token(&session.token).map_err(|_| DenyReason::MalformedToken)?;

    if claims.is_expired() {
        return Err(DenyReason::TokenExpired);
    }

    match claims.role {
        Some(token_role) if token_role != session.role.as_str() => {
            Err(DenyReason::TokenRoleMismatch {
                stored: session.role,
                token: token_role,
            })
        }
        _ => Ok(()),
    }
}
