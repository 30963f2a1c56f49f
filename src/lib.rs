//! Storedesk - role-gated console for a multi-vendor e-commerce backend
//!
//! This is the library interface for Storedesk: the session store, the
//! per-route auth gate, the role router and the REST client.

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod router;
pub mod session;

pub use auth::{AuthGate, GateDecision, GateMode, Role};
pub use client::{ApiClient, ApiResponse, Resource};
pub use config::Config;
pub use error::{Error, Result};
pub use router::{Navigation, Navigator, RouteTable};
pub use session::{Session, SessionContext, SessionStorage};
