//! Authentication models and the route access gate

pub mod gate;
pub mod models;
pub mod token;

pub use gate::{AuthGate, DenyReason, GateDecision, GateMode, GateState, AUTH_PATH};
pub use models::{LoginRequest, LoginResponse, RegisterRequest, Role, User};
pub use token::{inspect_token, TokenClaims};
