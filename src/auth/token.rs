//! Bearer token inspection
//!
//! The client never holds the signing key, so claims are decoded without
//! signature verification. They are only used to cross-check the role that
//! sits in client storage; the backend remains the authority.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Claims the backend embeds in its tokens. All optional: backends differ.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TokenClaims {
    /// Subject (user ID)
    #[serde(default, alias = "id")]
    pub sub: Option<String>,
    /// User role
    #[serde(default)]
    pub role: Option<String>,
    /// Issued at
    #[serde(default)]
    pub iat: Option<i64>,
    /// Expiration time
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Check if token is expired. Tokens without `exp` never expire here.
    pub fn is_expired(&self) -> bool {
        self.exp
            .map(|exp| chrono::Utc::now().timestamp() > exp)
            .unwrap_or(false)
    }

    /// Expiry as a timestamp, for display
    pub fn expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.exp
            .and_then(|exp| chrono::DateTime::<chrono::Utc>::from_timestamp(exp, 0))
    }
}

/// Decode a bearer token's claims without verifying its signature
pub fn inspect_token(token: &str) -> Result<TokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| Error::Token(format!("Unreadable bearer token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn sign(claims: &serde_json::Value) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(b"backend-only-secret"),
        )
        .expect("Failed to create token")
    }

    #[test]
    fn test_inspect_reads_role_and_subject() {
        let token = sign(&serde_json::json!({"id": "u1", "role": "vendor", "iat": 1}));
        let claims = inspect_token(&token).expect("Failed to inspect token");

        assert_eq!(claims.sub.as_deref(), Some("u1"));
        assert_eq!(claims.role.as_deref(), Some("vendor"));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_token_is_still_readable() {
        let token = sign(&serde_json::json!({"sub": "u1", "exp": 1_000}));
        let claims = inspect_token(&token).expect("Failed to inspect token");

        assert!(claims.is_expired());
        assert_eq!(claims.expires_at().map(|t| t.timestamp()), Some(1_000));
    }

    #[test]
    fn test_invalid_token() {
        assert!(inspect_token("not-a-jwt-token").is_err());
        assert!(inspect_token("invalid.token.here").is_err());
    }
}
