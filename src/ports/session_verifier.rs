//! Session verification port.
//!
//! The identity provider owns authentication; this port only turns a
//! bearer token into a user id.

use async_trait::async_trait;

use crate::domain::foundation::UserId;

/// Errors from session verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Token is malformed, has a bad signature, or is expired.
    InvalidToken(String),
}

impl AuthError {
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        AuthError::InvalidToken(reason.into())
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidToken(reason) => write!(f, "Invalid session token: {}", reason),
        }
    }
}

impl std::error::Error for AuthError {}

/// Port resolving the acting user from a session token.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Verify the token and return the authenticated user id.
    async fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}
