//! Static session verifier for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::ports::{AuthError, SessionVerifier};

/// Verifier backed by a fixed token → user table.
#[derive(Default)]
pub struct StaticSessionVerifier {
    sessions: Mutex<HashMap<String, UserId>>,
}

impl StaticSessionVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token as a session for the given user.
    pub fn with_session(self, token: &str, user_id: UserId) -> Self {
        self.sessions
            .lock()
            .unwrap()
            .insert(token.to_string(), user_id);
        self
    }
}

#[async_trait]
impl SessionVerifier for StaticSessionVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        self.sessions
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::invalid_token("unknown session"))
    }
}
