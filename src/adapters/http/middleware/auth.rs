//! Request authentication.
//!
//! Extracts the acting user from the `Authorization: Bearer <token>`
//! header via the configured session verifier.

use crate::domain::foundation::UserId;
use crate::ports::AuthError;

use super::super::error::ApiError;
use super::super::state::AppState;

/// Authenticated user context extracted from the request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

impl axum::extract::FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        state: &'life1 AppState,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = parts
                .headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or_else(|| {
                    ApiError::Unauthenticated(AuthError::invalid_token("missing bearer token"))
                })?;

            let user_id = state.sessions.verify(token).await?;
            Ok(AuthenticatedUser { user_id })
        })
    }
}
