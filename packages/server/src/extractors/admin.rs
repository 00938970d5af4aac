use axum::{extract::FromRequestParts, http::request::Parts};
use common::integrity::secrets_match;

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the configured `Authorization: Bearer <admin token>`.
///
/// Add this as a handler parameter to guard administrative endpoints. When no
/// admin token is configured every request is refused.
pub struct AdminToken;

impl FromRequestParts<AppState> for AdminToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.admin.token.as_deref() else {
            return Err(AppError::PermissionDenied(
                "Administrative endpoints are disabled".into(),
            ));
        };

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        if !secrets_match(token, expected) {
            return Err(AppError::TokenInvalid);
        }
        Ok(AdminToken)
    }
}
