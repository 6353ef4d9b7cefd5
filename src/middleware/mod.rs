use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Role;
use crate::AppState;

/// Identity resolved from the bearer credential. Extracting this on a
/// handler is what gates it: absence or an invalid token rejects the
/// request before any seat or booking logic runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Pull the opaque token out of the request headers. The web client
/// sends both `Authorization: Bearer <t>` and `X-Auth-Token: <t>`; the
/// bearer header wins when present.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let from_auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    from_auth.or_else(|| {
        headers
            .get("x-auth-token")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    })
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthenticated)?;
        let user = state.auth.resolve(&token)?;
        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
            role: user.role,
        })
    }
}
