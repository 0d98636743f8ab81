//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{Actor, Role};
use crate::errors::AppError;
use crate::services::Claims;

/// Authenticated user extracted from the JWT token.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub role: Option<Role>,
    /// Raw claims, kept for token refresh.
    pub claims: Claims,
}

impl CurrentUser {
    /// Policy-engine view of this caller.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
        }
    }
}

/// Extracts and validates the bearer token, then injects the
/// [`CurrentUser`] into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::auth("Authentication required"))?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or_else(|| AppError::auth("Authentication required"))?;

    let claims = state.auth_service.verify_token(token)?;

    let role = match claims.role.as_deref() {
        Some(s) => Some(Role::parse(s).ok_or_else(|| AppError::auth("Invalid or expired token"))?),
        None => None,
    };

    let current_user = CurrentUser {
        id: claims.sub,
        email: claims.email.clone(),
        role,
        claims,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
