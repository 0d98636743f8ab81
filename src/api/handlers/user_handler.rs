//! User oversight handlers.

use axum::{
    extract::State,
    routing::get,
    Extension, Router,
};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::Envelope;

/// Authenticated user listing routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/deleted", get(deleted))
}

/// List every user with their assigned tasks (admin only)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users with their tasks", body = [crate::services::UserWithTasks]),
        (status = 401, description = "Not permitted")
    )
)]
pub async fn index(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Envelope> {
    let users = state.user_service.list_all(&current.actor()).await?;
    Ok(Envelope::ok("users", users))
}

/// List soft-deleted users (admins and managers)
#[utoipa::path(
    get,
    path = "/api/v1/users/deleted",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Soft-deleted users", body = [crate::domain::UserResponse]),
        (status = 401, description = "Not permitted")
    )
)]
pub async fn deleted(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Envelope> {
    let users = state.user_service.list_deleted(&current.actor()).await?;
    Ok(Envelope::ok("users", users))
}
