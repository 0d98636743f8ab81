//! Authentication and account lifecycle handlers.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::Envelope;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Email address; `@admin`/`@manager` patterns assign a role
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile update request; absent or blank fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// Restore / force-delete target, addressed by email
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserByEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Public authentication routes
pub fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/login", post(login))
}

/// Authenticated account routes
pub fn auth_protected_routes() -> Router<AppState> {
    Router::new()
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/user/profile", get(profile))
        .route("/users/:id", put(update_profile))
        .route("/user/delete", delete(delete_user))
        .route("/user/restore", post(restore_user))
        .route("/user/force-delete", delete(force_delete_user))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/users",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered; message names the assigned role"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Envelope> {
    let user = state
        .auth_service
        .register(payload.name, payload.email, payload.password)
        .await?;

    let message = match user.role {
        Some(role) => format!("Registration successful as {}", role),
        None => "User registered successfully".to_string(),
    };
    Ok(Envelope::created("msg", message))
}

/// Login and get a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = crate::services::TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Envelope> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;
    Ok(Envelope::ok("token", token))
}

/// Issue a fresh token for the current caller
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "New token issued"))
)]
pub async fn refresh(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Envelope> {
    let token = state.auth_service.refresh(&current.claims)?;
    Ok(Envelope::ok("token", token))
}

/// Log out.
///
/// Tokens are stateless; the client discards its copy.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Logged out"))
)]
pub async fn logout(Extension(_current): Extension<CurrentUser>) -> Envelope {
    Envelope::msg("User logged out successfully")
}

/// Current caller's profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/user/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Profile data", body = crate::domain::UserResponse))
)]
pub async fn profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Envelope> {
    let profile = state.user_service.profile(&current.actor()).await?;
    Ok(Envelope::ok("profile", profile))
}

/// Update a user's profile (name and/or password)
#[utoipa::path(
    put,
    path = "/api/v1/auth/users/{id}",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 404, description = "No data in request or user missing")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(_current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Envelope> {
    state
        .user_service
        .update_profile(id, payload.name, payload.password)
        .await?;
    Ok(Envelope::msg("User updated profile successfully"))
}

/// Soft delete the caller's own account
#[utoipa::path(
    delete,
    path = "/api/v1/auth/user/delete",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Account soft-deleted"))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Envelope> {
    state.user_service.soft_delete(&current.actor()).await?;
    Ok(Envelope::msg("User deleted successfully"))
}

/// Restore a soft-deleted user by email
#[utoipa::path(
    post,
    path = "/api/v1/auth/user/restore",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UserByEmailRequest,
    responses(
        (status = 200, description = "User restored"),
        (status = 400, description = "User is not deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn restore_user(
    State(state): State<AppState>,
    Extension(_current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UserByEmailRequest>,
) -> AppResult<Envelope> {
    state.user_service.restore(&payload.email).await?;
    Ok(Envelope::msg("User restored successfully"))
}

/// Permanently delete a user by email (admin only)
#[utoipa::path(
    delete,
    path = "/api/v1/auth/user/force-delete",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UserByEmailRequest,
    responses(
        (status = 200, description = "User permanently deleted"),
        (status = 401, description = "Not permitted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn force_delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UserByEmailRequest>,
) -> AppResult<Envelope> {
    state
        .user_service
        .force_delete(&current.actor(), &payload.email)
        .await?;
    Ok(Envelope::msg("Deleted user permanently"))
}
