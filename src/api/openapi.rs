//! OpenAPI document.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, task_handler, user_handler};
use crate::domain::{Role, TaskResponse, TaskStatus, UserResponse};
use crate::services::{TokenResponse, UserWithTasks};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "TaskDesk API",
        description = "Role-based task management API"
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::refresh,
        auth_handler::logout,
        auth_handler::profile,
        auth_handler::update_profile,
        auth_handler::delete_user,
        auth_handler::restore_user,
        auth_handler::force_delete_user,
        user_handler::index,
        user_handler::deleted,
        task_handler::index,
        task_handler::show,
        task_handler::my_tasks,
        task_handler::store,
        task_handler::update,
        task_handler::destroy,
        task_handler::deleted,
        task_handler::restore,
        task_handler::force_destroy,
        task_handler::assign,
        task_handler::delivery,
    ),
    components(schemas(
        auth_handler::RegisterRequest,
        auth_handler::LoginRequest,
        auth_handler::UpdateProfileRequest,
        auth_handler::UserByEmailRequest,
        task_handler::StoreTaskRequest,
        task_handler::UpdateTaskRequest,
        task_handler::AssignTaskRequest,
        Role,
        TaskStatus,
        TaskResponse,
        UserResponse,
        UserWithTasks,
        TokenResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and account lifecycle"),
        (name = "Users", description = "User oversight"),
        (name = "Tasks", description = "Task lifecycle")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
