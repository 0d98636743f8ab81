//! Route table.

use axum::{middleware, routing::get, Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::{auth_handler, task_handler, user_handler};
use crate::api::middleware::auth_middleware;
use crate::api::openapi::ApiDoc;
use crate::api::AppState;

/// Build the full application router.
pub fn create_router(state: AppState) -> Router {
    let auth = auth_handler::auth_public_routes().merge(
        auth_handler::auth_protected_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        )),
    );

    let tasks = task_handler::task_public_routes().merge(
        task_handler::task_protected_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        )),
    );

    let users = user_handler::user_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    let api = Router::new()
        .nest("/auth", auth)
        .nest("/tasks", tasks)
        .nest("/users", users);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "msg": "ok",
    }))
}
