//! HTTP surface tests: routing, envelopes and status codes.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use mockall::predicate::eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use taskdesk::api::{create_router, AppState};
use taskdesk::config::Config;
use taskdesk::domain::{Password, Role};
use taskdesk::infra::{MockTaskRepository, MockUserRepository};
use taskdesk::services::{Claims, TaskManager, UserManager};
use taskdesk::services::Authenticator;

const TEST_SECRET: &str = "test-secret-key-at-least-32-chars!!";

fn app(users: MockUserRepository, tasks: MockTaskRepository) -> axum::Router {
    let users = Arc::new(users);
    let tasks = Arc::new(tasks);

    let state = AppState::new(
        Arc::new(Authenticator::new(
            users.clone(),
            Config::with_secret(TEST_SECRET),
        )),
        Arc::new(UserManager::new(users.clone(), tasks.clone())),
        Arc::new(TaskManager::new(tasks, users)),
    );
    create_router(state)
}

fn token_for(id: i64, email: &str, role: Option<&str>) -> String {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: id,
        email: email.to_string(),
        role: role.map(String::from),
        exp: (now + chrono::Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn put_json(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = app(MockUserRepository::new(), MockTaskRepository::new());

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn register_reports_the_assigned_role() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email_with_deleted()
        .returning(|_| Ok(None));
    users
        .expect_create()
        .returning(|name, email, password_hash, role| {
            let mut user = common::user(1, &email);
            user.name = name;
            user.password_hash = password_hash;
            user.role = role;
            Ok(user)
        });

    let app = app(users, MockTaskRepository::new());
    let response = app
        .oneshot(post_json(
            "/api/v1/auth/users",
            None,
            json!({
                "name": "Alice",
                "email": "alice@admin.co",
                "password": "secret-password"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["msg"], "Registration successful as admin");
}

#[tokio::test]
async fn register_renders_field_errors() {
    let app = app(MockUserRepository::new(), MockTaskRepository::new());

    let response = app
        .oneshot(post_json(
            "/api/v1/auth/users",
            None,
            json!({
                "name": "Alice",
                "email": "not-an-email",
                "password": "short"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    let errors = body["errors"].as_object().unwrap();
    assert!(errors.contains_key("email"));
    assert!(errors.contains_key("password"));
}

#[tokio::test]
async fn login_yields_a_usable_token() {
    let hash = Password::new("correct horse battery").unwrap().into_string();
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(move |email| {
        let mut user = common::user(5, email);
        user.password_hash = hash.clone();
        Ok(Some(user))
    });
    users
        .expect_find_by_id()
        .with(eq(5))
        .returning(|id| Ok(Some(common::user(id, "dana@example.com"))));

    let app = app(users, MockTaskRepository::new());

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/login",
            None,
            json!({ "email": "dana@example.com", "password": "correct horse battery" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let token = body["token"]["access_token"].as_str().unwrap().to_string();

    let response = app
        .oneshot(get_authed("/api/v1/auth/user/profile", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["profile"]["id"], 5);
    // Role is present and null for basic users
    assert!(body["profile"].as_object().unwrap().contains_key("role"));
    assert_eq!(body["profile"]["role"], Value::Null);
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let app = app(users, MockTaskRepository::new());
    let response = app
        .oneshot(post_json(
            "/api/v1/auth/login",
            None,
            json!({ "email": "ghost@example.com", "password": "whatever" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["msg"], "username or password is incorrect");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = app(MockUserRepository::new(), MockTaskRepository::new());

    let response = app.oneshot(get("/api/v1/tasks/my")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn garbage_tokens_are_rejected() {
    let app = app(MockUserRepository::new(), MockTaskRepository::new());

    let response = app
        .oneshot(get_authed("/api/v1/tasks/my", "not-a-jwt"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn task_listing_is_public_and_enveloped() {
    let mut tasks = MockTaskRepository::new();
    tasks
        .expect_list()
        .returning(|_| Ok(vec![common::pending_task(1, Role::Manager)]));

    let app = app(MockUserRepository::new(), tasks);
    let response = app.oneshot(get("/api/v1/tasks")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // Success flag plus exactly one payload key
    let keys = body.as_object().unwrap();
    assert_eq!(keys.len(), 2);
    assert_eq!(body["success"], true);
    assert_eq!(body["tasks"][0]["status"], "pending");
}

#[tokio::test]
async fn task_filters_are_validated() {
    let app = app(MockUserRepository::new(), MockTaskRepository::new());

    let response = app
        .clone()
        .oneshot(get("/api/v1/tasks?status=cancelled"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app.oneshot(get("/api/v1/tasks?priority=11")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn missing_task_is_not_found() {
    let mut tasks = MockTaskRepository::new();
    tasks.expect_find_by_id().returning(|_| Ok(None));

    let app = app(MockUserRepository::new(), tasks);
    let response = app.oneshot(get("/api/v1/tasks/99")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["msg"], "Task not found");
}

#[tokio::test]
async fn basic_users_cannot_create_tasks() {
    let app = app(MockUserRepository::new(), MockTaskRepository::new());
    let token = token_for(5, "worker@example.com", None);

    let response = app
        .oneshot(post_json(
            "/api/v1/tasks",
            Some(&token),
            json!({ "title": "Nope", "description": "Not allowed", "priority": 1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn task_creation_returns_the_new_task() {
    let mut tasks = MockTaskRepository::new();
    tasks
        .expect_create()
        .returning(|title, description, priority, created_by| {
            let mut task = common::pending_task(7, created_by);
            task.title = title;
            task.description = description;
            task.priority = priority;
            Ok(task)
        });

    let app = app(MockUserRepository::new(), tasks);
    let token = token_for(1, "alice@admin.co", Some("admin"));

    let response = app
        .oneshot(post_json(
            "/api/v1/tasks",
            Some(&token),
            json!({ "title": "Ship it", "description": "Cut the release", "priority": 8 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["task"]["title"], "Ship it");
    assert_eq!(body["task"]["created_by"], "admin");
    assert_eq!(body["task"]["status"], "pending");
}

#[tokio::test]
async fn assign_endpoint_moves_the_task_to_in_progress() {
    let mut tasks = MockTaskRepository::new();
    let mut users = MockUserRepository::new();

    tasks
        .expect_find_by_id()
        .with(eq(1))
        .returning(|id| Ok(Some(common::pending_task(id, Role::Manager))));
    users
        .expect_find_by_id()
        .with(eq(10))
        .returning(|id| Ok(Some(common::user(id, "worker@example.com"))));
    tasks
        .expect_assign()
        .returning(|id, user_id, _| Ok(common::in_progress_task(id, user_id)));

    let app = app(users, tasks);
    let token = token_for(2, "boss@manager.io", Some("manager"));

    let response = app
        .oneshot(post_json(
            "/api/v1/tasks/1/assign",
            Some(&token),
            json!({ "assign_to": 10, "due_date": "25-12-2099 14:00" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["task"]["status"], "in-progress");
    assert_eq!(body["task"]["due_date"], "25-12-2099 14:00");
}

#[tokio::test]
async fn past_due_dates_are_a_bad_request() {
    let mut tasks = MockTaskRepository::new();
    let mut users = MockUserRepository::new();

    tasks
        .expect_find_by_id()
        .returning(|id| Ok(Some(common::pending_task(id, Role::Manager))));
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(common::user(id, "worker@example.com"))));

    let app = app(users, tasks);
    let token = token_for(2, "boss@manager.io", Some("manager"));

    let response = app
        .oneshot(post_json(
            "/api/v1/tasks/1/assign",
            Some(&token),
            json!({ "assign_to": 10, "due_date": "01-01-2020 09:30" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["msg"], "Due date must be a future date");
}

#[tokio::test]
async fn empty_task_updates_map_to_not_found_data() {
    let mut tasks = MockTaskRepository::new();
    tasks
        .expect_find_by_id()
        .returning(|id| Ok(Some(common::pending_task(id, Role::Admin))));

    let app = app(MockUserRepository::new(), tasks);
    let token = token_for(1, "alice@admin.co", Some("admin"));

    let response = app
        .oneshot(put_json("/api/v1/tasks/1", &token, json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["msg"], "Not Found Data in Request");
}

#[tokio::test]
async fn oversight_listing_is_admin_only_over_http() {
    let app = app(MockUserRepository::new(), MockTaskRepository::new());
    let token = token_for(2, "boss@manager.io", Some("manager"));

    let response = app
        .oneshot(get_authed("/api/v1/users", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_answers_a_plain_message() {
    let app = app(MockUserRepository::new(), MockTaskRepository::new());
    let token = token_for(5, "worker@example.com", None);

    let response = app
        .oneshot(post_json("/api/v1/auth/logout", Some(&token), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["msg"], "User logged out successfully");
}
