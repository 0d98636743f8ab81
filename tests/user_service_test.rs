//! User and authentication service behavior against mocked repositories.

mod common;

use std::sync::Arc;

use mockall::predicate::eq;
use taskdesk::config::Config;
use taskdesk::domain::{Password, Role};
use taskdesk::errors::AppError;
use taskdesk::infra::{MockTaskRepository, MockUserRepository};
use taskdesk::services::{
    AuthService, Authenticator, UserManager, UserService,
};

const TEST_SECRET: &str = "test-secret-key-at-least-32-chars!!";

fn authenticator(users: MockUserRepository) -> Authenticator {
    Authenticator::new(Arc::new(users), Config::with_secret(TEST_SECRET))
}

fn user_service(users: MockUserRepository, tasks: MockTaskRepository) -> UserManager {
    UserManager::new(Arc::new(users), Arc::new(tasks))
}

#[tokio::test]
async fn registration_derives_roles_from_the_email() {
    for (email, expected) in [
        ("alice@admin.co", Some(Role::Admin)),
        ("bob@manager.io", Some(Role::Manager)),
        ("carol@example.com", None),
    ] {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email_with_deleted()
            .returning(|_| Ok(None));
        users
            .expect_create()
            .withf(move |_, _, _, role| *role == expected)
            .returning(|name, email, password_hash, role| {
                let mut user = common::user(7, &email);
                user.name = name;
                user.password_hash = password_hash;
                user.role = role;
                Ok(user)
            });

        let auth = authenticator(users);
        let created = auth
            .register(
                "Someone".to_string(),
                email.to_string(),
                "secret-password".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(created.role, expected);
    }
}

#[tokio::test]
async fn registration_hashes_the_password() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email_with_deleted()
        .returning(|_| Ok(None));
    users
        .expect_create()
        .withf(|_, _, password_hash, _| {
            password_hash.starts_with("$argon2") && !password_hash.contains("secret-password")
        })
        .returning(|name, email, password_hash, role| {
            let mut user = common::user(7, &email);
            user.name = name;
            user.password_hash = password_hash;
            user.role = role;
            Ok(user)
        });

    let auth = authenticator(users);
    auth.register(
        "Someone".to_string(),
        "someone@example.com".to_string(),
        "secret-password".to_string(),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn registration_rejects_emails_reserved_by_tombstones() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email_with_deleted()
        .returning(|email| Ok(Some(common::deleted_user(3, email))));

    let auth = authenticator(users);
    let err = auth
        .register(
            "Someone".to_string(),
            "taken@example.com".to_string(),
            "secret-password".to_string(),
        )
        .await
        .unwrap_err();

    match err {
        AppError::Validation(msg) => assert_eq!(msg, "The email has already been taken"),
        other => panic!("expected Validation, got {:?}", other),
    }
}

#[tokio::test]
async fn login_round_trips_through_token_verification() {
    let hash = Password::new("correct horse battery").unwrap().into_string();
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(move |email| {
        let mut user = common::user(5, email);
        user.password_hash = hash.clone();
        Ok(Some(user))
    });

    let auth = authenticator(users);
    let token = auth
        .login(
            "dana@manager.io".to_string(),
            "correct horse battery".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(token.token_type, "Bearer");

    let claims = auth.verify_token(&token.access_token).unwrap();
    assert_eq!(claims.sub, 5);
    assert_eq!(claims.email, "dana@manager.io");
    assert_eq!(claims.role.as_deref(), Some("manager"));
}

#[tokio::test]
async fn login_rejects_wrong_passwords() {
    let hash = Password::new("the right one").unwrap().into_string();
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(move |email| {
        let mut user = common::user(5, email);
        user.password_hash = hash.clone();
        Ok(Some(user))
    });

    let auth = authenticator(users);
    let err = auth
        .login("dana@example.com".to_string(), "the wrong one".to_string())
        .await
        .unwrap_err();

    match err {
        AppError::Auth(msg) => assert_eq!(msg, "username or password is incorrect"),
        other => panic!("expected Auth, got {:?}", other),
    }
}

#[tokio::test]
async fn login_rejects_unknown_emails_with_the_same_message() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let auth = authenticator(users);
    let err = auth
        .login("ghost@example.com".to_string(), "whatever".to_string())
        .await
        .unwrap_err();

    // Identical message for unknown email and bad password
    match err {
        AppError::Auth(msg) => assert_eq!(msg, "username or password is incorrect"),
        other => panic!("expected Auth, got {:?}", other),
    }
}

#[tokio::test]
async fn refresh_reissues_a_valid_token() {
    let hash = Password::new("correct horse battery").unwrap().into_string();
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(move |email| {
        let mut user = common::user(5, email);
        user.password_hash = hash.clone();
        Ok(Some(user))
    });

    let auth = authenticator(users);
    let token = auth
        .login(
            "dana@manager.io".to_string(),
            "correct horse battery".to_string(),
        )
        .await
        .unwrap();

    let claims = auth.verify_token(&token.access_token).unwrap();
    let refreshed = auth.refresh(&claims).unwrap();
    let new_claims = auth.verify_token(&refreshed.access_token).unwrap();

    assert_eq!(new_claims.sub, claims.sub);
    assert_eq!(new_claims.role, claims.role);
}

#[tokio::test]
async fn verify_rejects_tokens_signed_with_another_secret() {
    let hash = Password::new("correct horse battery").unwrap().into_string();
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(move |email| {
        let mut user = common::user(5, email);
        user.password_hash = hash.clone();
        Ok(Some(user))
    });

    let foreign = Authenticator::new(
        Arc::new(users),
        Config::with_secret("another-secret-key-32-chars-long!!"),
    );
    let token = foreign
        .login(
            "dana@example.com".to_string(),
            "correct horse battery".to_string(),
        )
        .await
        .unwrap();

    let auth = authenticator(MockUserRepository::new());
    assert!(auth.verify_token(&token.access_token).is_err());
}

#[tokio::test]
async fn profile_always_carries_the_role_field() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(3))
        .returning(|id| Ok(Some(common::user(id, "plain@example.com"))));

    let service = user_service(users, MockTaskRepository::new());
    let profile = service.profile(&common::basic_actor(3)).await.unwrap();

    assert_eq!(profile.role, None);
    let rendered = serde_json::to_value(&profile).unwrap();
    // Null, not absent
    assert!(rendered.as_object().unwrap().contains_key("role"));
}

#[tokio::test]
async fn blank_profile_updates_are_no_change() {
    let service = user_service(MockUserRepository::new(), MockTaskRepository::new());

    let err = service
        .update_profile(3, Some("   ".to_string()), Some("".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NoChange));
}

#[tokio::test]
async fn profile_update_rehashes_the_password() {
    let mut users = MockUserRepository::new();
    users
        .expect_update_profile()
        .withf(|id, name, password_hash| {
            *id == 3
                && name.is_none()
                && password_hash
                    .as_deref()
                    .is_some_and(|h| h.starts_with("$argon2"))
        })
        .returning(|id, _, _| Ok(common::user(id, "plain@example.com")));

    let service = user_service(users, MockTaskRepository::new());
    service
        .update_profile(3, None, Some("brand new password".to_string()))
        .await
        .unwrap();
}

#[tokio::test]
async fn restore_refuses_active_users() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email_with_deleted()
        .returning(|email| Ok(Some(common::user(3, email))));

    let service = user_service(users, MockTaskRepository::new());
    let err = service.restore("plain@example.com").await.unwrap_err();

    match err {
        AppError::InvalidState(msg) => assert_eq!(msg, "This user isn't deleted"),
        other => panic!("expected InvalidState, got {:?}", other),
    }
}

#[tokio::test]
async fn restore_brings_back_a_deleted_user() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email_with_deleted()
        .returning(|email| Ok(Some(common::deleted_user(3, email))));
    users
        .expect_restore()
        .with(eq(3))
        .returning(|id| Ok(common::user(id, "plain@example.com")));

    let service = user_service(users, MockTaskRepository::new());
    service.restore("plain@example.com").await.unwrap();
}

#[tokio::test]
async fn restore_reports_unknown_emails_as_not_found() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email_with_deleted()
        .returning(|_| Ok(None));

    let service = user_service(users, MockTaskRepository::new());
    let err = service.restore("ghost@example.com").await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn force_delete_is_admin_only() {
    let service = user_service(MockUserRepository::new(), MockTaskRepository::new());

    let err = service
        .force_delete(&common::manager_actor(), "victim@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::PolicyDenied(_)));
}

#[tokio::test]
async fn force_delete_reaches_soft_deleted_users() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));
    users
        .expect_find_by_email_with_deleted()
        .returning(|email| Ok(Some(common::deleted_user(8, email))));
    users.expect_hard_delete().with(eq(8)).returning(|_| Ok(()));

    let service = user_service(users, MockTaskRepository::new());
    service
        .force_delete(&common::admin_actor(), "victim@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn oversight_listing_is_admin_only() {
    let service = user_service(MockUserRepository::new(), MockTaskRepository::new());

    let err = service
        .list_all(&common::manager_actor())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::PolicyDenied(_)));
}

#[tokio::test]
async fn oversight_listing_joins_each_user_with_their_tasks() {
    let mut users = MockUserRepository::new();
    let mut tasks = MockTaskRepository::new();

    users.expect_list().returning(|| {
        Ok(vec![
            common::user(1, "alice@admin.co"),
            common::user(5, "worker@example.com"),
        ])
    });
    tasks.expect_list_by_assignee().with(eq(1)).returning(|_| Ok(vec![]));
    tasks
        .expect_list_by_assignee()
        .with(eq(5))
        .returning(|id| Ok(vec![common::in_progress_task(40, id)]));

    let service = user_service(users, tasks);
    let listing = service.list_all(&common::admin_actor()).await.unwrap();

    assert_eq!(listing.len(), 2);
    assert!(listing[0].tasks.is_empty());
    assert_eq!(listing[1].tasks.len(), 1);
    assert_eq!(listing[1].tasks[0].id, 40);
}

#[tokio::test]
async fn soft_delete_targets_the_calling_account() {
    let mut users = MockUserRepository::new();
    users.expect_soft_delete().with(eq(3)).returning(|_| Ok(()));

    let service = user_service(users, MockTaskRepository::new());
    service.soft_delete(&common::basic_actor(3)).await.unwrap();
}
