//! Authentication service - registration, login and token handling.
//!
//! Role assignment happens here exactly once, at registration, derived
//! from the email pattern. The rest of the application only consumes
//! the authenticated actor the middleware extracts from a token.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, Role, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiration time in seconds
    pub expires_in: i64,
}

/// Authentication operations.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user, deriving the role from the email pattern.
    ///
    /// Returns the created user; its `role` feeds the role-aware
    /// welcome message.
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User>;

    /// Verify credentials and return a bearer token.
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Issue a fresh token for an already-authenticated caller.
    fn refresh(&self, claims: &Claims) -> AppResult<TokenResponse>;

    /// Verify a JWT token and extract its claims.
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(
    sub: i64,
    email: &str,
    role: Option<Role>,
    config: &Config,
) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub,
        email: email.to_string(),
        role: role.map(|r| r.as_str().to_string()),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Concrete implementation of [`AuthService`].
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User> {
        // Email uniqueness spans soft-deleted rows: restore is an email
        // lookup, so a tombstoned address stays reserved.
        if self
            .users
            .find_by_email_with_deleted(&email)
            .await?
            .is_some()
        {
            return Err(AppError::validation("The email has already been taken"));
        }

        let role = Role::from_email(&email);
        let password_hash = Password::new(&password)?.into_string();

        let user = self
            .users
            .create(name, email, password_hash, role)
            .await?;
        tracing::info!(user_id = user.id, role = ?user.role, "user registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user_result = self.users.find_by_email(&email).await?;

        // Verify against a dummy hash when the user is missing, so the
        // response time does not enumerate valid emails.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";
        let password_hash = user_result
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(dummy_hash);

        let password_valid = Password::from_hash(password_hash.to_string()).verify(&password);

        match user_result {
            Some(user) if password_valid => {
                generate_token(user.id, &user.email, user.role, &self.config)
            }
            _ => Err(AppError::auth("username or password is incorrect")),
        }
    }

    fn refresh(&self, claims: &Claims) -> AppResult<TokenResponse> {
        let role = match claims.role.as_deref() {
            Some(s) => Some(
                Role::parse(s).ok_or_else(|| AppError::auth("Invalid or expired token"))?,
            ),
            None => None,
        };
        generate_token(claims.sub, &claims.email, role, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
