//! Authentication service: registration, login, and profile lookup.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use nimbus_auth::jwt::JwtEncoder;
use nimbus_auth::password::{PasswordHasher, PasswordValidator};
use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_database::repositories::user::UserRepository;
use nimbus_entity::user::model::{CreateUser, User};

/// Registration parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    /// Email address, used as the login name.
    pub email: String,
    /// Plain password, validated and hashed before storage.
    pub password: String,
    /// Optional display name.
    pub display_name: Option<String>,
}

/// Login parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    /// Email address.
    pub email: String,
    /// Plain password.
    pub password: String,
}

/// A successful authentication result.
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    /// Signed JWT access token.
    pub access_token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// The authenticated user.
    pub user: User,
}

/// Handles account registration and credential verification.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    hasher: Arc<PasswordHasher>,
    password_validator: PasswordValidator,
    jwt_encoder: JwtEncoder,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: UserRepository,
        hasher: Arc<PasswordHasher>,
        password_validator: PasswordValidator,
        jwt_encoder: JwtEncoder,
    ) -> Self {
        Self {
            users,
            hasher,
            password_validator,
            jwt_encoder,
        }
    }

    /// Register a new account.
    pub async fn register(&self, input: RegisterInput) -> AppResult<User> {
        if !input.email.validate_email() {
            return Err(AppError::validation("Invalid email address"));
        }
        self.password_validator.validate(&input.password)?;

        let password_hash = self.hasher.hash_password(&input.password)?;
        let user = self
            .users
            .create(&CreateUser {
                email: input.email.to_lowercase(),
                password_hash,
                display_name: input.display_name,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// login endpoint does not disclose which emails are registered.
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthTokens> {
        let invalid = || AppError::authentication("Invalid email or password");

        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or_else(invalid)?;

        if !self
            .hasher
            .verify_password(&input.password, &user.password_hash)?
        {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(invalid());
        }

        self.users.touch_last_login(user.id).await?;
        let (access_token, expires_at) = self
            .jwt_encoder
            .generate_access_token(user.id, &user.email)?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthTokens {
            access_token,
            expires_at,
            user,
        })
    }

    /// Fetch the profile of an authenticated user.
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}
