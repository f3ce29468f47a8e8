use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use validator::Validate;

use crate::{
    auth::{hash_password, verify_password, JwtService},
    errors::{AppError, AppResult},
    models::{
        domain::{User, UserRole},
        dto::{
            request::LoginRequest,
            response::{LoginResponse, UserDto},
        },
    },
    repositories::UserRepository,
};

pub struct AuthService {
    repository: Arc<dyn UserRepository>,
    jwt_service: JwtService,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(repository: Arc<dyn UserRepository>, jwt_service: JwtService, bcrypt_cost: u32) -> Self {
        Self {
            repository,
            jwt_service,
            bcrypt_cost,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request
            .validate()
            .map_err(|_| AppError::ValidationError("Email and password are required".to_string()))?;

        let email = request.email.unwrap_or_default();
        let password = request.password.unwrap_or_default();

        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(&password, &user.password_hash) {
            log::info!("Failed login attempt for {}", email);
            return Err(invalid_credentials());
        }

        let token = self.jwt_service.create_token(&user)?;
        log::info!("User {} logged in as {}", user.id, user.role);

        Ok(LoginResponse {
            token,
            user: UserDto::from(user),
        })
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
        role: UserRole,
    ) -> AppResult<UserDto> {
        let password_hash = hash_password(password.expose_secret(), self.bcrypt_cost)?;
        let user = self
            .repository
            .create(User::new(name, email, password_hash, role))
            .await?;
        Ok(UserDto::from(user))
    }

    /// Creates the configured admin account when no users exist yet.
    pub async fn seed_admin(&self, email: &str, password: &SecretString) -> AppResult<bool> {
        if self.repository.count().await? > 0 {
            return Ok(false);
        }

        self.register("Administrator", email, password, UserRole::Admin)
            .await?;
        log::warn!("Seeded admin account {}; change its password after first login", email);
        Ok(true)
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}
