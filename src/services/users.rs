//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{RegisterRequest, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate user by username and return a JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let invalid = || AppError::Authentication("Invalid username or password".to_string());

        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&user.password, password)? {
            return Err(invalid());
        }

        let token = UserClaims::for_user(&user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok((token, user))
    }

    /// Register a new, non-admin user
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        if self.repository.users.username_exists(&request.username, None).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let hash = hash_password(&request.password)?;
        self.repository.users.create(&request.username, &hash, false).await
    }

    /// Create the configured admin account if it does not exist yet
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        let (Some(username), Some(password)) = (
            self.config.bootstrap_admin_username.as_deref(),
            self.config.bootstrap_admin_password.as_deref(),
        ) else {
            return Ok(());
        };

        if self.repository.users.username_exists(username, None).await? {
            return Ok(());
        }

        let hash = hash_password(password)?;
        self.repository.users.create(username, &hash, true).await?;
        tracing::warn!(username, "Created bootstrap admin account");
        Ok(())
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Rename a user, keeping usernames unique
    pub async fn update_username(&self, id: i32, username: &str) -> AppResult<User> {
        self.repository.users.get_by_id(id).await?;

        if self.repository.users.username_exists(username, Some(id)).await? {
            return Err(AppError::Conflict("Username already in use".to_string()));
        }

        self.repository.users.update_username(id, username).await
    }

    /// Delete a user other than the caller
    pub async fn delete(&self, id: i32, caller_id: i32) -> AppResult<()> {
        if id == caller_id {
            return Err(AppError::Validation("You cannot delete your own account".to_string()));
        }
        self.repository.users.delete(id).await
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("password123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "password123").unwrap());
        assert!(!verify_password(&hash, "wrongpassword").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_internal_error() {
        assert!(matches!(
            verify_password("plaintext", "plaintext"),
            Err(AppError::Internal(_))
        ));
    }
}
