//! Authentication service.
//!
//! Username/password accounts with Argon2id hashes stored as PHC strings.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use lumina_core::{Email, UserId, Username};

use crate::db::RepositoryError;
use crate::db::users::{EMAIL_CONSTRAINT, NewUser, UserRepository};
use crate::models::ValidationErrors;
use crate::models::user::{RegisterRequest, User, clean_name};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length, bounding hashing cost.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Hash checked when the username is unknown, so a failed login costs one
/// Argon2 verification either way.
static DUMMY_PASSWORD_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("lumina-unknown-user").ok());

/// Authentication service.
///
/// Handles registration, login and the admin flag.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` listing every invalid field.
    /// Returns `AuthError::UsernameTaken` / `AuthError::EmailTaken` on duplicates.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        self.create_user(request, false).await
    }

    /// Create an account with an explicit admin flag.
    ///
    /// Applies the same validation and hashing as [`register`](Self::register).
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub async fn create_user(
        &self,
        request: &RegisterRequest,
        is_admin: bool,
    ) -> Result<User, AuthError> {
        let (username, email) = validate_registration(request)?;
        let password_hash = hash_password(&request.password)?;
        let first_name = clean_name(request.first_name.as_deref());
        let last_name = clean_name(request.last_name.as_deref());

        let user = self
            .users
            .create(&NewUser {
                username: &username,
                email: &email,
                password_hash: &password_hash,
                first_name: first_name.as_deref(),
                last_name: last_name.as_deref(),
                is_admin,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(constraint) if constraint == EMAIL_CONSTRAINT => {
                    AuthError::EmailTaken
                }
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, is_admin, "User created");
        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let Some((user, password_hash)) = self.users.get_password_hash(username.trim()).await?
        else {
            verify_unknown_user(password);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Load a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn user(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.get_by_id(id).await?)
    }

    /// All accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.users.list().await?)
    }

    /// Grant or revoke admin access.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn set_admin(&self, id: UserId, is_admin: bool) -> Result<User, AuthError> {
        let user = self
            .users
            .set_admin(id, is_admin)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, is_admin, "Admin flag changed");
        Ok(user)
    }

    /// [`set_admin`](Self::set_admin) by username.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no user has that name.
    pub async fn set_admin_by_username(
        &self,
        username: &str,
        is_admin: bool,
    ) -> Result<User, AuthError> {
        let user = self
            .users
            .get_by_username(username.trim())
            .await?
            .ok_or(AuthError::UserNotFound)?;
        self.set_admin(user.id, is_admin).await
    }
}

/// Validate the registration fields, collecting every problem.
fn validate_registration(request: &RegisterRequest) -> Result<(Username, Email), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let username = Username::parse(&request.username)
        .map_err(|e| errors.add("username", e.to_string()))
        .ok();
    let email = Email::parse(&request.email)
        .map_err(|e| errors.add("email", e.to_string()))
        .ok();
    if let Err(message) = validate_password(&request.password) {
        errors.add("password", message);
    }

    match (username, email) {
        (Some(username), Some(email)) => errors.into_result((username, email)),
        _ => Err(errors),
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), String> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "password must be at most {MAX_PASSWORD_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Spend the same Argon2 work as a real check; the result is discarded.
fn verify_unknown_user(password: &str) {
    if let Some(hash) = DUMMY_PASSWORD_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_owned(),
            password: password.to_owned(),
            email: email.to_owned(),
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("warm-white-2700k").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("warm-white-2700k", &hash).is_ok());
        assert!(matches!(
            verify_password("cool-white-6500k", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unparseable_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "plaintext-from-somewhere"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_dummy_hash_is_real_argon2() {
        let hash = DUMMY_PASSWORD_HASH.as_deref().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordHash::new(hash).is_ok());
        assert!(verify_password("warm-white-2700k", hash).is_err());
        verify_unknown_user("warm-white-2700k");
    }

    #[test]
    fn test_validate_registration_ok() {
        let (username, email) =
            validate_registration(&request("ada", "Ada@Example.com", "longenough")).unwrap();
        assert_eq!(username.as_str(), "ada");
        assert_eq!(email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_validate_registration_collects_errors() {
        let errors = validate_registration(&request("a", "nope", "short")).unwrap_err();
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn test_password_bounds() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }
}
