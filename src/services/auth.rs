use crate::crypto::password;
use crate::error::{AppError, Result};
use crate::models::user::{NewUser, User};
use crate::repositories::user::UserRepository;

/// The single rejection for any failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Verified against when the email is unknown, so both failures cost one hash.
const DECOY_HASH: &str = "5f0c6a1e9d3b7a24c8e1f0b9d6a3c7e25b8f1d4a9c0e3b6d7f2a5c8e1b4d7f0a";
const DECOY_SALT: &str = "a3f1c9e7b5d3f1a9c7e5b3d1f9a7c5e3";

/// Creates a new user.
///
/// # Arguments
///
/// * `users` - The user store.
/// * `email` - The user's email address.
/// * `name` - The user's display name.
/// * `password` - The user's plaintext password.
///
/// # Returns
///
/// A `Result` containing the created `User`, or a conflict if the email is taken.
pub async fn create_user(
    users: &dyn UserRepository,
    email: String,
    name: String,
    password: String,
) -> Result<User> {
    tracing::debug!("🔐 Creating user: {}", email);

    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let salt = password::generate_salt();
    let hashed_password = password::hash_password(&password, &salt)?;

    users
        .create(NewUser {
            email,
            name,
            password: hashed_password,
            salt,
        })
        .await
}

/// Authenticates a user.
///
/// Unknown emails and wrong passwords fail identically.
///
/// # Arguments
///
/// * `users` - The user store.
/// * `email` - The user's email address.
/// * `password` - The user's plaintext password.
///
/// # Returns
///
/// A `Result` containing the authenticated `User`.
pub async fn authenticate_user(
    users: &dyn UserRepository,
    email: &str,
    password: &str,
) -> Result<User> {
    tracing::debug!("🔐 Authenticating user: {}", email);

    let Some(user) = users.find_by_email(email).await? else {
        password::verify_password(password, DECOY_HASH, DECOY_SALT);
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    };

    if !password::verify_password(password, &user.password, &user.salt) {
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!("✅ User authenticated: {}", user.id);

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_mock::MockUserRepository;

    #[tokio::test]
    async fn created_users_store_a_salted_hash() {
        let users = MockUserRepository::new();
        let user = create_user(&users, "a@b.c".into(), "Ann".into(), "hunter22".into())
            .await
            .unwrap();

        assert_ne!(user.password, "hunter22");
        assert!(!user.salt.is_empty());
        assert!(password::verify_password("hunter22", &user.password, &user.salt));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let users = MockUserRepository::new();
        create_user(&users, "a@b.c".into(), "Ann".into(), "pw".into())
            .await
            .unwrap();

        let err = create_user(&users, "a@b.c".into(), "Bob".into(), "pw2".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(users.count(), 1);
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_fail_alike() {
        let users = MockUserRepository::new();
        create_user(&users, "a@b.c".into(), "Ann".into(), "right".into())
            .await
            .unwrap();

        let wrong = authenticate_user(&users, "a@b.c", "wrong").await.unwrap_err();
        let unknown = authenticate_user(&users, "x@y.z", "right").await.unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn correct_password_authenticates() {
        let users = MockUserRepository::new();
        let created = create_user(&users, "a@b.c".into(), "Ann".into(), "right".into())
            .await
            .unwrap();

        let user = authenticate_user(&users, "a@b.c", "right").await.unwrap();
        assert_eq!(user.id, created.id);
    }
}
