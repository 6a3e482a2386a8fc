use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;

use crate::{
    error::{AppError, Result},
    models::user::{NewUser, User},
};

/// Storage for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Inserts a new user.
    ///
    /// Fails with [`AppError::Conflict`] when the email is already taken.
    async fn create(&self, new_user: NewUser) -> Result<User>;
}

/// A [`UserRepository`] over the `users` table.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool,
}

impl PgUserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, email, name, password, salt, created_at
                FROM users
                WHERE email = $1
                "#,
                &[&email],
            )
            .await?;
        row.as_ref().map(User::try_from).transpose()
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO users (email, name, password, salt)
                VALUES ($1, $2, $3, $4)
                RETURNING id, email, name, password, salt, created_at
                "#,
                &[&new_user.email, &new_user.name, &new_user.password, &new_user.salt],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    AppError::Conflict("User with this email already exists".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;

        let user = User::try_from(&row)?;
        tracing::info!("✅ User created with ID: {}", user.id);
        Ok(user)
    }
}
