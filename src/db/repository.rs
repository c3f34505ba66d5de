//! User repository.
//!
//! Account management lives outside this crate; the repository only offers
//! what correspondences need: identity lookup, plus creation for seeding.

use super::user::{NewUser, User};
use super::DbPool;
use crate::{Result, SocialError};

/// Repository for user lookups.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user and return it with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (first_name, second_name, email) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_user.first_name)
        .bind(&new_user.second_name)
        .bind(&new_user.email)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| SocialError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, first_name, second_name, email, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by ID, failing with NotFound when absent.
    pub async fn require(&self, id: i64) -> Result<User> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| SocialError::NotFound("user".to_string()))
    }

    /// List all users ordered by ID.
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, first_name, second_name, email, created_at FROM users ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
