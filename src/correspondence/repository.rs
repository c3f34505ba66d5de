//! Correspondence repository.

use sqlx::SqliteConnection;

use super::types::{Correspondence, NewCorrespondence};
use crate::db::{DbPool, UserPreview};
use crate::{Result, SocialError};

/// Map a foreign key failure on a correspondence child row to NotFound.
///
/// Raised when the correspondence is deleted between the caller's check and
/// the write.
pub(super) fn missing_correspondence(e: sqlx::Error) -> SocialError {
    match e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            SocialError::NotFound("correspondence".to_string())
        }
        other => other.into(),
    }
}

/// Repository for correspondences and their member sets.
pub struct CorrespondenceRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> CorrespondenceRepository<'a> {
    /// Create a new CorrespondenceRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a correspondence with its members and return it with the assigned ID.
    pub async fn create(&self, new: &NewCorrespondence) -> Result<Correspondence> {
        let mut tx = self.pool.begin().await?;
        let id = Self::insert(&mut tx, new).await?;
        tx.commit().await?;

        self.require(id).await
    }

    /// Insert a correspondence and its member rows on an existing connection.
    ///
    /// Used by callers that need the insert to share a transaction with other
    /// writes. Returns the new correspondence ID.
    pub async fn insert(conn: &mut SqliteConnection, new: &NewCorrespondence) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO correspondences (name, admin_id) VALUES (?, ?) RETURNING id",
        )
        .bind(&new.name)
        .bind(new.admin_id)
        .fetch_one(&mut *conn)
        .await?;

        for user_id in &new.member_ids {
            sqlx::query(
                "INSERT INTO correspondence_members (correspondence_id, user_id) VALUES (?, ?)",
            )
            .bind(id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;
        }

        Ok(id)
    }

    /// Get a correspondence by ID, including admin and members.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Correspondence>> {
        let row = sqlx::query_as::<_, CorrespondenceRow>(
            r#"
            SELECT c.id, c.name, c.admin_id,
                   u.first_name AS admin_first_name, u.second_name AS admin_second_name
            FROM correspondences c
            JOIN users u ON u.id = c.admin_id
            WHERE c.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let members = self.members(row.id).await?;
                Ok(Some(row.into_correspondence(members)))
            }
            None => Ok(None),
        }
    }

    async fn require(&self, id: i64) -> Result<Correspondence> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| SocialError::NotFound("correspondence".to_string()))
    }

    /// List the members of a correspondence in join order.
    pub async fn members(&self, correspondence_id: i64) -> Result<Vec<UserPreview>> {
        let members = sqlx::query_as::<_, UserPreview>(
            r#"
            SELECT u.id, u.first_name, u.second_name
            FROM correspondence_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.correspondence_id = ?
            ORDER BY m.rowid
            "#,
        )
        .bind(correspondence_id)
        .fetch_all(self.pool)
        .await?;

        Ok(members)
    }

    /// List all correspondences the user is currently a member of, oldest first.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Correspondence>> {
        let rows = sqlx::query_as::<_, CorrespondenceRow>(
            r#"
            SELECT c.id, c.name, c.admin_id,
                   u.first_name AS admin_first_name, u.second_name AS admin_second_name
            FROM correspondences c
            JOIN correspondence_members m ON m.correspondence_id = c.id
            JOIN users u ON u.id = c.admin_id
            WHERE m.user_id = ?
            ORDER BY c.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut correspondences = Vec::with_capacity(rows.len());
        for row in rows {
            let members = self.members(row.id).await?;
            correspondences.push(row.into_correspondence(members));
        }
        Ok(correspondences)
    }

    /// Rename a correspondence. Returns true if a row was updated.
    pub async fn rename(&self, id: i64, name: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE correspondences SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a correspondence together with its members and messages.
    ///
    /// Returns true if the correspondence existed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM messages WHERE correspondence_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM correspondence_members WHERE correspondence_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM correspondences WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add a member if not already present.
    ///
    /// A single conditional write; returns false when the user was already a member.
    pub async fn add_member(&self, correspondence_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO correspondence_members (correspondence_id, user_id)
            VALUES (?, ?)
            ON CONFLICT (correspondence_id, user_id) DO NOTHING
            "#,
        )
        .bind(correspondence_id)
        .bind(user_id)
        .execute(self.pool)
        .await
        .map_err(missing_correspondence)?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a member. Returns true if the user was a member.
    pub async fn remove_member(&self, correspondence_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM correspondence_members WHERE correspondence_id = ? AND user_id = ?",
        )
        .bind(correspondence_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Internal struct for mapping database rows to Correspondence.
#[derive(sqlx::FromRow)]
struct CorrespondenceRow {
    id: i64,
    name: String,
    admin_id: i64,
    admin_first_name: String,
    admin_second_name: String,
}

impl CorrespondenceRow {
    fn into_correspondence(self, members: Vec<UserPreview>) -> Correspondence {
        Correspondence {
            id: self.id,
            name: self.name,
            admin: UserPreview {
                id: self.admin_id,
                first_name: self.admin_first_name,
                second_name: self.admin_second_name,
            },
            members,
        }
    }
}
