//! Message repository.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use super::repository::missing_correspondence;
use super::types::{Message, NewMessage};
use crate::db::{DbPool, UserPreview};
use crate::{Result, SocialError};

const SELECT_MESSAGE: &str = r#"
    SELECT m.id, m.correspondence_id, m.sender_id,
           u.first_name AS sender_first_name, u.second_name AS sender_second_name,
           m.text, m.created_at, m.is_edited
    FROM messages m
    JOIN users u ON u.id = m.sender_id
"#;

/// Repository for message operations.
pub struct MessageRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new MessageRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new message stamped with the current time.
    pub async fn create(&self, new: &NewMessage) -> Result<Message> {
        let mut conn = self.pool.acquire().await?;
        let id = Self::insert(&mut conn, new).await?;
        drop(conn);

        self.get_by_id(id)
            .await?
            .ok_or_else(|| SocialError::NotFound("message".to_string()))
    }

    /// Insert a message on an existing connection and return its ID.
    pub async fn insert(conn: &mut SqliteConnection, new: &NewMessage) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO messages (correspondence_id, sender_id, text, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(new.correspondence_id)
        .bind(new.sender_id)
        .bind(&new.text)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&mut *conn)
        .await
        .map_err(missing_correspondence)?;

        Ok(id)
    }

    /// Get a message by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Message>> {
        let sql = format!("{SELECT_MESSAGE} WHERE m.id = ?");
        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Message::try_from).transpose()
    }

    /// List all messages of a correspondence in creation order.
    pub async fn list_for_correspondence(&self, correspondence_id: i64) -> Result<Vec<Message>> {
        let sql = format!("{SELECT_MESSAGE} WHERE m.correspondence_id = ? ORDER BY m.id");
        let rows = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(correspondence_id)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    /// Replace the text of a message and mark it edited.
    ///
    /// Sender and timestamp are left untouched. Returns true if a row was updated.
    pub async fn update_text(&self, id: i64, text: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE messages SET text = ?, is_edited = 1 WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a message. Returns true if it existed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Database row type for Message.
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    correspondence_id: i64,
    sender_id: i64,
    sender_first_name: String,
    sender_second_name: String,
    text: String,
    created_at: String,
    is_edited: bool,
}

impl TryFrom<MessageRow> for Message {
    type Error = SocialError;

    fn try_from(row: MessageRow) -> Result<Self> {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                SocialError::Database(format!(
                    "message {} has invalid created_at {:?}: {e}",
                    row.id, row.created_at
                ))
            })?;

        Ok(Self {
            id: row.id,
            correspondence_id: row.correspondence_id,
            sender: UserPreview {
                id: row.sender_id,
                first_name: row.sender_first_name,
                second_name: row.sender_second_name,
            },
            text: row.text,
            created_at,
            is_edited: row.is_edited,
        })
    }
}
