//! Correspondence and message entities.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::db::UserPreview;

/// Maximum length for a correspondence name (in characters).
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum length for a message text (in characters).
pub const MAX_TEXT_LENGTH: usize = 500;

/// Maximum number of participants accepted when starting a correspondence.
pub const MAX_PARTICIPANTS: usize = 100;

/// A named multi-party conversation.
#[derive(Debug, Clone)]
pub struct Correspondence {
    /// Correspondence ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// The single user allowed to rename, delete and manage membership.
    pub admin: UserPreview,
    /// Current members, unique by user id, in join order.
    pub members: Vec<UserPreview>,
}

impl Correspondence {
    /// Check if the user is a current member.
    pub fn is_member(&self, user_id: i64) -> bool {
        self.members.iter().any(|m| m.id == user_id)
    }

    /// Check if the user is the admin.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin.id == user_id
    }
}

/// Data for creating a correspondence.
#[derive(Debug, Clone)]
pub struct NewCorrespondence {
    /// Display name.
    pub name: String,
    /// Creator, who becomes admin.
    pub admin_id: i64,
    /// Members including the admin, without duplicates.
    pub member_ids: Vec<i64>,
}

impl NewCorrespondence {
    /// Create a new correspondence owned by `admin_id`.
    ///
    /// The admin is always part of the member set; duplicates are dropped
    /// while keeping first-seen order.
    pub fn new(name: impl Into<String>, admin_id: i64, participant_ids: &[i64]) -> Self {
        let mut seen = HashSet::with_capacity(participant_ids.len() + 1);
        let member_ids: Vec<i64> = participant_ids
            .iter()
            .copied()
            .chain(std::iter::once(admin_id))
            .filter(|id| seen.insert(*id))
            .collect();

        Self {
            name: name.into(),
            admin_id,
            member_ids,
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone)]
pub struct Message {
    /// Message ID (monotonic).
    pub id: i64,
    /// Owning correspondence.
    pub correspondence_id: i64,
    /// Author; fixed at creation.
    pub sender: UserPreview,
    /// Message text.
    pub text: String,
    /// Server-assigned creation time; fixed at creation.
    pub created_at: DateTime<Utc>,
    /// Set once the message has been edited; never reverts.
    pub is_edited: bool,
}

impl Message {
    /// Check if the user authored this message.
    pub fn is_sent_by(&self, user_id: i64) -> bool {
        self.sender.id == user_id
    }
}

/// Data for creating a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// Owning correspondence.
    pub correspondence_id: i64,
    /// Author.
    pub sender_id: i64,
    /// Message text.
    pub text: String,
}

impl NewMessage {
    /// Create a new message.
    pub fn new(correspondence_id: i64, sender_id: i64, text: impl Into<String>) -> Self {
        Self {
            correspondence_id,
            sender_id,
            text: text.into(),
        }
    }
}
