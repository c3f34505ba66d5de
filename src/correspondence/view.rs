//! Client-facing projections of correspondences and messages.
//!
//! Projection rules are plain `From` conversions, fixed at compile time and
//! shared by every caller.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::{Correspondence, Message};
use crate::db::UserPreview;

/// Reduced correspondence used in lists and as the result of mutations.
#[derive(Debug, Clone, Serialize)]
pub struct CorrespondencePreview {
    pub id: i64,
    pub name: String,
    pub users: Vec<UserPreview>,
}

/// Full correspondence with its message history.
#[derive(Debug, Clone, Serialize)]
pub struct CorrespondenceView {
    pub id: i64,
    pub name: String,
    pub admin: UserPreview,
    pub users: Vec<UserPreview>,
    pub messages: Vec<MessageView>,
}

/// A single message as shown to members.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub is_edited: bool,
    pub sender: UserPreview,
}

impl From<Correspondence> for CorrespondencePreview {
    fn from(c: Correspondence) -> Self {
        Self {
            id: c.id,
            name: c.name,
            users: c.members,
        }
    }
}

impl From<Message> for MessageView {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            text: m.text,
            created_at: m.created_at,
            is_edited: m.is_edited,
            sender: m.sender,
        }
    }
}

impl CorrespondenceView {
    /// Combine a correspondence with its messages.
    pub fn new(correspondence: Correspondence, messages: Vec<Message>) -> Self {
        Self {
            id: correspondence.id,
            name: correspondence.name,
            admin: correspondence.admin,
            users: correspondence.members,
            messages: messages.into_iter().map(MessageView::from).collect(),
        }
    }
}
