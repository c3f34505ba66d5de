//! Correspondence service.
//!
//! Every operation takes the authenticated caller's user id and enforces the
//! membership and ownership rules before touching storage:
//!
//! - Non-members cannot tell a correspondence they are not in from one that
//!   does not exist; both report `NotFound`.
//! - Admin-only actions by a member who is not the admin report `BadRequest`.
//! - Message edits and deletions by anyone but the sender report `NotFound`.

use std::collections::HashSet;

use tracing::{debug, info};

use super::message_repository::MessageRepository;
use super::repository::CorrespondenceRepository;
use super::types::{
    Correspondence, Message, NewCorrespondence, NewMessage, MAX_NAME_LENGTH, MAX_PARTICIPANTS,
    MAX_TEXT_LENGTH,
};
use super::view::{CorrespondencePreview, CorrespondenceView, MessageView};
use crate::db::{Database, User, UserRepository};
use crate::{Result, SocialError};

/// Validate a correspondence name.
fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SocialError::Validation(
            "correspondence name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(SocialError::Validation(format!(
            "correspondence name is too long (max {} characters)",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Validate a message text.
fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(SocialError::Validation(
            "message text must not be empty".to_string(),
        ));
    }
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(SocialError::Validation(format!(
            "message text is too long (max {} characters)",
            MAX_TEXT_LENGTH
        )));
    }
    Ok(())
}

/// Validate a participant list: bounded and without repeats.
fn validate_participants(participant_ids: &[i64]) -> Result<()> {
    if participant_ids.len() > MAX_PARTICIPANTS {
        return Err(SocialError::Validation(format!(
            "too many participants (max {})",
            MAX_PARTICIPANTS
        )));
    }
    let mut seen = HashSet::with_capacity(participant_ids.len());
    if !participant_ids.iter().all(|id| seen.insert(*id)) {
        return Err(SocialError::BadRequest("user repeats".to_string()));
    }
    Ok(())
}

/// Input for starting a new correspondence.
#[derive(Debug, Clone)]
pub struct StartCorrespondence {
    /// Display name.
    pub name: String,
    /// Text of the first message, sent by the creator.
    pub first_message: String,
    /// Other participants; the creator is implicit.
    pub participant_ids: Vec<i64>,
}

impl StartCorrespondence {
    /// Create a new request.
    pub fn new(
        name: impl Into<String>,
        first_message: impl Into<String>,
        participant_ids: Vec<i64>,
    ) -> Self {
        Self {
            name: name.into(),
            first_message: first_message.into(),
            participant_ids,
        }
    }
}

/// Service enforcing correspondence authorization and consistency rules.
pub struct CorrespondenceService<'a> {
    db: &'a Database,
}

impl<'a> CorrespondenceService<'a> {
    /// Create a new CorrespondenceService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List every correspondence the user is a member of.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<CorrespondencePreview>> {
        let repo = CorrespondenceRepository::new(self.db.pool());
        let correspondences = repo.list_for_user(user_id).await?;
        Ok(correspondences
            .into_iter()
            .map(CorrespondencePreview::from)
            .collect())
    }

    /// Get a correspondence with its full message history.
    ///
    /// Fails with NotFound if the correspondence does not exist or the caller
    /// is not a member.
    pub async fn get_with_messages(
        &self,
        correspondence_id: i64,
        caller_id: i64,
    ) -> Result<CorrespondenceView> {
        debug!(correspondence_id, caller_id, "get correspondence");
        let correspondence = self.get_as_member(correspondence_id, caller_id).await?;

        let messages = MessageRepository::new(self.db.pool())
            .list_for_correspondence(correspondence.id)
            .await?;

        Ok(CorrespondenceView::new(correspondence, messages))
    }

    /// Start a new correspondence with the caller as admin.
    ///
    /// The correspondence, its members and the first message are written in
    /// one transaction.
    pub async fn start_correspondence(
        &self,
        request: &StartCorrespondence,
        creator_id: i64,
    ) -> Result<CorrespondencePreview> {
        debug!(
            creator_id,
            participants = request.participant_ids.len(),
            "start correspondence"
        );
        validate_name(&request.name)?;
        validate_text(&request.first_message)?;
        validate_participants(&request.participant_ids)?;

        self.require_user(creator_id).await?;
        for &id in &request.participant_ids {
            self.require_user(id).await?;
        }

        let new = NewCorrespondence::new(&request.name, creator_id, &request.participant_ids);

        let mut tx = self.db.begin().await?;
        let correspondence_id = CorrespondenceRepository::insert(&mut tx, &new).await?;
        MessageRepository::insert(
            &mut tx,
            &NewMessage::new(correspondence_id, creator_id, &request.first_message),
        )
        .await?;
        tx.commit().await?;

        let correspondence = self.require_correspondence(correspondence_id).await?;
        info!(
            correspondence_id,
            creator_id,
            members = correspondence.members.len(),
            "correspondence started"
        );
        Ok(correspondence.into())
    }

    /// Add a user to a correspondence. Admin only.
    pub async fn add_user(
        &self,
        correspondence_id: i64,
        target_user_id: i64,
        caller_id: i64,
    ) -> Result<CorrespondencePreview> {
        debug!(correspondence_id, target_user_id, caller_id, "add user");
        self.require_user(target_user_id).await?;
        let correspondence = self.get_as_admin(correspondence_id, caller_id).await?;

        if correspondence.is_member(target_user_id) {
            return Err(already_member());
        }

        let repo = CorrespondenceRepository::new(self.db.pool());
        if !repo.add_member(correspondence_id, target_user_id).await? {
            return Err(already_member());
        }

        let updated = self.require_correspondence(correspondence_id).await?;
        info!(correspondence_id, target_user_id, "user added to correspondence");
        Ok(updated.into())
    }

    /// Remove a user from a correspondence. Admin only.
    ///
    /// The admin cannot be removed, so a correspondence always keeps at least
    /// one member.
    pub async fn remove_user(
        &self,
        correspondence_id: i64,
        target_user_id: i64,
        caller_id: i64,
    ) -> Result<CorrespondencePreview> {
        debug!(correspondence_id, target_user_id, caller_id, "remove user");
        self.require_user(target_user_id).await?;
        let correspondence = self.get_as_admin(correspondence_id, caller_id).await?;

        if !correspondence.is_member(target_user_id) {
            return Err(not_member());
        }
        if correspondence.is_admin(target_user_id) {
            return Err(SocialError::BadRequest(
                "admin cannot be removed from correspondence".to_string(),
            ));
        }

        let repo = CorrespondenceRepository::new(self.db.pool());
        if !repo.remove_member(correspondence_id, target_user_id).await? {
            return Err(not_member());
        }

        let updated = self.require_correspondence(correspondence_id).await?;
        info!(correspondence_id, target_user_id, "user removed from correspondence");
        Ok(updated.into())
    }

    /// Rename a correspondence. Admin only.
    pub async fn edit(
        &self,
        correspondence_id: i64,
        name: &str,
        caller_id: i64,
    ) -> Result<CorrespondencePreview> {
        debug!(correspondence_id, caller_id, "edit correspondence");
        self.get_as_admin(correspondence_id, caller_id).await?;
        validate_name(name)?;

        let repo = CorrespondenceRepository::new(self.db.pool());
        if !repo.rename(correspondence_id, name).await? {
            return Err(SocialError::NotFound("correspondence".to_string()));
        }

        let updated = self.require_correspondence(correspondence_id).await?;
        info!(correspondence_id, "correspondence renamed");
        Ok(updated.into())
    }

    /// Delete a correspondence with all of its messages. Admin only.
    ///
    /// Returns the last known state of the deleted correspondence.
    pub async fn delete(
        &self,
        correspondence_id: i64,
        caller_id: i64,
    ) -> Result<CorrespondencePreview> {
        debug!(correspondence_id, caller_id, "delete correspondence");
        let correspondence = self.get_as_admin(correspondence_id, caller_id).await?;

        let repo = CorrespondenceRepository::new(self.db.pool());
        if !repo.delete(correspondence_id).await? {
            return Err(SocialError::NotFound("correspondence".to_string()));
        }

        info!(correspondence_id, "correspondence deleted");
        Ok(correspondence.into())
    }

    /// Send a message to a correspondence the sender is a member of.
    pub async fn send_message(
        &self,
        correspondence_id: i64,
        text: &str,
        sender_id: i64,
    ) -> Result<MessageView> {
        debug!(correspondence_id, sender_id, "send message");
        self.require_user(sender_id).await?;
        self.get_as_member(correspondence_id, sender_id).await?;
        validate_text(text)?;

        let message = MessageRepository::new(self.db.pool())
            .create(&NewMessage::new(correspondence_id, sender_id, text))
            .await?;

        info!(correspondence_id, message_id = message.id, "message sent");
        Ok(message.into())
    }

    /// Replace the text of a message. Sender only.
    ///
    /// The message is marked edited even when the text is unchanged.
    pub async fn edit_message(
        &self,
        message_id: i64,
        text: &str,
        caller_id: i64,
    ) -> Result<MessageView> {
        debug!(message_id, caller_id, "edit message");
        self.get_as_sender(message_id, caller_id).await?;
        validate_text(text)?;

        let repo = MessageRepository::new(self.db.pool());
        if !repo.update_text(message_id, text).await? {
            return Err(SocialError::NotFound("message".to_string()));
        }

        let updated = repo
            .get_by_id(message_id)
            .await?
            .ok_or_else(|| SocialError::NotFound("message".to_string()))?;
        info!(message_id, "message edited");
        Ok(updated.into())
    }

    /// Delete a message. Sender only.
    ///
    /// Returns the message as it was before deletion.
    pub async fn delete_message(&self, message_id: i64, caller_id: i64) -> Result<MessageView> {
        debug!(message_id, caller_id, "delete message");
        let message = self.get_as_sender(message_id, caller_id).await?;

        let repo = MessageRepository::new(self.db.pool());
        if !repo.delete(message_id).await? {
            return Err(SocialError::NotFound("message".to_string()));
        }

        info!(message_id, "message deleted");
        Ok(message.into())
    }

    async fn require_user(&self, user_id: i64) -> Result<User> {
        UserRepository::new(self.db.pool()).require(user_id).await
    }

    async fn require_correspondence(&self, correspondence_id: i64) -> Result<Correspondence> {
        CorrespondenceRepository::new(self.db.pool())
            .get_by_id(correspondence_id)
            .await?
            .ok_or_else(|| SocialError::NotFound("correspondence".to_string()))
    }

    async fn get_as_member(&self, correspondence_id: i64, user_id: i64) -> Result<Correspondence> {
        let correspondence = self.require_correspondence(correspondence_id).await?;
        if !correspondence.is_member(user_id) {
            debug!(correspondence_id, user_id, "caller is not a member");
            return Err(SocialError::NotFound("correspondence".to_string()));
        }
        Ok(correspondence)
    }

    async fn get_as_admin(&self, correspondence_id: i64, user_id: i64) -> Result<Correspondence> {
        let correspondence = self.require_correspondence(correspondence_id).await?;
        if !correspondence.is_admin(user_id) {
            debug!(correspondence_id, user_id, "caller is not the admin");
            return Err(SocialError::BadRequest(
                "user is not correspondence admin".to_string(),
            ));
        }
        Ok(correspondence)
    }

    async fn get_as_sender(&self, message_id: i64, user_id: i64) -> Result<Message> {
        let message = MessageRepository::new(self.db.pool())
            .get_by_id(message_id)
            .await?
            .ok_or_else(|| SocialError::NotFound("message".to_string()))?;
        if !message.is_sent_by(user_id) {
            debug!(message_id, user_id, "caller is not the sender");
            return Err(SocialError::NotFound("message".to_string()));
        }
        Ok(message)
    }
}

fn already_member() -> SocialError {
    SocialError::BadRequest("user is already in correspondence".to_string())
}

fn not_member() -> SocialError {
    SocialError::BadRequest("user not in correspondence".to_string())
}
