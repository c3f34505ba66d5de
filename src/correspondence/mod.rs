//! Correspondence module.
//!
//! Multi-party conversations with a single admin, a member set and a message
//! history, plus the service that enforces who may read and change them.

mod message_repository;
mod repository;
mod service;
mod types;
mod view;

pub use message_repository::MessageRepository;
pub use repository::CorrespondenceRepository;
pub use service::{CorrespondenceService, StartCorrespondence};
pub use types::{
    Correspondence, Message, NewCorrespondence, NewMessage, MAX_NAME_LENGTH, MAX_PARTICIPANTS,
    MAX_TEXT_LENGTH,
};
pub use view::{CorrespondencePreview, CorrespondenceView, MessageView};
