//! socialnet - correspondence backend for a social network.
//!
//! Multi-party conversations with an admin, a member set and a message
//! history, served over a small REST API.

pub mod config;
pub mod correspondence;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use config::Config;
pub use correspondence::{
    Correspondence, CorrespondencePreview, CorrespondenceService, CorrespondenceView, Message,
    MessageView, StartCorrespondence,
};
pub use db::{Database, NewUser, User, UserPreview, UserRepository};
pub use error::{ErrorKind, Result, SocialError};
pub use web::WebServer;
