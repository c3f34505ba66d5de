//! Request DTOs for Web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::plain_text;

/// Message body, used on its own and nested in [`StartCorrespondenceRequest`].
#[derive(Debug, Deserialize, Validate)]
pub struct MessageRequest {
    #[validate(
        length(min = 1, max = 500, message = "Text must be 1-500 characters"),
        custom(function = "plain_text")
    )]
    pub text: String,
}

/// Start correspondence request.
#[derive(Debug, Deserialize, Validate)]
pub struct StartCorrespondenceRequest {
    #[validate(
        length(min = 1, max = 50, message = "Name must be 1-50 characters"),
        custom(function = "plain_text")
    )]
    pub name: String,
    /// First message, sent by the caller.
    #[validate(nested)]
    pub message: MessageRequest,
    /// Other participants; the caller is added implicitly.
    #[serde(default)]
    #[validate(length(max = 100, message = "At most 100 participants"))]
    pub participant_ids: Vec<i64>,
}

/// Rename correspondence request.
#[derive(Debug, Deserialize, Validate)]
pub struct EditCorrespondenceRequest {
    #[validate(
        length(min = 1, max = 50, message = "Name must be 1-50 characters"),
        custom(function = "plain_text")
    )]
    pub name: String,
}
