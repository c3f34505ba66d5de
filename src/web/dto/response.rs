//! Response DTOs for Web API.
//!
//! Correspondence and message payloads are the view models from
//! [`crate::correspondence`]; this module only adds the envelope.

use serde::Serialize;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
