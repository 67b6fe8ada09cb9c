//! Route handlers organized by resource

pub mod articles;
pub mod health;
pub mod home;
pub mod reports;
pub mod supplies;

use serde::Serialize;

/// `{"message": ...}` body shared by mutation endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
