//! Route handlers organized by resource

use serde::Serialize;

pub mod health;
pub mod widgets;
pub mod installations;
pub mod clients;

/// Plain confirmation body: `{"message": "..."}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}
