use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Health check response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` when the server answers.
    pub status: String,
    /// Time the check was answered.
    pub checked_at: Timestamp,
}

impl HealthResponse {
    /// A healthy response stamped with the current time.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_owned(),
            checked_at: Timestamp::now(),
        }
    }
}
