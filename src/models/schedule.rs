// src/models/schedule.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound on a scheduled deletion delay (one hour).
pub const MAX_DELAY_MS: u64 = 3_600_000;

/// DTO for `POST /timeout`: delete `target` after `time` milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TimeoutRequest {
    #[validate(range(max = MAX_DELAY_MS))]
    pub time: u64,
    #[validate(length(min = 1, max = 512))]
    pub target: String,
}
