// ============================================================================
// FLAG MODEL - Una flag capturada, tal como la reporta el servidor
// ============================================================================

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Submission lifecycle of a flag on the farm server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlagStatus {
    Queued,
    Skipped,
    Accepted,
    Rejected,
}

impl fmt::Display for FlagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlagStatus::Queued => "QUEUED",
            FlagStatus::Skipped => "SKIPPED",
            FlagStatus::Accepted => "ACCEPTED",
            FlagStatus::Rejected => "REJECTED",
        };
        write!(f, "{}", label)
    }
}

/// One captured flag. Immutable once parsed from a server payload; the list
/// order is whatever the server returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub flag: String,
    pub sploit: String,
    pub team: String,
    /// Capture time, unix seconds.
    pub time: i64,
    pub status: FlagStatus,
    pub checksystem_response: Option<String>,
}

impl Flag {
    /// Capture time rendered as "YYYY-MM-DD HH:MM:SS" (UTC), for display.
    pub fn time_formatted(&self) -> String {
        match DateTime::from_timestamp(self.time, 0) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.time.to_string(),
        }
    }
}
