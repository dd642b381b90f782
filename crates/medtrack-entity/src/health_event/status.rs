//! Health event status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a reported health incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "health_event_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HealthEventStatus {
    /// Reported, not yet assigned to a nurse.
    Pending,
    /// Assigned and being handled.
    InProgress,
    /// Resolved.
    Completed,
    /// Withdrawn or reported in error.
    Cancelled,
}

impl HealthEventStatus {
    /// Check if the event is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for HealthEventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
