//! Health-event escalation and reminder configuration.

use serde::{Deserialize, Serialize};

/// Settings for the health-event escalation, reminder, and notification
/// cleanup sweeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    /// Minutes a Pending event may stay unassigned before escalation.
    #[serde(default = "default_pending_threshold")]
    pub pending_threshold_minutes: i64,
    /// Minimum minutes between two escalation notifications for one event.
    #[serde(default = "default_escalation_cooldown")]
    pub escalation_cooldown_minutes: i64,
    /// Minutes an InProgress event may run before the handler is reminded.
    #[serde(default = "default_reminder_threshold")]
    pub reminder_threshold_minutes: i64,
    /// Minimum minutes between two reminder notifications for one event.
    #[serde(default = "default_reminder_cooldown")]
    pub reminder_cooldown_minutes: i64,
    /// Minutes after completion before an event's notifications are
    /// soft-deleted.
    #[serde(default = "default_completed_cleanup_after")]
    pub completed_cleanup_after_minutes: i64,
    /// Maximum events examined per escalation or reminder sweep.
    #[serde(default = "default_event_batch_size")]
    pub event_batch_size: i64,
    /// Maximum notifications soft-deleted per cleanup sweep.
    #[serde(default = "default_cleanup_batch_size")]
    pub cleanup_batch_size: i64,
    /// Hours an escalation notification stays displayable.
    #[serde(default = "default_display_expiry_hours")]
    pub display_expiry_hours: i64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            pending_threshold_minutes: default_pending_threshold(),
            escalation_cooldown_minutes: default_escalation_cooldown(),
            reminder_threshold_minutes: default_reminder_threshold(),
            reminder_cooldown_minutes: default_reminder_cooldown(),
            completed_cleanup_after_minutes: default_completed_cleanup_after(),
            event_batch_size: default_event_batch_size(),
            cleanup_batch_size: default_cleanup_batch_size(),
            display_expiry_hours: default_display_expiry_hours(),
        }
    }
}

fn default_pending_threshold() -> i64 {
    5
}

fn default_escalation_cooldown() -> i64 {
    15
}

fn default_reminder_threshold() -> i64 {
    10
}

fn default_reminder_cooldown() -> i64 {
    30
}

fn default_completed_cleanup_after() -> i64 {
    60
}

fn default_event_batch_size() -> i64 {
    10
}

fn default_cleanup_batch_size() -> i64 {
    50
}

fn default_display_expiry_hours() -> i64 {
    2
}
