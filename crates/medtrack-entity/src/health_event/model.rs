//! Health event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::HealthEventStatus;

/// One reported health incident for a student.
///
/// The escalation and reminder sweeps only read the timestamps here to
/// decide whether to notify; they never change `status`. Assignment (and
/// with it `handled_by` / `assigned_at`) happens in the nurse-facing
/// workflow, which is out of scope for this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HealthEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// The student involved.
    pub student_id: Uuid,
    /// Incident category (e.g. `"injury"`, `"fever"`).
    pub event_type: String,
    /// Free-form description of the incident.
    pub description: String,
    /// Where the incident happened.
    pub location: Option<String>,
    /// Whether the incident was flagged as an emergency.
    pub is_emergency: bool,
    /// Current lifecycle status.
    pub status: HealthEventStatus,
    /// The nurse handling the event; None while Pending.
    pub handled_by: Option<Uuid>,
    /// When the event was reported.
    pub created_at: DateTime<Utc>,
    /// When a nurse was assigned.
    pub assigned_at: Option<DateTime<Utc>>,
    /// When the event was resolved.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl HealthEvent {
    /// Whole minutes the event has waited since being reported.
    pub fn waiting_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_minutes()
    }

    /// Whole minutes since a nurse was assigned, if one is.
    pub fn processing_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        self.assigned_at.map(|at| (now - at).num_minutes())
    }
}
