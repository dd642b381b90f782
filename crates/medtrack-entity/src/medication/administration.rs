//! Medication administration record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A record of one dose actually being given.
///
/// Written by the administration workflow (out of scope here); this
/// subsystem only ages these rows out under retention policy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MedicationAdministration {
    /// Unique record identifier.
    pub id: Uuid,
    /// The schedule slot this administration fulfilled.
    pub schedule_id: Uuid,
    /// The parent medication course.
    pub medication_id: Uuid,
    /// The student who received the dose.
    pub student_id: Uuid,
    /// The staff member who gave the dose.
    pub administered_by: Uuid,
    /// When the dose was given.
    pub administered_at: DateTime<Utc>,
    /// Actual dose given.
    pub dosage_given: String,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the row was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}
