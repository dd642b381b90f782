//! Student medication entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::MedicationStatus;

/// A parent-submitted medication course for one student.
///
/// The `skip_dates` and `dose_times` columns hold JSON arrays serialized as
/// text. Malformed content in either column degrades to the empty/default
/// value rather than failing the row; the accessors below own that policy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentMedication {
    /// Unique medication identifier.
    pub id: Uuid,
    /// The student this course belongs to.
    pub student_id: Uuid,
    /// Medication name as submitted.
    pub medication_name: String,
    /// Dose per administration (e.g. `"5ml"`).
    pub dosage: String,
    /// Free-form administration instructions.
    pub instructions: Option<String>,
    /// First calendar day of the course.
    pub start_date: NaiveDate,
    /// Last calendar day of the course.
    pub end_date: NaiveDate,
    /// Date the supplied medication itself expires.
    pub expiry_date: Option<NaiveDate>,
    /// Current lifecycle status.
    pub status: MedicationStatus,
    /// Whether the daily sweeps generate schedules for this course.
    pub auto_generate_schedule: bool,
    /// Skip Saturdays and Sundays when generating schedules.
    pub skip_weekends: bool,
    /// JSON array of ISO dates (`"YYYY-MM-DD"`) to skip.
    pub skip_dates: Option<String>,
    /// JSON array of times-of-day (`"HH:MM"`), one schedule per entry.
    pub dose_times: Option<String>,
    /// When a manager approved the course.
    pub approved_at: Option<DateTime<Utc>>,
    /// The manager who approved the course.
    pub approved_by: Option<Uuid>,
    /// Who last touched the row (`"SYSTEM"` for automatic transitions).
    pub last_updated_by: Option<String>,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the row was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl StudentMedication {
    /// Check whether the course's date range covers the given day.
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Parse the skip-dates column.
    ///
    /// Malformed JSON or unparseable entries are dropped, not raised; a
    /// course with corrupt skip data simply has no skip dates.
    pub fn parsed_skip_dates(&self) -> Vec<NaiveDate> {
        let Some(raw) = self.skip_dates.as_deref() else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(entries) => entries
                .iter()
                .filter_map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Parse the dose-times column, falling back to the single given
    /// default when the column is missing, malformed, or empty.
    pub fn parsed_dose_times(&self, default: NaiveTime) -> Vec<NaiveTime> {
        let parsed: Vec<NaiveTime> = self
            .dose_times
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .unwrap_or_default()
            .iter()
            .filter_map(|s| NaiveTime::parse_from_str(s, "%H:%M").ok())
            .collect();

        if parsed.is_empty() {
            vec![default]
        } else {
            parsed
        }
    }
}
