//! Medication and schedule status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a parent-submitted medication course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "medication_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MedicationStatus {
    /// Submitted by a parent, awaiting manager review.
    PendingApproval,
    /// Approved by a manager, waiting for its start date.
    Approved,
    /// In its dosing window; schedules may be generated.
    Active,
    /// Course finished normally.
    Completed,
    /// Course stopped early by a manager or parent.
    Discontinued,
    /// Rejected during review.
    Rejected,
}

impl MedicationStatus {
    /// Check if the medication is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Discontinued | Self::Rejected)
    }

    /// Only Active medications may have schedules generated.
    pub fn is_schedulable(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Discontinued => "discontinued",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for MedicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MedicationStatus {
    type Err = medtrack_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending_approval" => Ok(Self::PendingApproval),
            "approved" => Ok(Self::Approved),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "discontinued" => Ok(Self::Discontinued),
            "rejected" => Ok(Self::Rejected),
            _ => Err(medtrack_core::AppError::validation(format!(
                "Invalid medication status: '{s}'"
            ))),
        }
    }
}

/// Status of one planned dose instance.
///
/// Every status except `Pending` is terminal; a resolved schedule is never
/// reopened, only soft-marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "schedule_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Waiting to be administered.
    Pending,
    /// Dose given and recorded.
    Completed,
    /// Dose window passed without administration.
    Missed,
    /// Cancelled along with its medication.
    Cancelled,
    /// Student was absent at dose time.
    StudentAbsent,
}

impl ScheduleStatus {
    /// Check if the schedule is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Missed => "missed",
            Self::Cancelled => "cancelled",
            Self::StudentAbsent => "student_absent",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_medication_statuses() {
        assert!(MedicationStatus::Completed.is_terminal());
        assert!(MedicationStatus::Rejected.is_terminal());
        assert!(!MedicationStatus::Active.is_terminal());
        assert!(!MedicationStatus::Approved.is_terminal());
    }

    #[test]
    fn test_only_active_is_schedulable() {
        assert!(MedicationStatus::Active.is_schedulable());
        assert!(!MedicationStatus::Approved.is_schedulable());
        assert!(!MedicationStatus::PendingApproval.is_schedulable());
    }

    #[test]
    fn test_schedule_terminality() {
        assert!(!ScheduleStatus::Pending.is_terminal());
        assert!(ScheduleStatus::Missed.is_terminal());
        assert!(ScheduleStatus::StudentAbsent.is_terminal());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "active".parse::<MedicationStatus>().unwrap(),
            MedicationStatus::Active
        );
        assert!("held".parse::<MedicationStatus>().is_err());
    }
}
