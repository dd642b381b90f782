//! Staff role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles in the school health system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "staff_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    /// Full system administrator.
    Admin,
    /// Supervises nurses; receives escalations.
    Manager,
    /// Handles health events and administers medication.
    Nurse,
    /// Submits medication requests for their child.
    Parent,
}

impl StaffRole {
    /// Check if this role receives escalation notifications.
    pub fn is_supervisory(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Nurse => "nurse",
            Self::Parent => "parent",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = medtrack_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "nurse" => Ok(Self::Nurse),
            "parent" => Ok(Self::Parent),
            _ => Err(medtrack_core::AppError::validation(format!(
                "Invalid staff role: '{s}'. Expected one of: admin, manager, nurse, parent"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supervisory_roles() {
        assert!(StaffRole::Manager.is_supervisory());
        assert!(StaffRole::Admin.is_supervisory());
        assert!(!StaffRole::Nurse.is_supervisory());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("nurse".parse::<StaffRole>().unwrap(), StaffRole::Nurse);
        assert_eq!("MANAGER".parse::<StaffRole>().unwrap(), StaffRole::Manager);
        assert!("janitor".parse::<StaffRole>().is_err());
    }
}
