//! Staff member entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::StaffRole;

/// A staff account. User management itself is handled elsewhere; the
/// sweeps only look up active recipients by role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffMember {
    /// Unique staff identifier.
    pub id: Uuid,
    /// Display name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Role in the system.
    pub role: StaffRole,
    /// Whether the account is active; inactive staff receive nothing.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
