//! Staff repository implementation.

use sqlx::PgPool;

use medtrack_core::error::{AppError, ErrorKind};
use medtrack_core::result::AppResult;
use medtrack_entity::staff::model::StaffMember;
use medtrack_entity::staff::role::StaffRole;

/// Repository for staff lookups. The sweeps only need active recipients by
/// role.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    /// Create a new staff repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active staff members with the given role.
    pub async fn find_active_by_role(&self, role: StaffRole) -> AppResult<Vec<StaffMember>> {
        sqlx::query_as::<_, StaffMember>(
            "SELECT * FROM staff_members WHERE role = $1 AND is_active ORDER BY full_name",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find staff by role", e)
        })
    }
}
