//! Medication administration repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use medtrack_core::error::{AppError, ErrorKind};
use medtrack_core::result::AppResult;

/// Repository for administration records. Only the retention sweep touches
/// these rows from this subsystem.
#[derive(Debug, Clone)]
pub struct AdministrationRepository {
    pool: PgPool,
}

impl AdministrationRepository {
    /// Create a new administration repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Administration records given before `cutoff`; retention candidates.
    pub async fn find_stale(&self, cutoff: DateTime<Utc>, limit: i64) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM medication_administrations \
             WHERE administered_at < $1 AND NOT is_deleted \
             ORDER BY administered_at LIMIT $2",
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find stale administrations", e)
        })
    }

    /// Soft-delete a batch of administration records in one statement.
    pub async fn soft_delete_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE medication_administrations \
             SET is_deleted = TRUE, deleted_at = $2 \
             WHERE id = ANY($1) AND NOT is_deleted",
        )
        .bind(ids)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to soft-delete administrations", e)
        })?;
        Ok(result.rows_affected())
    }
}
