//! Health event repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use medtrack_core::error::{AppError, ErrorKind};
use medtrack_core::result::AppResult;
use medtrack_entity::health_event::model::HealthEvent;

/// Repository for health event queries.
///
/// The sweeps only read events; status changes happen in the nurse-facing
/// workflow.
#[derive(Debug, Clone)]
pub struct HealthEventRepository {
    pool: PgPool,
}

impl HealthEventRepository {
    /// Create a new health event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pending, unassigned events reported before `cutoff`, oldest first.
    pub async fn find_unassigned_pending(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<HealthEvent>> {
        sqlx::query_as::<_, HealthEvent>(
            "SELECT * FROM health_events \
             WHERE status = 'pending' AND handled_by IS NULL AND created_at < $1 \
             ORDER BY created_at LIMIT $2",
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find unassigned events", e)
        })
    }

    /// InProgress events with an assigned handler whose assignment is
    /// older than `cutoff`, oldest first.
    pub async fn find_stale_in_progress(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<HealthEvent>> {
        sqlx::query_as::<_, HealthEvent>(
            "SELECT * FROM health_events \
             WHERE status = 'in_progress' AND handled_by IS NOT NULL \
               AND assigned_at IS NOT NULL AND assigned_at < $1 \
             ORDER BY assigned_at LIMIT $2",
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find stale in-progress events", e)
        })
    }
}
