//! Notification repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use medtrack_core::error::{AppError, ErrorKind};
use medtrack_core::result::AppResult;
use medtrack_entity::notification::kind::NotificationKind;
use medtrack_entity::notification::model::Notification;

/// Repository for notification creation, the dedup lookup, and soft
/// deletion.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a batch of notifications inside one transaction, so a sweep's
    /// fan-out commits or rolls back as a unit.
    pub async fn create_many(&self, notifications: &[Notification]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        for n in notifications {
            sqlx::query(
                "INSERT INTO notifications \
                 (id, recipient_id, health_event_id, kind, title, content, requires_confirmation, \
                  is_read, read_at, end_date, updated_by, is_deleted, deleted_at, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
            )
            .bind(n.id)
            .bind(n.recipient_id)
            .bind(n.health_event_id)
            .bind(n.kind)
            .bind(&n.title)
            .bind(&n.content)
            .bind(n.requires_confirmation)
            .bind(n.is_read)
            .bind(n.read_at)
            .bind(n.end_date)
            .bind(&n.updated_by)
            .bind(n.is_deleted)
            .bind(n.deleted_at)
            .bind(n.created_at)
            .bind(n.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert notification", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit notifications", e)
        })?;
        Ok(notifications.len() as u64)
    }

    /// The dedup lookup: does a non-deleted notification of this kind for
    /// this event exist with `created_at` on or after `since`?
    pub async fn has_recent_for_event(
        &self,
        event_id: Uuid,
        kind: NotificationKind,
        since: DateTime<Utc>,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (\
                SELECT 1 FROM notifications \
                WHERE health_event_id = $1 AND kind = $2 AND NOT is_deleted \
                  AND created_at >= $3\
             )",
        )
        .bind(event_id)
        .bind(kind)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check recent notifications", e)
        })?;
        Ok(exists)
    }

    /// Notifications linked to Completed events resolved before `cutoff`.
    pub async fn find_for_completed_events(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT n.id FROM notifications n \
             JOIN health_events e ON e.id = n.health_event_id \
             WHERE e.status = 'completed' AND e.completed_at IS NOT NULL \
               AND e.completed_at < $1 AND NOT n.is_deleted \
             ORDER BY e.completed_at LIMIT $2",
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to find notifications for completed events",
                e,
            )
        })
    }

    /// Read notifications whose display window has passed and that were
    /// created before `cutoff`; retention candidates.
    pub async fn find_stale(
        &self,
        cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM notifications \
             WHERE is_read AND NOT is_deleted \
               AND end_date IS NOT NULL AND end_date < $2 \
               AND created_at < $1 \
             ORDER BY created_at LIMIT $3",
        )
        .bind(cutoff)
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find stale notifications", e)
        })
    }

    /// Soft-delete a batch of notifications in one statement.
    pub async fn soft_delete_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_deleted = TRUE, deleted_at = $2, updated_by = 'SYSTEM', updated_at = $2 \
             WHERE id = ANY($1) AND NOT is_deleted",
        )
        .bind(ids)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to soft-delete notifications", e)
        })?;
        Ok(result.rows_affected())
    }
}
