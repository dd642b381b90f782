//! Retention cleanup configuration.

use serde::{Deserialize, Serialize};

/// Settings for age-based soft-deletion of terminal records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Days after its end date before a terminal medication is purged.
    #[serde(default = "default_medication_retention")]
    pub medication_retention_days: i64,
    /// Days before a read, expired notification is purged.
    #[serde(default = "default_notification_retention")]
    pub notification_retention_days: i64,
    /// Days before an administration record is purged.
    #[serde(default = "default_administration_retention")]
    pub administration_retention_days: i64,
    /// Maximum medications purged per run.
    #[serde(default = "default_medication_batch")]
    pub medication_batch_size: i64,
    /// Maximum notifications purged per run.
    #[serde(default = "default_notification_batch")]
    pub notification_batch_size: i64,
    /// Maximum administration records purged per run.
    #[serde(default = "default_administration_batch")]
    pub administration_batch_size: i64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            medication_retention_days: default_medication_retention(),
            notification_retention_days: default_notification_retention(),
            administration_retention_days: default_administration_retention(),
            medication_batch_size: default_medication_batch(),
            notification_batch_size: default_notification_batch(),
            administration_batch_size: default_administration_batch(),
        }
    }
}

fn default_medication_retention() -> i64 {
    30
}

fn default_notification_retention() -> i64 {
    30
}

fn default_administration_retention() -> i64 {
    30
}

fn default_medication_batch() -> i64 {
    200
}

fn default_notification_batch() -> i64 {
    500
}

fn default_administration_batch() -> i64 {
    300
}
