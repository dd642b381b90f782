//! Medication schedule generation configuration.

use serde::{Deserialize, Serialize};

/// Settings for the medication schedule generator and lifecycle sweeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Maximum medications picked up per today/tomorrow generation sweep.
    #[serde(default = "default_generation_batch_size")]
    pub generation_batch_size: i64,
    /// Maximum medications flipped Approved -> Active per sweep.
    #[serde(default = "default_activation_batch_size")]
    pub activation_batch_size: i64,
    /// Look-back window in minutes for the newly-approved sweep.
    #[serde(default = "default_recent_approval_window")]
    pub recent_approval_window_minutes: i64,
    /// Local hour (0-23) after which next-day schedules may be generated.
    /// Guards against generating tomorrow's doses while today's approval
    /// state can still change.
    #[serde(default = "default_tomorrow_generation_hour")]
    pub tomorrow_generation_after_hour: u32,
    /// Grace period in minutes after the scheduled time before a Pending
    /// dose is marked Missed.
    #[serde(default = "default_overdue_grace")]
    pub overdue_grace_minutes: i64,
    /// Maximum schedules marked Missed per overdue sweep.
    #[serde(default = "default_overdue_batch_size")]
    pub overdue_batch_size: i64,
    /// Dose time used when a medication has no configured times-of-day.
    #[serde(default = "default_dose_time")]
    pub default_dose_time: String,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            generation_batch_size: default_generation_batch_size(),
            activation_batch_size: default_activation_batch_size(),
            recent_approval_window_minutes: default_recent_approval_window(),
            tomorrow_generation_after_hour: default_tomorrow_generation_hour(),
            overdue_grace_minutes: default_overdue_grace(),
            overdue_batch_size: default_overdue_batch_size(),
            default_dose_time: default_dose_time(),
        }
    }
}

fn default_generation_batch_size() -> i64 {
    10
}

fn default_activation_batch_size() -> i64 {
    50
}

fn default_recent_approval_window() -> i64 {
    10
}

fn default_tomorrow_generation_hour() -> u32 {
    18
}

fn default_overdue_grace() -> i64 {
    30
}

fn default_overdue_batch_size() -> i64 {
    100
}

fn default_dose_time() -> String {
    "08:00".to_string()
}
