//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of concurrent job processing tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in seconds between job queue polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Queue lanes polled by the worker, in priority order.
    #[serde(default = "default_queues")]
    pub queues: Vec<String>,
    /// Base delay in seconds for the first retry of a transient failure.
    /// Subsequent retries double the delay.
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: default_concurrency(),
            poll_interval_seconds: default_poll_interval(),
            queues: default_queues(),
            retry_base_delay_seconds: default_retry_base_delay(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval() -> u64 {
    5
}

fn default_queues() -> Vec<String> {
    vec![
        "critical".to_string(),
        "high".to_string(),
        "default".to_string(),
        "low".to_string(),
    ]
}

fn default_retry_base_delay() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_queue_order() {
        let config = WorkerConfig::default();
        assert_eq!(config.queues, vec!["critical", "high", "default", "low"]);
    }
}
