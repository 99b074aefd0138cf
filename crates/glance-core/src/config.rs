//! Service configuration.
//!
//! ホスト/ポートは transport 側（clap）の責務。ここはサービス本体の定数のみ:
//! - idle threshold / reaper tick: モデルのアンロード判定
//! - queue depth: 受付上限（無制限キューは採用しない）
//! - operations: 許可される operation selector のリスト

use std::time::Duration;

/// Operation selectors accepted by default. Order matters: `GET /operations`
/// returns the list as configured.
pub const DEFAULT_OPERATIONS: &[&str] = &[
    "<GENERATE_TAGS>",
    "<CAPTION>",
    "<DETAILED_CAPTION>",
    "<MORE_DETAILED_CAPTION>",
    "<ANALYZE>",
    "<MIXED_CAPTION>",
    "<MIXED_CAPTION_PLUS>",
];

/// Unload the model after this much inactivity.
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(300);

/// How often the reaper re-checks idle eligibility. Eviction is eventual:
/// the model may stay loaded up to one tick past the threshold.
pub const DEFAULT_REAPER_INTERVAL: Duration = Duration::from_secs(10);

/// Admission limit for the request queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 256;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub idle_threshold: Duration,
    pub reaper_interval: Duration,
    pub queue_depth: usize,
    pub operations: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            reaper_interval: DEFAULT_REAPER_INTERVAL,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            operations: DEFAULT_OPERATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_documented_values() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.idle_threshold, Duration::from_secs(300));
        assert_eq!(cfg.reaper_interval, Duration::from_secs(10));
        assert_eq!(cfg.operations.len(), 7);
        assert_eq!(cfg.operations[0], "<GENERATE_TAGS>");
    }
}
