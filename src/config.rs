use serde::{Deserialize, Serialize};

/// Tunable knobs for the job handlers. Defaults mirror production behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Percentage of a budget consumed before an alert email goes out.
    pub alert_threshold_percent: f64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            alert_threshold_percent: 80.0,
        }
    }
}
