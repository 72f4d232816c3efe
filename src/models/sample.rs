// Host sample: one row of system_metrics.csv / instance_metrics.csv

use serde::{Deserialize, Serialize};

/// One sampler tick. A failed sample keeps its timestamp; the values are `None`
/// and serialize as empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Unix seconds with millisecond precision.
    pub timestamp: f64,
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    /// Only sampled (and written) in instance mode.
    #[serde(default)]
    pub load_avg_1m: Option<f64>,
}

impl SampleRecord {
    pub fn missing(timestamp: f64) -> Self {
        Self {
            timestamp,
            cpu_percent: None,
            memory_percent: None,
            load_avg_1m: None,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.cpu_percent.is_none() && self.memory_percent.is_none()
    }
}
