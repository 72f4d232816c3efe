// Load generator aggregate ("Aggregated" row of locust_{n}_stats.csv)

use serde::{Deserialize, Serialize};

/// All-traffic summary for one (deployment, concurrency) pair. Times are milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadTestAggregate {
    pub request_count: u64,
    pub failure_count: u64,
    pub median_response_time: f64,
    pub avg_response_time: f64,
    pub min_response_time: f64,
    pub max_response_time: f64,
    pub requests_per_sec: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}
