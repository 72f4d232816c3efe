// Canonical benchmark row: one per (run, concurrency level). Built once, never mutated.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{LoadTestAggregate, ResourceSnapshot};
use crate::topology::DeploymentIdentity;

/// User counts the load generator is run at.
pub const CONCURRENCY_LEVELS: [u32; 5] = [1, 10, 100, 1000, 2000];

/// Scaled magnitudes at or above this have no fractional digits left to round.
const ROUNDING_LIMIT: f64 = (1u64 << 51) as f64;

/// Round half away from zero to `places` decimals. Non-finite input, and values too
/// large to carry `places` decimals, come back unchanged.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= ROUNDING_LIMIT {
        return value;
    }
    scaled.round() / factor
}

/// Failed requests as a percentage of all requests; 0 when nothing was sent.
pub fn failure_rate(failure_count: u64, request_count: u64) -> f64 {
    if request_count == 0 {
        return 0.0;
    }
    failure_count as f64 / request_count as f64 * 100.0
}

#[derive(Debug, Clone)]
pub struct BenchmarkRow {
    timestamp: DateTime<Utc>,
    identity: DeploymentIdentity,
    concurrency: u32,
    load: LoadTestAggregate,
    resources: Arc<ResourceSnapshot>,
    failure_rate: f64,
}

impl BenchmarkRow {
    pub fn new(
        timestamp: DateTime<Utc>,
        identity: DeploymentIdentity,
        concurrency: u32,
        load: LoadTestAggregate,
        resources: Arc<ResourceSnapshot>,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            CONCURRENCY_LEVELS.contains(&concurrency),
            "concurrency level must be one of {:?}, got {}",
            CONCURRENCY_LEVELS,
            concurrency
        );
        let failure_rate = failure_rate(load.failure_count, load.request_count);
        Ok(Self {
            timestamp,
            identity,
            concurrency,
            load,
            resources,
            failure_rate,
        })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn identity(&self) -> &DeploymentIdentity {
        &self.identity
    }

    pub fn concurrency(&self) -> u32 {
        self.concurrency
    }

    pub fn load(&self) -> &LoadTestAggregate {
        &self.load
    }

    pub fn resources(&self) -> &ResourceSnapshot {
        &self.resources
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}
