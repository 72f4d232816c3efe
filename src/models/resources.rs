// Resource snapshot: one per run, shared by every concurrency level.
// Each metric group is optional; None means "no data", never zero.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub avg: f64,
    pub max: f64,
}

impl Stat {
    /// Mean and maximum of `values`; None when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self { avg, max })
    }
}

/// Reduced host (or load-runner) time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostMetrics {
    pub cpu: Option<Stat>,
    pub memory: Option<Stat>,
    /// 1-minute load average; instance runs only.
    pub load: Option<Stat>,
}

/// Cluster pod resources from a `kubectl top pods` dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodMetrics {
    pub pod_count: u32,
    pub total_cpu_millicores: u64,
    pub avg_cpu_millicores: f64,
    pub total_memory_mi: u64,
    pub avg_memory_mi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColdStartStats {
    pub count: u32,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmStartStats {
    pub count: u32,
    pub avg_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColdStartSummary {
    pub cold: Option<ColdStartStats>,
    pub warm: Option<WarmStartStats>,
}

/// Concurrency-independent resource data for one run, by deployment kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceSnapshot {
    Instance {
        host: Option<HostMetrics>,
    },
    Cluster {
        pods: Option<PodMetrics>,
        runner: Option<HostMetrics>,
    },
    Serverless {
        cold_starts: Option<ColdStartSummary>,
        runner: Option<HostMetrics>,
    },
}

impl ResourceSnapshot {
    /// The CPU/memory series common to every kind: the instance itself, or the load runner.
    pub fn host(&self) -> Option<&HostMetrics> {
        match self {
            ResourceSnapshot::Instance { host } => host.as_ref(),
            ResourceSnapshot::Cluster { runner, .. } => runner.as_ref(),
            ResourceSnapshot::Serverless { runner, .. } => runner.as_ref(),
        }
    }

    pub fn pods(&self) -> Option<&PodMetrics> {
        match self {
            ResourceSnapshot::Cluster { pods, .. } => pods.as_ref(),
            _ => None,
        }
    }

    pub fn cold_starts(&self) -> Option<&ColdStartSummary> {
        match self {
            ResourceSnapshot::Serverless { cold_starts, .. } => cold_starts.as_ref(),
            _ => None,
        }
    }
}
