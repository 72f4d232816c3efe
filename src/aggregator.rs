// Join per-concurrency load results with the run's resource snapshot.
// A run directory holds one resource result and up to one load file per level.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::models::{BenchmarkRow, CONCURRENCY_LEVELS, LoadTestAggregate, ResourceSnapshot};
use crate::parser::{cold_start, host, load_test, pods, scan_results_dir};
use crate::topology::{DeploymentIdentity, Topology};

/// Read the resource artifacts that belong to `topology`. Missing pieces are None.
#[instrument(skip(results_dir), fields(operation = "collect_resources"))]
pub fn collect_resources(
    results_dir: &Path,
    topology: Topology,
    workload_prefix: &str,
) -> ResourceSnapshot {
    match topology {
        Topology::Instance => ResourceSnapshot::Instance {
            host: host::parse_instance_metrics(results_dir),
        },
        Topology::Cluster => ResourceSnapshot::Cluster {
            pods: pods::parse_pod_metrics(results_dir, workload_prefix),
            runner: host::parse_system_metrics(results_dir),
        },
        Topology::Serverless => ResourceSnapshot::Serverless {
            cold_starts: cold_start::parse_cold_start_metrics(results_dir),
            runner: host::parse_system_metrics(results_dir),
        },
    }
}

/// Load aggregates keyed by concurrency level, for the levels that have one.
pub fn collect_load_tests(results_dir: &Path) -> BTreeMap<u32, LoadTestAggregate> {
    CONCURRENCY_LEVELS
        .iter()
        .filter_map(|&level| {
            load_test::parse_load_test_stats(results_dir, level).map(|stats| (level, stats))
        })
        .collect()
}

/// One row per level in `CONCURRENCY_LEVELS` that has load data, in level order.
/// Levels without data are skipped, never emitted as zero rows.
pub fn build_rows(
    timestamp: DateTime<Utc>,
    identity: &DeploymentIdentity,
    load_tests: &BTreeMap<u32, LoadTestAggregate>,
    resources: Arc<ResourceSnapshot>,
) -> anyhow::Result<Vec<BenchmarkRow>> {
    let mut rows = Vec::with_capacity(load_tests.len());
    for level in CONCURRENCY_LEVELS {
        let Some(stats) = load_tests.get(&level) else {
            continue;
        };
        rows.push(BenchmarkRow::new(
            timestamp,
            identity.clone(),
            level,
            stats.clone(),
            resources.clone(),
        )?);
        tracing::info!(
            cloud = %identity.cloud,
            category = %identity.category,
            concurrency = level,
            "parsed results"
        );
    }
    Ok(rows)
}

/// Everything in one results directory, as canonical rows.
#[instrument(
    skip(results_dir, identity),
    fields(operation = "collect_run", results_dir = %results_dir.display())
)]
pub fn collect_run(
    results_dir: &Path,
    topology: Topology,
    identity: &DeploymentIdentity,
    workload_prefix: &str,
    timestamp: DateTime<Utc>,
) -> anyhow::Result<Vec<BenchmarkRow>> {
    log_contents(results_dir);
    let resources = Arc::new(collect_resources(results_dir, topology, workload_prefix));
    let load_tests = collect_load_tests(results_dir);
    build_rows(timestamp, identity, &load_tests, resources)
}

/// Log the recognised artifacts in `results_dir`. Unreadable directories only warn.
fn log_contents(results_dir: &Path) {
    match scan_results_dir(results_dir) {
        Ok(found) => {
            let names: Vec<String> = found.iter().map(|(kind, _)| kind.file_name()).collect();
            tracing::info!(count = names.len(), artifacts = ?names, "results directory contents");
        }
        Err(e) => tracing::warn!(error = %e, "results directory unreadable"),
    }
}
