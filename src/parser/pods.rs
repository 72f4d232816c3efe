// Cluster pod resources from a `kubectl top pods` dump:
//
//   NAME            CPU(cores)   MEMORY(bytes)
//   ml-api-7f9c-x   100m         256Mi
//
// or a single sentinel line when the metrics server had nothing to report.

use std::io::Read;
use std::path::Path;

use super::{ArtifactKind, coerce, open_artifact};
use crate::models::PodMetrics;

/// First line written in place of the table when metrics are unavailable.
pub const UNAVAILABLE_SENTINEL: &str = "Metrics not available";

const MILLICORES_PER_CORE: f64 = 1000.0;
/// Fixed Gi -> Mi factor used by the published sheets (decimal, not 1024).
const MI_PER_GI: f64 = 1000.0;
const KI_PER_MI: f64 = 1024.0;

pub fn parse_pod_metrics(results_dir: &Path, workload_prefix: &str) -> Option<PodMetrics> {
    let path = ArtifactKind::PodMetrics.path_in(results_dir);
    let mut file = open_artifact(&path)?;
    let mut text = String::new();
    if let Err(e) = file.read_to_string(&mut text) {
        tracing::warn!(error = %e, path = %path.display(), "error reading pod metrics");
        return None;
    }
    let metrics = parse_pod_metrics_str(&text, workload_prefix);
    if metrics.is_none() {
        tracing::warn!(path = %path.display(), "no pod metrics for workload");
    }
    metrics
}

/// None for the sentinel, a header-only dump, or no pod matching `workload_prefix`.
pub fn parse_pod_metrics_str(text: &str, workload_prefix: &str) -> Option<PodMetrics> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 2 || lines[0].contains(UNAVAILABLE_SENTINEL) {
        return None;
    }

    let mut total_cpu = 0.0;
    let mut total_memory = 0.0;
    let mut pod_count = 0u32;
    for line in &lines[1..] {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 || !parts[0].starts_with(workload_prefix) {
            continue;
        }
        total_cpu += parse_cpu_millicores(parts[1]).unwrap_or(0.0);
        total_memory += parse_memory_mi(parts[2]).unwrap_or(0.0);
        pod_count += 1;
    }
    if pod_count == 0 {
        return None;
    }

    Some(PodMetrics {
        pod_count,
        total_cpu_millicores: total_cpu.round() as u64,
        avg_cpu_millicores: total_cpu / pod_count as f64,
        total_memory_mi: total_memory.round() as u64,
        avg_memory_mi: total_memory / pod_count as f64,
    })
}

/// "250m" -> 250; a bare number is whole cores ("2" -> 2000).
pub fn parse_cpu_millicores(value: &str) -> Option<f64> {
    let v = match value.strip_suffix('m') {
        Some(milli) => coerce::<f64>(milli)?,
        None => coerce::<f64>(value)? * MILLICORES_PER_CORE,
    };
    (v.is_finite() && v >= 0.0).then_some(v)
}

/// "256Mi" -> 256, "1Gi" -> 1000, "512Ki" -> 0.5; a bare number is taken as Mi.
pub fn parse_memory_mi(value: &str) -> Option<f64> {
    let v = if let Some(mi) = value.strip_suffix("Mi") {
        coerce::<f64>(mi)?
    } else if let Some(gi) = value.strip_suffix("Gi") {
        coerce::<f64>(gi)? * MI_PER_GI
    } else if let Some(ki) = value.strip_suffix("Ki") {
        coerce::<f64>(ki)? / KI_PER_MI
    } else {
        coerce::<f64>(value)?
    };
    (v.is_finite() && v >= 0.0).then_some(v)
}
