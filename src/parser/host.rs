// Host time series (system_metrics.csv, instance_metrics.csv) reduced to avg/max.

use std::io::Read;
use std::path::Path;

use super::{ArtifactKind, CsvTable, coerce, open_artifact};
use crate::models::{HostMetrics, Stat};

/// Load-runner series; load average is ignored even if present.
pub fn parse_system_metrics(results_dir: &Path) -> Option<HostMetrics> {
    let file = open_artifact(&ArtifactKind::SystemMetrics.path_in(results_dir))?;
    parse_host_reader(file, false)
}

/// Instance-under-test series, including the 1-minute load average.
pub fn parse_instance_metrics(results_dir: &Path) -> Option<HostMetrics> {
    let file = open_artifact(&ArtifactKind::InstanceMetrics.path_in(results_dir))?;
    parse_host_reader(file, true)
}

/// Missing cells (failed samples) are skipped, not averaged in as zero.
/// None when no field has a single value.
pub fn parse_host_reader<R: Read>(reader: R, with_load_average: bool) -> Option<HostMetrics> {
    let table = CsvTable::read(reader)?;
    let with_load_average = with_load_average && table.has_column("load_avg_1m");

    let mut cpu = Vec::new();
    let mut memory = Vec::new();
    let mut load = Vec::new();
    for row in table.rows() {
        cpu.extend(finite(row.get("cpu_percent")));
        memory.extend(finite(row.get("memory_percent")));
        if with_load_average {
            load.extend(finite(row.get("load_avg_1m")));
        }
    }

    let metrics = HostMetrics {
        cpu: Stat::from_values(&cpu),
        memory: Stat::from_values(&memory),
        load: Stat::from_values(&load),
    };
    if metrics.cpu.is_none() && metrics.memory.is_none() && metrics.load.is_none() {
        return None;
    }
    Some(metrics)
}

fn finite(cell: &str) -> Option<f64> {
    coerce::<f64>(cell).filter(|v| v.is_finite())
}
