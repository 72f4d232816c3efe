// Cold/warm reduction over probe events, from memory or cold_start_metrics.csv.

use std::io::Read;
use std::path::Path;

use super::{ArtifactKind, CsvTable, open_artifact, safe_float};
use crate::models::{ColdStartEvent, ColdStartStats, ColdStartSummary, WarmStartStats};

pub fn parse_cold_start_metrics(results_dir: &Path) -> Option<ColdStartSummary> {
    let file = open_artifact(&ArtifactKind::ColdStartMetrics.path_in(results_dir))?;
    parse_cold_start_reader(file)
}

/// Rows are classified by `is_cold_start` ("true", any case); unparseable times count as 0.
pub fn parse_cold_start_reader<R: Read>(reader: R) -> Option<ColdStartSummary> {
    let table = CsvTable::read(reader)?;
    summarize(table.rows().map(|row| {
        (
            row.get("is_cold_start").eq_ignore_ascii_case("true"),
            safe_float(row.get("response_time_ms"), 0.0),
        )
    }))
}

pub fn summarize_events(events: &[ColdStartEvent]) -> Option<ColdStartSummary> {
    summarize(
        events
            .iter()
            .map(|e| (e.request_type.is_cold(), e.response_time_ms)),
    )
}

/// Reduce (is_cold, response_time_ms) pairs. None when there are no events at all.
pub fn summarize(samples: impl IntoIterator<Item = (bool, f64)>) -> Option<ColdStartSummary> {
    let (cold, warm): (Vec<_>, Vec<_>) = samples.into_iter().partition(|(is_cold, _)| *is_cold);
    let cold: Vec<f64> = cold.into_iter().map(|(_, ms)| ms).collect();
    let warm: Vec<f64> = warm.into_iter().map(|(_, ms)| ms).collect();

    let summary = ColdStartSummary {
        cold: (!cold.is_empty()).then(|| ColdStartStats {
            count: cold.len() as u32,
            avg_ms: mean(&cold),
            min_ms: cold.iter().copied().fold(f64::INFINITY, f64::min),
            max_ms: cold.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }),
        warm: (!warm.is_empty()).then(|| WarmStartStats {
            count: warm.len() as u32,
            avg_ms: mean(&warm),
        }),
    };
    if summary.cold.is_none() && summary.warm.is_none() {
        return None;
    }
    Some(summary)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
