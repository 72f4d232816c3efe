// Artifact parsers. Each reader normalizes one tool's output into a typed record;
// missing files and malformed rows degrade to "no data" and never fail the run.

pub mod coerce;
pub mod cold_start;
pub mod host;
pub mod pods;

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

pub use coerce::{coerce, safe_float, safe_int};

const SYSTEM_METRICS_FILE: &str = "system_metrics.csv";
const INSTANCE_METRICS_FILE: &str = "instance_metrics.csv";
const POD_METRICS_FILE: &str = "k8s_pod_metrics.txt";
const COLD_START_FILE: &str = "cold_start_metrics.csv";
const LOAD_TEST_PREFIX: &str = "locust_";
const LOAD_TEST_SUFFIX: &str = "_stats.csv";

/// Input schemas, keyed by the file-naming convention of a results directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Load generator aggregate for one concurrency level.
    LoadTestStats(u32),
    /// Load-runner host series.
    SystemMetrics,
    /// Instance-under-test series, with load average.
    InstanceMetrics,
    /// `kubectl top pods` dump.
    PodMetrics,
    ColdStartMetrics,
}

impl ArtifactKind {
    pub fn file_name(&self) -> String {
        match self {
            ArtifactKind::LoadTestStats(n) => format!("{LOAD_TEST_PREFIX}{n}{LOAD_TEST_SUFFIX}"),
            ArtifactKind::SystemMetrics => SYSTEM_METRICS_FILE.into(),
            ArtifactKind::InstanceMetrics => INSTANCE_METRICS_FILE.into(),
            ArtifactKind::PodMetrics => POD_METRICS_FILE.into(),
            ArtifactKind::ColdStartMetrics => COLD_START_FILE.into(),
        }
    }

    pub fn path_in(&self, results_dir: &Path) -> PathBuf {
        results_dir.join(self.file_name())
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            SYSTEM_METRICS_FILE => Some(ArtifactKind::SystemMetrics),
            INSTANCE_METRICS_FILE => Some(ArtifactKind::InstanceMetrics),
            POD_METRICS_FILE => Some(ArtifactKind::PodMetrics),
            COLD_START_FILE => Some(ArtifactKind::ColdStartMetrics),
            _ => name
                .strip_prefix(LOAD_TEST_PREFIX)?
                .strip_suffix(LOAD_TEST_SUFFIX)?
                .parse()
                .ok()
                .map(ArtifactKind::LoadTestStats),
        }
    }
}

/// Classify every recognised file in `results_dir`, sorted by file name.
pub fn scan_results_dir(results_dir: &Path) -> anyhow::Result<Vec<(ArtifactKind, PathBuf)>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(results_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(kind) = name.to_str().and_then(ArtifactKind::from_file_name) {
            found.push((kind, entry.path()));
        }
    }
    found.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(found)
}

/// Open an artifact; a missing or unreadable file is logged and reported as None.
pub(crate) fn open_artifact(path: &Path) -> Option<File> {
    match File::open(path) {
        Ok(f) => Some(f),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "artifact not found");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "artifact unreadable");
            None
        }
    }
}

/// Header-addressed CSV rows. Short rows and absent columns read as "".
pub(crate) struct CsvTable {
    columns: HashMap<String, usize>,
    rows: Vec<csv::StringRecord>,
}

impl CsvTable {
    pub(crate) fn read<R: Read>(reader: R) -> Option<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = match rdr.headers() {
            Ok(h) => h.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable csv header");
                return None;
            }
        };
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i))
            .collect();
        let mut rows = Vec::new();
        for (line, record) in rdr.records().enumerate() {
            match record {
                Ok(r) => rows.push(r),
                Err(e) => tracing::warn!(error = %e, row = line + 1, "skipping malformed csv row"),
            }
        }
        Some(Self { columns, rows })
    }

    pub(crate) fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = CsvRow<'_>> {
        self.rows.iter().map(move |record| CsvRow {
            columns: &self.columns,
            record,
        })
    }
}

pub(crate) struct CsvRow<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a csv::StringRecord,
}

impl<'a> CsvRow<'a> {
    pub(crate) fn get(&self, column: &str) -> &'a str {
        self.columns
            .get(column)
            .and_then(|&i| self.record.get(i))
            .unwrap_or("")
    }
}
