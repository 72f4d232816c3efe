// Periodic host sampler. One reading per tick, paced in real time; a failed reading
// becomes a missing-value sample and the run continues.

use std::fs::File;
use std::future::Future;
use std::path::Path;

use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};
use tracing::instrument;

use crate::models::{SampleRecord, round_to};

/// One successful host reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostReading {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub load_avg_1m: Option<f64>,
}

/// Where readings come from. Implemented by `SysinfoRepo`; tests substitute their own.
pub trait HostMetricsSource {
    fn read(&self) -> impl Future<Output = anyhow::Result<HostReading>> + Send;
}

pub struct Sampler<S> {
    source: S,
}

impl<S: HostMetricsSource> Sampler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Collect `tick_count` samples, `interval` apart.
    pub async fn run(&self, tick_count: u32, interval: Duration) -> Vec<SampleRecord> {
        let mut out = Vec::with_capacity(tick_count as usize);
        let collected = self
            .run_with(tick_count, interval, |r| {
                out.push(r.clone());
                Ok(())
            })
            .await;
        if let Err(e) = collected {
            tracing::warn!(error = %e, "sampling ended early");
        }
        out
    }

    /// Like `run`, handing each sample to `on_sample` as soon as it is taken.
    /// Errors from `on_sample` (e.g. the output file) end the run; sampling errors do not.
    #[instrument(skip(self, on_sample), fields(operation = "sample"))]
    pub async fn run_with<F>(
        &self,
        tick_count: u32,
        interval: Duration,
        mut on_sample: F,
    ) -> anyhow::Result<usize>
    where
        F: FnMut(&SampleRecord) -> anyhow::Result<()>,
    {
        let mut tick = ticker(interval);
        let mut missing = 0usize;
        for _ in 0..tick_count {
            if let Some(t) = tick.as_mut() {
                t.tick().await;
            }
            let record = self.sample_once().await;
            if record.is_missing() {
                missing += 1;
            }
            on_sample(&record)?;
        }
        tracing::info!(
            samples = tick_count,
            missing_samples = missing,
            "sampling complete"
        );
        Ok(tick_count as usize)
    }

    async fn sample_once(&self) -> SampleRecord {
        let timestamp = unix_seconds();
        match self.source.read().await {
            Ok(r) => SampleRecord {
                timestamp,
                cpu_percent: Some(r.cpu_percent),
                memory_percent: Some(r.memory_percent),
                load_avg_1m: r.load_avg_1m,
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    operation = "read_host_metrics",
                    "host sample failed; recording missing values"
                );
                SampleRecord::missing(timestamp)
            }
        }
    }
}

/// First tick fires one interval from now; none at all for a zero interval.
fn ticker(interval: Duration) -> Option<tokio::time::Interval> {
    if interval.is_zero() {
        return None;
    }
    let mut t = interval_at(Instant::now() + interval, interval);
    t.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(t)
}

fn unix_seconds() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| round_to(d.as_secs_f64(), 3))
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0.0
        })
}

/// Streams samples to CSV, flushing after every row.
pub struct SampleWriter {
    writer: csv::Writer<File>,
    with_load_average: bool,
}

impl SampleWriter {
    pub fn create(path: &Path, with_load_average: bool) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)
            .map_err(|e| anyhow::anyhow!("create {}: {}", path.display(), e))?;
        let mut header = vec!["timestamp", "cpu_percent", "memory_percent"];
        if with_load_average {
            header.push("load_avg_1m");
        }
        writer.write_record(&header)?;
        writer.flush()?;
        Ok(Self {
            writer,
            with_load_average,
        })
    }

    pub fn write(&mut self, record: &SampleRecord) -> anyhow::Result<()> {
        let mut row = vec![
            record.timestamp.to_string(),
            optional_cell(record.cpu_percent),
            optional_cell(record.memory_percent),
        ];
        if self.with_load_average {
            row.push(optional_cell(record.load_avg_1m));
        }
        self.writer.write_record(&row)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn optional_cell(v: Option<f64>) -> String {
    v.map(|x| round_to(x, 2).to_string()).unwrap_or_default()
}
