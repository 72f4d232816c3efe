// Worksheet layouts: ordered columns, each with its value extractor.

use std::sync::LazyLock;

use crate::models::{BenchmarkRow, ColdStartStats, Stat, WarmStartStats, round_to};
use crate::sink::Cell;
use crate::topology::Topology;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub struct Column {
    pub header: &'static str,
    pub extract: fn(&BenchmarkRow) -> Cell,
}

pub struct SheetSchema {
    pub worksheet: &'static str,
    pub columns: Vec<Column>,
}

impl SheetSchema {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn header(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.to_string()).collect()
    }

    pub fn render(&self, row: &BenchmarkRow) -> Vec<Cell> {
        self.columns.iter().map(|c| (c.extract)(row)).collect()
    }
}

pub fn schema_for(topology: Topology) -> &'static SheetSchema {
    match topology {
        Topology::Instance => &*INSTANCE_SCHEMA,
        Topology::Cluster => &*CLUSTER_SCHEMA,
        Topology::Serverless => &*SERVERLESS_SCHEMA,
    }
}

fn col(header: &'static str, extract: fn(&BenchmarkRow) -> Cell) -> Column {
    Column { header, extract }
}

fn float2(v: f64) -> Cell {
    Cell::Float(round_to(v, 2))
}

fn opt2(v: Option<f64>) -> Cell {
    v.map(float2).into()
}

fn timestamp(r: &BenchmarkRow) -> Cell {
    r.timestamp().format(TIMESTAMP_FORMAT).to_string().into()
}

fn cloud(r: &BenchmarkRow) -> Cell {
    r.identity().cloud.as_str().into()
}

fn category(r: &BenchmarkRow) -> Cell {
    r.identity().category.as_str().into()
}

fn user_count(r: &BenchmarkRow) -> Cell {
    r.concurrency().into()
}

fn host_cpu(r: &BenchmarkRow) -> Option<Stat> {
    r.resources().host().and_then(|h| h.cpu)
}

fn host_memory(r: &BenchmarkRow) -> Option<Stat> {
    r.resources().host().and_then(|h| h.memory)
}

fn host_load(r: &BenchmarkRow) -> Option<Stat> {
    r.resources().host().and_then(|h| h.load)
}

fn load_columns() -> [Column; 11] {
    [
        col("Request Count", |r| r.load().request_count.into()),
        col("Failure Count", |r| r.load().failure_count.into()),
        col("Failure Rate (%)", |r| float2(r.failure_rate())),
        col("Median Response (ms)", |r| {
            float2(r.load().median_response_time)
        }),
        col("Avg Response (ms)", |r| float2(r.load().avg_response_time)),
        col("Min Response (ms)", |r| float2(r.load().min_response_time)),
        col("Max Response (ms)", |r| float2(r.load().max_response_time)),
        col("Requests/sec", |r| {
            Cell::Float(round_to(r.load().requests_per_sec, 4))
        }),
        col("P50 (ms)", |r| float2(r.load().p50)),
        col("P95 (ms)", |r| float2(r.load().p95)),
        col("P99 (ms)", |r| float2(r.load().p99)),
    ]
}

fn runner_columns() -> [Column; 2] {
    [
        col("Runner Avg CPU (%)", |r| opt2(host_cpu(r).map(|s| s.avg))),
        col("Runner Max CPU (%)", |r| opt2(host_cpu(r).map(|s| s.max))),
    ]
}

/// `head`, then the shared load columns, then `tail`.
fn assemble(worksheet: &'static str, head: Vec<Column>, tail: Vec<Column>) -> SheetSchema {
    let mut columns = head;
    columns.extend(load_columns());
    columns.extend(tail);
    SheetSchema { worksheet, columns }
}

// Instance sheets predate the category column and are kept at 20 columns.
pub static INSTANCE_SCHEMA: LazyLock<SheetSchema> = LazyLock::new(|| {
    assemble(
        "Benchmark Results",
        vec![
            col("Timestamp", timestamp),
            col("Cloud Provider", cloud),
            col("User Count", user_count),
        ],
        vec![
            col("Avg CPU (%)", |r| opt2(host_cpu(r).map(|s| s.avg))),
            col("Max CPU (%)", |r| opt2(host_cpu(r).map(|s| s.max))),
            col("Avg Memory (%)", |r| opt2(host_memory(r).map(|s| s.avg))),
            col("Max Memory (%)", |r| opt2(host_memory(r).map(|s| s.max))),
            col("Avg Load", |r| opt2(host_load(r).map(|s| s.avg))),
            col("Max Load", |r| opt2(host_load(r).map(|s| s.max))),
        ],
    )
});

pub static CLUSTER_SCHEMA: LazyLock<SheetSchema> = LazyLock::new(|| {
    let mut tail = vec![
        col("Pod Count", |r| {
            r.resources().pods().map(|p| p.pod_count).into()
        }),
        col("Avg CPU (millicores)", |r| {
            opt2(r.resources().pods().map(|p| p.avg_cpu_millicores))
        }),
        col("Total CPU (millicores)", |r| {
            r.resources().pods().map(|p| p.total_cpu_millicores).into()
        }),
        col("Avg Memory (Mi)", |r| {
            opt2(r.resources().pods().map(|p| p.avg_memory_mi))
        }),
        col("Total Memory (Mi)", |r| {
            r.resources().pods().map(|p| p.total_memory_mi).into()
        }),
    ];
    tail.extend(runner_columns());
    assemble(
        "K8s Benchmark Results",
        vec![
            col("Timestamp", timestamp),
            col("Cloud Provider", cloud),
            col("Deployment Type", category),
            col("User Count", user_count),
        ],
        tail,
    )
});

pub static SERVERLESS_SCHEMA: LazyLock<SheetSchema> = LazyLock::new(|| {
    let mut tail = vec![
        col("Cold Start Count", |r| cold(r).map(|c| c.count).into()),
        col("Cold Start Avg (ms)", |r| opt2(cold(r).map(|c| c.avg_ms))),
        col("Cold Start Max (ms)", |r| opt2(cold(r).map(|c| c.max_ms))),
        col("Cold Start Min (ms)", |r| opt2(cold(r).map(|c| c.min_ms))),
        col("Warm Start Count", |r| warm(r).map(|w| w.count).into()),
        col("Warm Start Avg (ms)", |r| opt2(warm(r).map(|w| w.avg_ms))),
    ];
    tail.extend(runner_columns());
    assemble(
        "Serverless Benchmark Results",
        vec![
            col("Timestamp", timestamp),
            col("Cloud Provider", cloud),
            col("Service Type", category),
            col("User Count", user_count),
        ],
        tail,
    )
});

fn cold(r: &BenchmarkRow) -> Option<&ColdStartStats> {
    r.resources().cold_starts().and_then(|s| s.cold.as_ref())
}

fn warm(r: &BenchmarkRow) -> Option<&WarmStartStats> {
    r.resources().cold_starts().and_then(|s| s.warm.as_ref())
}
