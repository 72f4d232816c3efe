// Shared test helpers
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use deploybench::models::*;
use deploybench::topology::{DeploymentIdentity, Topology};

pub const LOCUST_HEADER: &str = "Type,Name,Request Count,Failure Count,Median Response Time,Average Response Time,Min Response Time,Max Response Time,Average Content Size,Requests/s,Failures/s,50%,66%,75%,80%,90%,95%,98%,99%,99.9%,99.99%,100%";

/// A locust stats file with one endpoint row and the "Aggregated" row.
pub fn locust_stats(request_count: u64, failure_count: u64) -> String {
    format!(
        "{LOCUST_HEADER}\n\
         GET,/predict,{request_count},{failure_count},42,45.5,10,300,120,12.5,0,42,50,55,60,80,95,110,150,250,300,300\n\
         ,Aggregated,{request_count},{failure_count},42,45.5,10,300,120,12.5,0,42,50,55,60,80,95,110,150,250,300,300\n"
    )
}

pub fn write_file(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

pub fn write_locust(dir: &Path, level: u32, request_count: u64, failure_count: u64) {
    write_file(
        dir,
        &format!("locust_{level}_stats.csv"),
        &locust_stats(request_count, failure_count),
    );
}

pub fn load(request_count: u64, failure_count: u64) -> LoadTestAggregate {
    LoadTestAggregate {
        request_count,
        failure_count,
        median_response_time: 42.0,
        avg_response_time: 45.5,
        min_response_time: 10.0,
        max_response_time: 300.0,
        requests_per_sec: 12.5,
        p50: 42.0,
        p95: 95.0,
        p99: 150.0,
    }
}

pub fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
}

pub fn instance_row(provider: &str, concurrency: u32) -> BenchmarkRow {
    BenchmarkRow::new(
        fixed_time(),
        Topology::Instance.identity(provider),
        concurrency,
        load(1000, 10),
        Arc::new(ResourceSnapshot::Instance {
            host: Some(HostMetrics {
                cpu: Some(Stat { avg: 41.234, max: 88.0 }),
                memory: Some(Stat { avg: 60.0, max: 61.5 }),
                load: Some(Stat { avg: 1.25, max: 2.0 }),
            }),
        }),
    )
    .unwrap()
}

pub fn identity(cloud: &str, category: &str) -> DeploymentIdentity {
    DeploymentIdentity {
        cloud: cloud.into(),
        category: category.into(),
    }
}
