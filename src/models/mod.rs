// Domain models: producer records, parsed aggregates, canonical rows

mod cold_start;
mod load_test;
mod resources;
mod row;
mod sample;

pub use cold_start::{ColdStartEvent, RequestType};
pub use load_test::LoadTestAggregate;
pub use resources::{
    ColdStartStats, ColdStartSummary, HostMetrics, PodMetrics, ResourceSnapshot, Stat,
    WarmStartStats,
};
pub use row::{BenchmarkRow, CONCURRENCY_LEVELS, failure_rate, round_to};
pub use sample::SampleRecord;
