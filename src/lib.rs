// Library for tests to access modules

pub mod aggregator;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod prober;
pub mod publisher;
pub mod sampler;
pub mod sink;
pub mod sysinfo_repo;
pub mod topology;
pub mod version;
