// Config loading and validation tests

use deploybench::config::AppConfig;

const VALID_CONFIG: &str = r#"
[sink]
path = "data/benchmarks.db"
spreadsheet_id = "bench-2025"

[sampler]
tick_count = 60
interval_secs = 2

[prober]
health_path = "/healthz"
burst_size = 4
burst_delay_ms = 500
cold_timeout_secs = 300
warm_timeout_secs = 60

[aggregator]
workload_prefix = "ml-api"
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.sink.path, "data/benchmarks.db");
    assert_eq!(config.sink.spreadsheet_id, "bench-2025");
    assert_eq!(config.sampler.tick_count, 60);
    assert_eq!(config.sampler.interval_secs, 2);
    assert_eq!(config.prober.health_path, "/healthz");
    assert_eq!(config.prober.burst_size, 4);
    assert_eq!(config.prober.burst_delay_ms, 500);
    assert_eq!(config.aggregator.workload_prefix, "ml-api");
}

#[test]
fn test_config_empty_uses_defaults() {
    let config = AppConfig::load_from_str("").expect("defaults");
    assert_eq!(config.sampler.tick_count, 180);
    assert_eq!(config.sampler.interval_secs, 1);
    assert_eq!(config.prober.health_path, "/health");
    assert_eq!(config.prober.burst_size, 3);
    assert_eq!(config.prober.cold_timeout_secs, 300);
    assert_eq!(config.prober.warm_timeout_secs, 60);
    assert_eq!(config.aggregator.workload_prefix, "ml-api");
}

#[test]
fn test_config_partial_section_keeps_other_defaults() {
    let config = AppConfig::load_from_str("[prober]\nburst_size = 5\n").expect("partial");
    assert_eq!(config.prober.burst_size, 5);
    assert_eq!(config.prober.health_path, "/health");
    assert_eq!(config.sink.path, "data/benchmarks.db");
}

#[test]
fn test_config_validation_rejects_empty_sink_path() {
    let bad = VALID_CONFIG.replace("path = \"data/benchmarks.db\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sink.path"));
}

#[test]
fn test_config_validation_rejects_empty_spreadsheet_id() {
    let bad = VALID_CONFIG.replace("spreadsheet_id = \"bench-2025\"", "spreadsheet_id = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sink.spreadsheet_id"));
}

#[test]
fn test_config_validation_rejects_tick_count_zero() {
    let bad = VALID_CONFIG.replace("tick_count = 60", "tick_count = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("tick_count"));
}

#[test]
fn test_config_validation_rejects_relative_health_path() {
    let bad = VALID_CONFIG.replace("health_path = \"/healthz\"", "health_path = \"healthz\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("health_path"));
}

#[test]
fn test_config_validation_rejects_burst_size_zero() {
    let bad = VALID_CONFIG.replace("burst_size = 4", "burst_size = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("burst_size"));
}

#[test]
fn test_config_validation_rejects_zero_timeouts() {
    let bad = VALID_CONFIG.replace("cold_timeout_secs = 300", "cold_timeout_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("cold_timeout_secs"));

    let bad = VALID_CONFIG.replace("warm_timeout_secs = 60", "warm_timeout_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("warm_timeout_secs"));
}

#[test]
fn test_config_validation_rejects_empty_workload_prefix() {
    let bad = VALID_CONFIG.replace("workload_prefix = \"ml-api\"", "workload_prefix = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("workload_prefix"));
}

#[test]
fn test_config_rejects_malformed_toml() {
    assert!(AppConfig::load_from_str("[sampler\ntick_count = ").is_err());
}
