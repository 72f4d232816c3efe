// Artifact parser tests: coercion, load stats, host series, pod dumps, cold starts

mod common;

use deploybench::models::{ColdStartEvent, RequestType, Stat};
use deploybench::parser::cold_start::{
    parse_cold_start_metrics, parse_cold_start_reader, summarize_events,
};
use deploybench::parser::host::{parse_host_reader, parse_instance_metrics, parse_system_metrics};
use deploybench::parser::load_test::{parse_load_test_reader, parse_load_test_stats};
use deploybench::parser::pods::{
    parse_cpu_millicores, parse_memory_mi, parse_pod_metrics, parse_pod_metrics_str,
};
use deploybench::parser::{ArtifactKind, coerce, safe_float, safe_int, scan_results_dir};
use tempfile::TempDir;

#[test]
fn safe_float_handles_markers_and_blanks() {
    assert_eq!(safe_float("N/A", 0.0), 0.0);
    assert_eq!(safe_float("12.5", 0.0), 12.5);
    assert_eq!(safe_float("", 7.0), 7.0);
    assert_eq!(safe_float("  3.25 ", 0.0), 3.25);
    assert_eq!(safe_float("abc", -1.0), -1.0);
    assert_eq!(safe_float("NaN", 0.0), 0.0);
    assert_eq!(safe_float("inf", 0.0), 0.0);
}

#[test]
fn safe_int_accepts_integral_floats_only() {
    assert_eq!(safe_int("42", 0), 42);
    assert_eq!(safe_int("12.0", 0), 12);
    assert_eq!(safe_int("12.5", 9), 9);
    assert_eq!(safe_int("-3", 9), 9);
    assert_eq!(safe_int("N/A", 5), 5);
    assert_eq!(safe_int("", 0), 0);
}

#[test]
fn coerce_is_none_for_unparseable() {
    assert_eq!(coerce::<u32>("17"), Some(17));
    assert_eq!(coerce::<u32>("N/A"), None);
    assert_eq!(coerce::<u32>("x"), None);
}

#[test]
fn load_test_reader_picks_aggregated_row() {
    let stats = parse_load_test_reader(common::locust_stats(1000, 10).as_bytes()).unwrap();
    assert_eq!(stats.request_count, 1000);
    assert_eq!(stats.failure_count, 10);
    assert_eq!(stats.median_response_time, 42.0);
    assert_eq!(stats.avg_response_time, 45.5);
    assert_eq!(stats.min_response_time, 10.0);
    assert_eq!(stats.max_response_time, 300.0);
    assert_eq!(stats.requests_per_sec, 12.5);
    assert_eq!(stats.p50, 42.0);
    assert_eq!(stats.p95, 95.0);
    assert_eq!(stats.p99, 150.0);
}

#[test]
fn load_test_reader_without_aggregated_row_is_none() {
    let csv = format!(
        "{}\nGET,/predict,5,0,1,1,1,1,1,1,0,1,1,1,1,1,1,1,1,1,1,1\n",
        common::LOCUST_HEADER
    );
    assert!(parse_load_test_reader(csv.as_bytes()).is_none());
}

#[test]
fn load_test_reader_defaults_unparseable_cells() {
    let csv = format!(
        "{}\n,Aggregated,N/A,,N/A,N/A,N/A,N/A,0,N/A,0,N/A,N/A,N/A,N/A,N/A,N/A,N/A,N/A,N/A,N/A,N/A\n",
        common::LOCUST_HEADER
    );
    let stats = parse_load_test_reader(csv.as_bytes()).unwrap();
    assert_eq!(stats.request_count, 0);
    assert_eq!(stats.failure_count, 0);
    assert_eq!(stats.p99, 0.0);
}

#[test]
fn load_test_stats_missing_file_is_none() {
    let dir = TempDir::new().unwrap();
    assert!(parse_load_test_stats(dir.path(), 10).is_none());
    common::write_locust(dir.path(), 10, 50, 1);
    assert_eq!(parse_load_test_stats(dir.path(), 10).unwrap().request_count, 50);
}

const HOST_CSV: &str = "timestamp,cpu_percent,memory_percent,load_avg_1m
1.0,10,50,0.5
2.0,,,
3.0,30,70,1.5
";

#[test]
fn host_reader_skips_missing_samples() {
    let metrics = parse_host_reader(HOST_CSV.as_bytes(), true).unwrap();
    assert_eq!(metrics.cpu, Some(Stat { avg: 20.0, max: 30.0 }));
    assert_eq!(metrics.memory, Some(Stat { avg: 60.0, max: 70.0 }));
    assert_eq!(metrics.load, Some(Stat { avg: 1.0, max: 1.5 }));
}

#[test]
fn host_reader_without_load_average_ignores_column() {
    let metrics = parse_host_reader(HOST_CSV.as_bytes(), false).unwrap();
    assert!(metrics.load.is_none());
    assert!(metrics.cpu.is_some());
}

#[test]
fn host_reader_all_missing_is_none() {
    let csv = "timestamp,cpu_percent,memory_percent\n1.0,,\n2.0,,\n";
    assert!(parse_host_reader(csv.as_bytes(), false).is_none());
}

#[test]
fn host_files_are_read_by_role() {
    let dir = TempDir::new().unwrap();
    assert!(parse_system_metrics(dir.path()).is_none());
    common::write_file(dir.path(), "system_metrics.csv", HOST_CSV);
    common::write_file(dir.path(), "instance_metrics.csv", HOST_CSV);
    assert!(parse_system_metrics(dir.path()).unwrap().load.is_none());
    assert!(parse_instance_metrics(dir.path()).unwrap().load.is_some());
}

#[test]
fn pod_dump_sums_matching_pods() {
    let text = "NAME CPU(cores) MEMORY(bytes)\nml-api-abc 100m 256Mi\nml-api-def 50m 1Gi\n";
    let pods = parse_pod_metrics_str(text, "ml-api").unwrap();
    assert_eq!(pods.pod_count, 2);
    assert_eq!(pods.total_cpu_millicores, 150);
    assert_eq!(pods.total_memory_mi, 1256);
    assert_eq!(pods.avg_cpu_millicores, 75.0);
    assert_eq!(pods.avg_memory_mi, 628.0);
}

#[test]
fn pod_dump_ignores_other_workloads() {
    let text = "NAME CPU(cores) MEMORY(bytes)\nml-api-abc 100m 256Mi\ncoredns-xyz 3m 12Mi\n";
    let pods = parse_pod_metrics_str(text, "ml-api").unwrap();
    assert_eq!(pods.pod_count, 1);
    assert_eq!(pods.total_cpu_millicores, 100);
}

#[test]
fn pod_dump_sentinel_and_empty_are_none() {
    assert!(parse_pod_metrics_str("Metrics not available\n", "ml-api").is_none());
    let sentinel_with_rows = "Metrics not available\nml-api-abc 1m 1Mi\n";
    assert!(parse_pod_metrics_str(sentinel_with_rows, "ml-api").is_none());
    assert!(parse_pod_metrics_str("NAME CPU(cores) MEMORY(bytes)\n", "ml-api").is_none());
    assert!(parse_pod_metrics_str("", "ml-api").is_none());
    assert!(parse_pod_metrics_str("NAME CPU MEM\nother-1 1m 1Mi\n", "ml-api").is_none());
}

#[test]
fn pod_units_convert() {
    assert_eq!(parse_cpu_millicores("250m"), Some(250.0));
    assert_eq!(parse_cpu_millicores("2"), Some(2000.0));
    assert_eq!(parse_cpu_millicores("xm"), None);
    assert_eq!(parse_memory_mi("256Mi"), Some(256.0));
    assert_eq!(parse_memory_mi("2Gi"), Some(2000.0));
    assert_eq!(parse_memory_mi("512Ki"), Some(0.5));
    assert_eq!(parse_memory_mi("64"), Some(64.0));
    assert_eq!(parse_memory_mi("lots"), None);
}

#[test]
fn pod_metrics_file_missing_is_none() {
    let dir = TempDir::new().unwrap();
    assert!(parse_pod_metrics(dir.path(), "ml-api").is_none());
    common::write_file(
        dir.path(),
        "k8s_pod_metrics.txt",
        "NAME CPU(cores) MEMORY(bytes)\nml-api-abc 100m 256Mi\n",
    );
    assert_eq!(parse_pod_metrics(dir.path(), "ml-api").unwrap().pod_count, 1);
}

const COLD_CSV: &str = "timestamp,test_number,request_type,is_cold_start,response_time_ms,success
2025-03-14T09:00:00.000000,1,cold_start,True,1500.0,True
2025-03-14T09:00:01.000000,1,warm_start,False,50,True
2025-03-14T09:00:02.000000,1,warm_start,False,70,True
2025-03-14T09:01:00.000000,2,cold_start,true,2500,False
2025-03-14T09:01:01.000000,2,warm_start,False,N/A,False
";

#[test]
fn cold_start_reader_splits_by_flag() {
    let summary = parse_cold_start_reader(COLD_CSV.as_bytes()).unwrap();
    let cold = summary.cold.unwrap();
    assert_eq!(cold.count, 2);
    assert_eq!(cold.avg_ms, 2000.0);
    assert_eq!(cold.min_ms, 1500.0);
    assert_eq!(cold.max_ms, 2500.0);
    let warm = summary.warm.unwrap();
    assert_eq!(warm.count, 3);
    assert_eq!(warm.avg_ms, 40.0);
}

#[test]
fn cold_start_reader_header_only_is_none() {
    let csv = "timestamp,test_number,request_type,is_cold_start,response_time_ms,success\n";
    assert!(parse_cold_start_reader(csv.as_bytes()).is_none());
}

#[test]
fn cold_start_metrics_from_dir() {
    let dir = TempDir::new().unwrap();
    assert!(parse_cold_start_metrics(dir.path()).is_none());
    common::write_file(dir.path(), "cold_start_metrics.csv", COLD_CSV);
    assert!(parse_cold_start_metrics(dir.path()).is_some());
}

#[test]
fn summarize_events_warm_only() {
    let events = vec![ColdStartEvent {
        timestamp: "t".into(),
        test_number: 1,
        request_type: RequestType::Warm,
        response_time_ms: 12.0,
        success: true,
    }];
    let summary = summarize_events(&events).unwrap();
    assert!(summary.cold.is_none());
    assert_eq!(summary.warm.unwrap().count, 1);
    assert!(summarize_events(&[]).is_none());
}

#[test]
fn artifact_kinds_round_trip_file_names() {
    assert_eq!(ArtifactKind::LoadTestStats(100).file_name(), "locust_100_stats.csv");
    assert_eq!(
        ArtifactKind::from_file_name("locust_2000_stats.csv"),
        Some(ArtifactKind::LoadTestStats(2000))
    );
    assert_eq!(
        ArtifactKind::from_file_name("k8s_pod_metrics.txt"),
        Some(ArtifactKind::PodMetrics)
    );
    assert_eq!(ArtifactKind::from_file_name("locust_x_stats.csv"), None);
    assert_eq!(ArtifactKind::from_file_name("notes.md"), None);
}

#[test]
fn scan_results_dir_lists_known_artifacts() {
    let dir = TempDir::new().unwrap();
    common::write_locust(dir.path(), 1, 10, 0);
    common::write_file(dir.path(), "system_metrics.csv", HOST_CSV);
    common::write_file(dir.path(), "README.txt", "ignored");
    let found: Vec<ArtifactKind> = scan_results_dir(dir.path())
        .unwrap()
        .into_iter()
        .map(|(kind, _)| kind)
        .collect();
    assert_eq!(
        found,
        vec![ArtifactKind::LoadTestStats(1), ArtifactKind::SystemMetrics]
    );
}
