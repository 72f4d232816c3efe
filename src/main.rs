use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use deploybench::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

use deploybench::error::InvocationError;
use deploybench::sink::TabularSink;
use deploybench::topology::Topology;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[derive(Parser)]
#[command(name = "deploybench")]
#[command(about = "Deployment benchmark orchestration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample host CPU and memory into a CSV file
    Sample {
        /// Number of samples (defaults to sampler.tick_count)
        #[arg(long)]
        ticks: Option<u32>,

        /// Seconds between samples (defaults to sampler.interval_secs)
        #[arg(long)]
        interval: Option<u64>,

        /// Also record the 1-minute load average
        #[arg(long)]
        load_average: bool,

        /// Output file (default: system_metrics.csv, or instance_metrics.csv with --load-average)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Measure cold and warm start latency of an endpoint
    Probe {
        /// Base URL of the deployed service
        endpoint: String,

        /// CSV file to write events to
        output_file: PathBuf,

        /// Number of cold-start cycles
        #[arg(default_value = "5")]
        test_count: u32,

        /// Idle seconds before each cold probe
        #[arg(default_value = "60")]
        idle_seconds: u64,
    },

    /// Aggregate a results directory and append it to the results sheet
    Publish {
        /// Deployment identifier (e.g. aws, gcp-gke, aws-lambda)
        provider: String,

        /// Directory holding the run's artifacts
        results_dir: PathBuf,
    },

    /// Print a worksheet as CSV
    Export {
        /// Worksheet name (e.g. "Benchmark Results")
        worksheet: String,
    },

    /// Print the version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    match cli.command {
        Commands::Sample {
            ticks,
            interval,
            load_average,
            output,
        } => {
            let ticks = ticks.unwrap_or(app_config.sampler.tick_count);
            let interval_secs = interval.unwrap_or(app_config.sampler.interval_secs);
            let interval = Duration::from_secs(interval_secs);
            let output = output.unwrap_or_else(|| {
                let kind = if load_average {
                    parser::ArtifactKind::InstanceMetrics
                } else {
                    parser::ArtifactKind::SystemMetrics
                };
                PathBuf::from(kind.file_name())
            });
            run_sampler(ticks, interval, load_average, output).await?;
        }
        Commands::Probe {
            endpoint,
            output_file,
            test_count,
            idle_seconds,
        } => {
            let client =
                prober::HttpLivenessClient::new(&endpoint, &app_config.prober.health_path)?;
            tracing::info!(
                url = %client.url(),
                test_count,
                idle_seconds,
                "starting cold-start probe"
            );
            let config = prober::ProberConfig::new(&app_config.prober, test_count, idle_seconds);
            prober::ColdStartProber::new(client, config)
                .run_to_file(&output_file)
                .await?;
        }
        Commands::Publish {
            provider,
            results_dir,
        } => {
            let topology = validate_publish_args(&provider, &results_dir);
            let identity = topology.identity(&provider);
            tracing::info!(
                provider = %provider,
                topology = %topology,
                cloud = %identity.cloud,
                category = %identity.category,
                results_dir = %results_dir.display(),
                "publishing results"
            );
            let rows = aggregator::collect_run(
                &results_dir,
                topology,
                &identity,
                &app_config.aggregator.workload_prefix,
                chrono::Utc::now(),
            )?;
            let sink =
                sink::SqliteSink::connect(&app_config.sink.path, &app_config.sink.spreadsheet_id)
                    .await?;
            sink.init().await?;
            let report = publisher::Publisher::new(sink).publish(topology, &rows).await?;
            tracing::info!(
                worksheet = %report.worksheet,
                created = report.created,
                header_widened = report.header_widened,
                rows_appended = report.rows_appended,
                "publish complete"
            );
        }
        Commands::Export { worksheet } => {
            let sink =
                sink::SqliteSink::connect(&app_config.sink.path, &app_config.sink.spreadsheet_id)
                    .await?;
            sink.init().await?;
            let header = sink.read_header(&worksheet).await?;
            let rows = sink.read_rows(&worksheet).await?;
            let mut out = csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(std::io::stdout());
            out.write_record(&header)?;
            for row in rows {
                out.write_record(row.iter().map(|c| c.to_string()))?;
            }
            out.flush()?;
        }
        Commands::Version => {
            println!("{}", version::banner());
        }
    }

    Ok(())
}

/// Resolve the provider's topology and check the results directory, exiting with usage on failure.
fn validate_publish_args(provider: &str, results_dir: &std::path::Path) -> Topology {
    let Some(topology) = Topology::for_provider(provider) else {
        invocation_error(InvocationError::UnknownProvider {
            identifier: provider.to_string(),
            valid: Topology::known_providers(),
        });
    };
    if !results_dir.is_dir() {
        invocation_error(InvocationError::MissingDirectory(results_dir.to_path_buf()));
    }
    topology
}

fn invocation_error(e: InvocationError) -> ! {
    Cli::command().error(ErrorKind::InvalidValue, e).exit()
}

async fn run_sampler(
    ticks: u32,
    interval: Duration,
    with_load_average: bool,
    output: PathBuf,
) -> Result<()> {
    let mut writer = sampler::SampleWriter::create(&output, with_load_average)?;
    let source = sysinfo_repo::SysinfoRepo::new(with_load_average);
    let sampler = sampler::Sampler::new(source);
    tracing::info!(
        ticks,
        interval_secs = interval.as_secs(),
        output = %output.display(),
        "starting host sampler"
    );

    tokio::select! {
        result = sampler.run_with(ticks, interval, |record| writer.write(record)) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal");
        }
    }
    tracing::info!(output = %output.display(), "samples written");
    Ok(())
}
