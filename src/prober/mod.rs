// Cold-start prober: warm up, then repeat (idle soak -> cold probe -> warm burst).
// Classification is positional: the first request after a soak is tagged cold
// whatever its latency. A soak shorter than the platform's scale-down delay will
// therefore record warm requests as cold.

mod client;

pub use client::{HttpLivenessClient, LivenessClient};

use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::instrument;

use crate::config::ProberSettings;
use crate::models::{ColdStartEvent, RequestType, round_to};
use crate::parser::cold_start::summarize_events;

const HTTP_OK: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Warmup,
    IdleSoak,
    ColdProbe,
    WarmBurst,
    Done,
}

impl ProbeState {
    /// Transition out of `self`, given how many probe cycles have completed.
    /// Cycles complete at the end of a warm burst.
    pub fn next(self, completed: u32, test_count: u32) -> ProbeState {
        match self {
            ProbeState::Warmup if test_count == 0 => ProbeState::Done,
            ProbeState::Warmup => ProbeState::IdleSoak,
            ProbeState::IdleSoak => ProbeState::ColdProbe,
            ProbeState::ColdProbe => ProbeState::WarmBurst,
            ProbeState::WarmBurst if completed < test_count => ProbeState::IdleSoak,
            ProbeState::WarmBurst | ProbeState::Done => ProbeState::Done,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProberConfig {
    pub test_count: u32,
    pub idle: Duration,
    pub burst_size: u32,
    pub burst_delay: Duration,
    pub cold_timeout: Duration,
    pub warm_timeout: Duration,
}

impl ProberConfig {
    pub fn new(settings: &ProberSettings, test_count: u32, idle_secs: u64) -> Self {
        Self {
            test_count,
            idle: Duration::from_secs(idle_secs),
            burst_size: settings.burst_size,
            burst_delay: Duration::from_millis(settings.burst_delay_ms),
            cold_timeout: Duration::from_secs(settings.cold_timeout_secs),
            warm_timeout: Duration::from_secs(settings.warm_timeout_secs),
        }
    }
}

pub struct ColdStartProber<C> {
    client: C,
    config: ProberConfig,
}

impl<C: LivenessClient> ColdStartProber<C> {
    pub fn new(client: C, config: ProberConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Drive the state machine to completion. Network failures become unsuccessful
    /// events; only a request that could not be issued at all returns an error.
    pub async fn run(&self) -> anyhow::Result<Vec<ColdStartEvent>> {
        let mut events = Vec::new();
        self.run_into(&mut events).await?;
        Ok(events)
    }

    /// Run and write every event to `output`, then log a summary. The output file is
    /// created before the first request. If the run aborts, the events measured so far
    /// are still written before the error is returned.
    pub async fn run_to_file(&self, output: &Path) -> anyhow::Result<Vec<ColdStartEvent>> {
        write_events(output, &[])?;

        let mut events = Vec::new();
        let outcome = self.run_into(&mut events).await;
        write_events(output, &events)?;
        tracing::info!(path = %output.display(), events = events.len(), "results written");
        log_summary(&events);
        outcome.map(|()| events)
    }

    /// Measured events are pushed to `events` as they are taken, so they survive an abort.
    #[instrument(
        skip(self, events),
        fields(operation = "probe", test_count = self.config.test_count)
    )]
    async fn run_into(&self, events: &mut Vec<ColdStartEvent>) -> anyhow::Result<()> {
        let cfg = &self.config;
        events.reserve(cfg.test_count.saturating_mul(cfg.burst_size.saturating_add(1)) as usize);
        let mut completed = 0u32;
        let mut state = ProbeState::Warmup;

        while state != ProbeState::Done {
            match state {
                ProbeState::Warmup => {
                    tracing::info!("initial warm-up request");
                    match self.client.check(cfg.cold_timeout).await {
                        Ok(status) => tracing::debug!(status, "warm-up complete"),
                        Err(e) if e.is_network() => {
                            tracing::warn!(error = %e, "warm-up request failed")
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                ProbeState::IdleSoak => {
                    tracing::info!(
                        idle_secs = cfg.idle.as_secs(),
                        "waiting for service to go cold"
                    );
                    tokio::time::sleep(cfg.idle).await;
                }
                ProbeState::ColdProbe => {
                    let event = self
                        .timed_request(completed + 1, RequestType::Cold, cfg.cold_timeout)
                        .await?;
                    tracing::info!(
                        test_number = event.test_number,
                        response_time_ms = event.response_time_ms,
                        success = event.success,
                        "cold start"
                    );
                    events.push(event);
                }
                ProbeState::WarmBurst => {
                    for _ in 0..cfg.burst_size {
                        tokio::time::sleep(cfg.burst_delay).await;
                        let event = self
                            .timed_request(completed + 1, RequestType::Warm, cfg.warm_timeout)
                            .await?;
                        tracing::debug!(
                            test_number = event.test_number,
                            response_time_ms = event.response_time_ms,
                            success = event.success,
                            "warm request"
                        );
                        events.push(event);
                    }
                    completed += 1;
                }
                ProbeState::Done => {}
            }
            state = state.next(completed, cfg.test_count);
        }

        Ok(())
    }

    async fn timed_request(
        &self,
        test_number: u32,
        request_type: RequestType,
        timeout: Duration,
    ) -> anyhow::Result<ColdStartEvent> {
        let started = Instant::now();
        let result = self.client.check(timeout).await;
        let response_time_ms = round_to(started.elapsed().as_secs_f64() * 1000.0, 2);
        let success = match result {
            Ok(status) => status == HTTP_OK,
            Err(e) if e.is_network() => {
                tracing::warn!(error = %e, test_number, "request failed");
                false
            }
            Err(e) => return Err(e.into()),
        };
        Ok(ColdStartEvent {
            timestamp: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            test_number,
            request_type,
            response_time_ms,
            success,
        })
    }
}

/// Write events as cold_start_metrics.csv (header included, even when empty).
pub fn write_events(path: &Path, events: &[ColdStartEvent]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file =
        File::create(path).map_err(|e| anyhow::anyhow!("create {}: {}", path.display(), e))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record([
        "timestamp",
        "test_number",
        "request_type",
        "is_cold_start",
        "response_time_ms",
        "success",
    ])?;
    for event in events {
        writer.serialize(event.as_row())?;
    }
    writer.flush()?;
    Ok(())
}

fn log_summary(events: &[ColdStartEvent]) {
    let Some(summary) = summarize_events(events) else {
        tracing::info!("no probe events recorded");
        return;
    };
    if let Some(cold) = &summary.cold {
        tracing::info!(
            count = cold.count,
            avg_ms = round_to(cold.avg_ms, 2),
            min_ms = round_to(cold.min_ms, 2),
            max_ms = round_to(cold.max_ms, 2),
            "cold start summary"
        );
    }
    if let Some(warm) = &summary.warm {
        tracing::info!(
            count = warm.count,
            avg_ms = round_to(warm.avg_ms, 2),
            "warm start summary"
        );
    }
}
