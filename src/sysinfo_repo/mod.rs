// Host CPU / memory / load via sysinfo

use crate::sampler::{HostMetricsSource, HostReading};
use std::sync::Arc;
use sysinfo::System;
use tracing::instrument;

pub struct SysinfoRepo {
    sys: Arc<std::sync::Mutex<System>>,
    with_load_average: bool,
}

impl SysinfoRepo {
    /// `with_load_average` adds the 1-minute load average to every reading (instance runs).
    pub fn new(with_load_average: bool) -> Self {
        let mut sys = System::new();
        // Baseline so the first reading reports usage since construction.
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
            with_load_average,
        }
    }

    /// CPU usage since the previous call, across all cores.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_cpu_percent"))]
    pub async fn get_cpu_percent(&self) -> anyhow::Result<f64> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_cpu_usage();
            let usage = sys.global_cpu_usage() as f64;
            anyhow::ensure!(usage.is_finite(), "sysinfo returned non-finite cpu usage");
            Ok(usage.clamp(0.0, 100.0))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_memory_percent"))]
    pub async fn get_memory_percent(&self) -> anyhow::Result<f64> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_memory();

            let total = sys.total_memory();
            anyhow::ensure!(total > 0, "sysinfo reported zero total memory");
            let used = total.saturating_sub(sys.available_memory());
            Ok((used as f64 / total as f64) * 100.0)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    pub fn get_load_average(&self) -> f64 {
        System::load_average().one
    }
}

impl HostMetricsSource for SysinfoRepo {
    async fn read(&self) -> anyhow::Result<HostReading> {
        let cpu_percent = self.get_cpu_percent().await?;
        let memory_percent = self.get_memory_percent().await?;
        let load_avg_1m = self.with_load_average.then(|| self.get_load_average());
        Ok(HostReading {
            cpu_percent,
            memory_percent,
            load_avg_1m,
        })
    }
}
