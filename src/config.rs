use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sink: SinkConfig,
    pub sampler: SamplerConfig,
    pub prober: ProberSettings,
    pub aggregator: AggregatorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// SQLite file holding the results ledger.
    pub path: String,
    /// Spreadsheet the worksheets live under.
    pub spreadsheet_id: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            path: "data/benchmarks.db".into(),
            spreadsheet_id: "deployment-benchmarks".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub tick_count: u32,
    pub interval_secs: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            tick_count: 180,
            interval_secs: 1,
        }
    }
}

/// Prober knobs that are not on the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProberSettings {
    pub health_path: String,
    pub burst_size: u32,
    pub burst_delay_ms: u64,
    /// Timeout for warm-up and cold probes (may hit a booting instance).
    pub cold_timeout_secs: u64,
    pub warm_timeout_secs: u64,
}

impl Default for ProberSettings {
    fn default() -> Self {
        Self {
            health_path: "/health".into(),
            burst_size: 3,
            burst_delay_ms: 1000,
            cold_timeout_secs: 300,
            warm_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Only pods whose name starts with this are counted.
    pub workload_prefix: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            workload_prefix: "ml-api".into(),
        }
    }
}

impl AppConfig {
    /// Reads `CONFIG_FILE` if set, else `config.toml` when present, else built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = match std::env::var("CONFIG_FILE") {
            Ok(p) => p,
            Err(_) if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
                DEFAULT_CONFIG_PATH.into()
            }
            Err(_) => {
                tracing::debug!("no config file; using defaults");
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
        };
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("read config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.sink.path.is_empty(), "sink.path must be non-empty");
        anyhow::ensure!(
            !self.sink.spreadsheet_id.is_empty(),
            "sink.spreadsheet_id must be non-empty"
        );
        anyhow::ensure!(
            self.sampler.tick_count > 0,
            "sampler.tick_count must be > 0, got {}",
            self.sampler.tick_count
        );
        anyhow::ensure!(
            self.prober.health_path.starts_with('/'),
            "prober.health_path must start with '/', got {:?}",
            self.prober.health_path
        );
        anyhow::ensure!(
            self.prober.burst_size > 0,
            "prober.burst_size must be > 0, got {}",
            self.prober.burst_size
        );
        anyhow::ensure!(
            self.prober.cold_timeout_secs > 0,
            "prober.cold_timeout_secs must be > 0, got {}",
            self.prober.cold_timeout_secs
        );
        anyhow::ensure!(
            self.prober.warm_timeout_secs > 0,
            "prober.warm_timeout_secs must be > 0, got {}",
            self.prober.warm_timeout_secs
        );
        anyhow::ensure!(
            !self.aggregator.workload_prefix.is_empty(),
            "aggregator.workload_prefix must be non-empty"
        );
        Ok(())
    }
}
