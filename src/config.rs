use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ingestion: IngestionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestionConfig {
    /// JSON dump of series read by the file source on every cycle.
    pub source_path: String,
    pub refresh_interval_secs: u64,
    /// Length of the queried window, ending at the current step-aligned time.
    pub window_secs: u64,
    pub step_secs: u64,
    /// How often to log cycle stats at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.ingestion.source_path.is_empty(),
            "ingestion.source_path must be non-empty"
        );
        anyhow::ensure!(
            self.ingestion.refresh_interval_secs > 0,
            "ingestion.refresh_interval_secs must be > 0, got {}",
            self.ingestion.refresh_interval_secs
        );
        anyhow::ensure!(
            self.ingestion.step_secs > 0,
            "ingestion.step_secs must be > 0, got {}",
            self.ingestion.step_secs
        );
        anyhow::ensure!(
            self.ingestion.window_secs >= self.ingestion.step_secs,
            "ingestion.window_secs must be >= step_secs ({}), got {}",
            self.ingestion.step_secs,
            self.ingestion.window_secs
        );
        anyhow::ensure!(
            self.ingestion.stats_log_interval_secs > 0,
            "ingestion.stats_log_interval_secs must be > 0, got {}",
            self.ingestion.stats_log_interval_secs
        );
        Ok(())
    }
}
