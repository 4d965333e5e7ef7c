//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Render service settings
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Worker pool and retry behavior
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.renderer.endpoint.trim().is_empty() {
            return Err(AppError::validation("renderer.endpoint is empty"));
        }
        if url::Url::parse(&self.renderer.endpoint).is_err() {
            return Err(AppError::validation("renderer.endpoint is not a valid URL"));
        }
        if self.renderer.timeout_secs == 0 {
            return Err(AppError::validation("renderer.timeout_secs must be > 0"));
        }
        if self.engine.max_retries == 0 {
            return Err(AppError::validation("engine.max_retries must be > 0"));
        }
        Ok(())
    }
}

/// Render service client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Endpoint of the headless render service
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Worker pool, retry, and admission settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Worker pool size. 0 means one worker per site in the batch.
    #[serde(default)]
    pub max_workers: usize,

    /// Fetch attempts per site before the job is abandoned
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Ceiling on simultaneous render requests. 0 means same as the
    /// worker count.
    #[serde(default)]
    pub max_concurrent_fetches: usize,

    /// Minimum spacing between fetch starts in milliseconds. 0 disables
    /// rate limiting.
    #[serde(default)]
    pub request_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_workers: 0,
            max_retries: defaults::max_retries(),
            max_concurrent_fetches: 0,
            request_delay_ms: 0,
        }
    }
}

impl EngineConfig {
    /// Effective worker count for a batch of the given size.
    pub fn workers_for(&self, batch_size: usize) -> usize {
        let workers = if self.max_workers == 0 {
            batch_size
        } else {
            self.max_workers
        };
        workers.max(1)
    }

    /// Effective in-flight fetch ceiling for the given worker count.
    pub fn fetch_ceiling(&self, workers: usize) -> usize {
        let ceiling = if self.max_concurrent_fetches == 0 {
            workers
        } else {
            self.max_concurrent_fetches
        };
        ceiling.max(1)
    }
}

mod defaults {
    pub fn endpoint() -> String {
        "http://localhost:3000/scrape".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_retries() -> u32 {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.renderer.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.renderer.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn workers_default_to_batch_size() {
        let engine = EngineConfig::default();
        assert_eq!(engine.workers_for(7), 7);
        assert_eq!(engine.workers_for(0), 1);

        let engine = EngineConfig {
            max_workers: 3,
            ..EngineConfig::default()
        };
        assert_eq!(engine.workers_for(7), 3);
    }

    #[test]
    fn fetch_ceiling_defaults_to_worker_count() {
        let engine = EngineConfig::default();
        assert_eq!(engine.fetch_ceiling(4), 4);

        let engine = EngineConfig {
            max_concurrent_fetches: 2,
            ..EngineConfig::default()
        };
        assert_eq!(engine.fetch_ceiling(10), 2);
    }

    #[test]
    fn load_reads_partial_toml_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nmax_workers = 4").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.engine.max_workers, 4);
        assert_eq!(config.engine.max_retries, 3);
        assert_eq!(config.renderer.timeout_secs, 30);
        assert_eq!(config.renderer.endpoint, "http://localhost:3000/scrape");
    }
}
