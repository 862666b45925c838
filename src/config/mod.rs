use crate::media::{ResolverConfig, DEFAULT_QUERY_PARAM, DEFAULT_TIMEOUT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use url::Url;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub download: DownloadConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: Option<String>,
    pub query_param: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `json` or `pretty`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DownloadConfig {
    pub directory: Option<PathBuf>,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse config file {}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn get_logging_format(&self) -> &str {
        &self.logging.format
    }

    pub fn resolver_config(&self) -> Result<ResolverConfig> {
        let mut config = ResolverConfig::default();
        if let Some(endpoint) = &self.api.endpoint {
            config.endpoint = Url::parse(endpoint)
                .with_context(|| format!("Invalid API endpoint {}", endpoint))?;
        }
        config.query_param = self.api.query_param.clone();
        config.timeout = Duration::from_secs(self.api.timeout_secs);
        Ok(config)
    }

    /// First of: the configured directory, the user's download folder, the working directory.
    pub fn download_dir(&self) -> PathBuf {
        self.download
            .directory
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
