use crate::errors::RecorderError;
use crate::logging::DEFAULT_MAX_PAYLOAD_BYTES;
use crate::proxy::DEFAULT_CHECK_PREFIX;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecorderConfig {
    pub logging: LoggingConfig,
    pub proxy: ProxyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub path: Option<PathBuf>,
    pub max_payload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Attribute-name prefix marking a custom validator, e.g. `_check_plot`.
    pub check_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: None,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            check_prefix: DEFAULT_CHECK_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialRecorderConfig {
    logging: Option<PartialLoggingConfig>,
    proxy: Option<PartialProxyConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialLoggingConfig {
    enabled: Option<bool>,
    path: Option<PathBuf>,
    max_payload_bytes: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialProxyConfig {
    check_prefix: Option<String>,
}

pub fn load_config(path: &Path) -> Result<RecorderConfig, RecorderError> {
    let contents = std::fs::read_to_string(path).map_err(|e| RecorderError::Io(e.to_string()))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<RecorderConfig, RecorderError> {
    let partial: PartialRecorderConfig =
        toml::from_str(contents).map_err(|e| RecorderError::ConfigParse(e.to_string()))?;
    let mut cfg = RecorderConfig::default();
    merge_partial_config(&mut cfg, partial);
    validate_config(&cfg)?;
    Ok(cfg)
}

fn merge_partial_config(cfg: &mut RecorderConfig, partial: PartialRecorderConfig) {
    if let Some(logging) = partial.logging {
        if let Some(enabled) = logging.enabled {
            cfg.logging.enabled = enabled;
        }
        if let Some(path) = logging.path {
            cfg.logging.path = Some(path);
        }
        if let Some(value) = logging.max_payload_bytes {
            cfg.logging.max_payload_bytes = value;
        }
    }

    if let Some(proxy) = partial.proxy {
        if let Some(prefix) = proxy.check_prefix {
            cfg.proxy.check_prefix = prefix;
        }
    }
}

fn validate_config(cfg: &RecorderConfig) -> Result<(), RecorderError> {
    if cfg.logging.max_payload_bytes == 0 {
        return Err(RecorderError::InvalidConfig(
            "logging.max_payload_bytes must be greater than zero".to_string(),
        ));
    }
    if cfg.logging.enabled && cfg.logging.path.is_none() {
        return Err(RecorderError::InvalidConfig(
            "logging.path is required when logging is enabled".to_string(),
        ));
    }
    if cfg.proxy.check_prefix.trim().is_empty() {
        return Err(RecorderError::InvalidConfig(
            "proxy.check_prefix must not be empty".to_string(),
        ));
    }
    Ok(())
}
