//! Structured JSONL event log.
//!
//! Binding, rejected calls and replay outcomes are reported through
//! [`log_event`], which writes to the process-wide logger installed with
//! [`init_event_log`]. With no logger installed emission is a no-op.

use crate::config::LoggingConfig;
use crate::errors::RecorderError;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 4096;

#[derive(Debug, Clone)]
pub struct JsonlLogger {
    pub path: PathBuf,
    pub max_payload_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent<'a> {
    pub level: &'a str,
    pub event_type: &'a str,
    pub payload: Value,
}

impl JsonlLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }

    pub fn append(&self, event: &LogEvent<'_>) -> Result<(), RecorderError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| RecorderError::Io(e.to_string()))?;
        }
        let truncated = truncate_json(event.payload.clone(), self.max_payload_bytes);
        let line = serde_json::to_string(&LogEvent {
            level: event.level,
            event_type: event.event_type,
            payload: truncated,
        })
        .map_err(|e| RecorderError::Io(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| RecorderError::Io(e.to_string()))?;
        writeln!(file, "{line}").map_err(|e| RecorderError::Io(e.to_string()))
    }
}

static EVENT_LOG: OnceLock<Mutex<Option<Arc<JsonlLogger>>>> = OnceLock::new();

fn event_log_slot() -> &'static Mutex<Option<Arc<JsonlLogger>>> {
    EVENT_LOG.get_or_init(|| Mutex::new(None))
}

pub fn init_event_log(logger: JsonlLogger) {
    *event_log_slot()
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(logger));
}

/// Installs a logger when `[logging]` is enabled; otherwise leaves the
/// current slot untouched.
pub fn init_from_config(cfg: &LoggingConfig) -> Result<bool, RecorderError> {
    if !cfg.enabled {
        return Ok(false);
    }
    let path = cfg.path.as_ref().ok_or_else(|| {
        RecorderError::InvalidConfig("logging.path is required when logging is enabled".into())
    })?;
    let mut logger = JsonlLogger::new(path);
    logger.max_payload_bytes = cfg.max_payload_bytes;
    init_event_log(logger);
    Ok(true)
}

pub fn clear_event_log() {
    *event_log_slot()
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = None;
}

pub fn log_event(level: &str, event_type: &str, payload: Value) {
    let guard = event_log_slot()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(logger) = guard.as_ref() {
        let logger = Arc::clone(logger);
        drop(guard);
        // Logging never turns a successful operation into a failed one.
        let _ = logger.append(&LogEvent {
            level,
            event_type,
            payload,
        });
    }
}

fn truncate_json(value: Value, max_bytes: usize) -> Value {
    let rendered = serde_json::to_string(&value).unwrap_or_default();
    if rendered.len() <= max_bytes {
        return value;
    }
    let mut cut = max_bytes.saturating_sub(3);
    while !rendered.is_char_boundary(cut) {
        cut -= 1;
    }
    Value::String(format!("{}...", &rendered[..cut]))
}

#[cfg(test)]
mod tests {
    use super::{clear_event_log, init_from_config, log_event, JsonlLogger, LogEvent};
    use crate::config::LoggingConfig;
    use serde_json::json;

    #[test]
    fn logger_truncates_large_payloads_and_writes_jsonl() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.jsonl");
        let mut logger = JsonlLogger::new(&path);
        logger.max_payload_bytes = 20;

        logger
            .append(&LogEvent {
                level: "info",
                event_type: "bind",
                payload: json!({"text": "abcdefghijklmnopqrstuvwxyz"}),
            })
            .expect("append");

        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.contains("\"event_type\":\"bind\""));
        assert!(text.contains("..."));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let value = super::truncate_json(json!("ééééééééé"), 8);
        let text = value.as_str().expect("string");
        assert!(text.ends_with("..."));
    }

    #[test]
    fn disabled_config_installs_nothing() {
        let cfg = LoggingConfig::default();
        assert!(!init_from_config(&cfg).expect("init"));
    }

    #[test]
    fn global_log_writes_while_installed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/events.jsonl");
        let cfg = LoggingConfig {
            enabled: true,
            path: Some(path.clone()),
            max_payload_bytes: 1024,
        };
        assert!(init_from_config(&cfg).expect("init"));
        log_event("warn", "call_rejected", json!({"operation": "plot"}));
        clear_event_log();

        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.contains("\"call_rejected\""));
        assert!(text.contains("\"operation\":\"plot\""));
    }
}
