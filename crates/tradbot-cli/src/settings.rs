//! Runtime settings.
//!
//! Reads the `[engine]` and `[web]` sections from `config/default.toml`.
//! Every key is optional; anything missing or mistyped keeps its built-in
//! default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tradbot_web::WebConfig;

use crate::helpers::env_non_empty;

/// Environment variable overriding the rule-file path.
pub const RULES_ENV: &str = "TRADBOT_RULES";

/// Rule file used when nothing else names one.
pub const DEFAULT_RULES: &str = "config/patterns.json";

/// Settings loaded from the runtime settings file.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path of the JSON rule file.
    pub rules: PathBuf,
    /// HTTP server settings.
    pub web: WebConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules: PathBuf::from(DEFAULT_RULES),
            web: WebConfig::default(),
        }
    }
}

impl Settings {
    /// Pick the rule file: explicit flag, then `TRADBOT_RULES`, then the
    /// settings file.
    pub fn rules_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| env_non_empty(RULES_ENV).map(PathBuf::from))
            .unwrap_or_else(|| self.rules.clone())
    }
}

/// Load settings from `path`.
///
/// Falls back to defaults if the file is missing or cannot be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_settings(&content),
        Err(e) => {
            tracing::debug!(
                path = %path.display(),
                error = %e,
                "settings file not read, using defaults"
            );
            Settings::default()
        }
    }
}

/// Parse settings from TOML text.
pub fn parse_settings(content: &str) -> Settings {
    let defaults = Settings::default();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "invalid settings file, using defaults");
            return defaults;
        }
    };

    let rules = match table.get("engine") {
        Some(toml::Value::Table(engine)) => engine
            .get("rules")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.rules),
        _ => defaults.rules,
    };

    let web = match table.get("web") {
        Some(toml::Value::Table(web)) => {
            let d = defaults.web;
            WebConfig {
                bind_addr: web
                    .get("bind")
                    .and_then(|v| v.as_str())
                    .map(str::to_owned)
                    .unwrap_or(d.bind_addr),
                port: web
                    .get("port")
                    .and_then(|v| v.as_integer())
                    .and_then(|v| u16::try_from(v).ok())
                    .unwrap_or(d.port),
                session_idle: web
                    .get("session_idle_secs")
                    .and_then(|v| v.as_integer())
                    .map(|v| Duration::from_secs(v.max(1) as u64))
                    .unwrap_or(d.session_idle),
                max_sessions: web
                    .get("max_sessions")
                    .and_then(|v| v.as_integer())
                    .map(|v| v.max(1) as u64)
                    .unwrap_or(d.max_sessions),
            }
        }
        _ => defaults.web,
    };

    Settings { rules, web }
}
