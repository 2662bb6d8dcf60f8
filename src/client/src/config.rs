use std::{path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::Level;

use crate::{model::Mode, session::OutcomePolicy};

pub const DEFAULT_SCORING_URL: &str = "https://rockpaperscissorbackend.onrender.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub scoring_url: String,
    pub debounce_window: Duration,
    pub request_timeout: Duration,
    pub mode: Mode,
    pub outcome_policy: OutcomePolicy,
    pub export_dir: PathBuf,
    pub log_level: Level,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            scoring_url: DEFAULT_SCORING_URL.to_owned(),
            debounce_window: Duration::from_millis(500),
            request_timeout: Duration::from_secs(10),
            mode: Mode::Random,
            outcome_policy: OutcomePolicy::FallbackToTie,
            export_dir: PathBuf::from("."),
            log_level: Level::INFO,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = ClientConfig::default();
        if let Some(url) = lookup("RPS_SCORING_URL") {
            config.scoring_url = url;
        }
        if let Some(value) = lookup("RPS_DEBOUNCE_MS") {
            config.debounce_window = Duration::from_millis(parse("RPS_DEBOUNCE_MS", value)?);
        }
        if let Some(value) = lookup("RPS_TIMEOUT_MS") {
            config.request_timeout = Duration::from_millis(parse("RPS_TIMEOUT_MS", value)?);
        }
        if let Some(value) = lookup("RPS_MODE") {
            config.mode = parse("RPS_MODE", value)?;
        }
        if let Some(value) = lookup("RPS_STRICT_OUTCOMES") {
            config.outcome_policy = if parse::<bool>("RPS_STRICT_OUTCOMES", value)? {
                OutcomePolicy::Strict
            } else {
                OutcomePolicy::FallbackToTie
            };
        }
        if let Some(dir) = lookup("RPS_EXPORT_DIR") {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("RPS_LOG") {
            config.log_level = parse("RPS_LOG", value)?;
        }
        Ok(config)
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    let parsed = value.trim().parse();
    parsed.map_err(|_| ConfigError::Invalid { name, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.scoring_url, DEFAULT_SCORING_URL);
        assert_eq!(config.debounce_window, Duration::from_millis(500));
        assert_eq!(config.mode, Mode::Random);
        assert_eq!(config.outcome_policy, OutcomePolicy::FallbackToTie);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("RPS_SCORING_URL", "http://127.0.0.1:9000"),
            ("RPS_DEBOUNCE_MS", "250"),
            ("RPS_MODE", "remote"),
            ("RPS_STRICT_OUTCOMES", "true"),
            ("RPS_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.scoring_url, "http://127.0.0.1:9000");
        assert_eq!(config.debounce_window, Duration::from_millis(250));
        assert_eq!(config.mode, Mode::Remote);
        assert_eq!(config.outcome_policy, OutcomePolicy::Strict);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn test_invalid_value() {
        let error = ClientConfig::from_lookup(lookup(&[("RPS_DEBOUNCE_MS", "soon")])).unwrap_err();
        assert_eq!(
            error,
            ConfigError::Invalid {
                name: "RPS_DEBOUNCE_MS",
                value: "soon".to_owned(),
            }
        );
    }
}
