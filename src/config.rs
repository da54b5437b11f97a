//! Runtime configuration loaded from environment variables.
//!
//! The ledger engine itself is pure; configuration only shapes how the
//! `ferment-ledger` binary loads batches, logs, and persists results.

use std::env;

use crate::models::batch::DEFAULT_BATCH_VOLUME;

/// Configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Nominal starting volume used when a batch has none (or an invalid one)
    pub default_volume: f64,
    /// Emit structured JSON logs instead of plain text
    pub log_json: bool,
    /// Print the recalculated batch without writing it back
    pub dry_run: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_volume = match lookup("FERMENT_LEDGER_DEFAULT_VOLUME") {
            Some(raw) => {
                let value: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("FERMENT_LEDGER_DEFAULT_VOLUME", raw.clone()))?;
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConfigError::Invalid("FERMENT_LEDGER_DEFAULT_VOLUME", raw));
                }
                value
            }
            None => DEFAULT_BATCH_VOLUME,
        };

        Ok(Self {
            default_volume,
            log_json: parse_flag(&lookup, "FERMENT_LEDGER_LOG_JSON")?,
            dry_run: parse_flag(&lookup, "FERMENT_LEDGER_DRY_RUN")?,
        })
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(false),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::Invalid(key, raw)),
        },
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).expect("Config should load");

        assert_eq!(config.default_volume, 1.0);
        assert!(!config.log_json);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_config_from_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("FERMENT_LEDGER_DEFAULT_VOLUME", "23"),
            ("FERMENT_LEDGER_LOG_JSON", "true"),
            ("FERMENT_LEDGER_DRY_RUN", "1"),
        ]))
        .expect("Config should load");

        assert_eq!(config.default_volume, 23.0);
        assert!(config.log_json);
        assert!(config.dry_run);
    }

    #[test]
    fn test_config_rejects_bad_volume() {
        let err = Config::from_lookup(lookup_from(&[("FERMENT_LEDGER_DEFAULT_VOLUME", "-2")]))
            .unwrap_err();
        assert!(err.to_string().contains("FERMENT_LEDGER_DEFAULT_VOLUME"));

        assert!(
            Config::from_lookup(lookup_from(&[("FERMENT_LEDGER_DEFAULT_VOLUME", "five")])).is_err()
        );
    }

    #[test]
    fn test_config_rejects_bad_flag() {
        assert!(Config::from_lookup(lookup_from(&[("FERMENT_LEDGER_LOG_JSON", "maybe")])).is_err());
    }
}
