//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::onboarding::model::ValidationPolicy;

/// Environment variable naming the database file.
pub const ENV_DB_PATH: &str = "KIOSK_CONSOLE_DB_PATH";
/// Environment variable enabling gates on every wizard step.
pub const ENV_STRICT_STEPS: &str = "KIOSK_CONSOLE_STRICT_STEPS";
/// Environment variable sizing the flow event channel.
pub const ENV_EVENT_CAPACITY: &str = "KIOSK_CONSOLE_EVENT_CAPACITY";

/// Console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Path of the libSQL database backing the key-value store.
    pub db_path: PathBuf,
    /// Which wizard steps enforce their validation gate.
    pub validation: ValidationPolicy,
    /// Capacity of the broadcast channel carrying flow events.
    pub event_capacity: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/kiosk-console.db"),
            validation: ValidationPolicy::default(),
            event_capacity: 64,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_STRICT_STEPS) {
            let strict = parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: ENV_STRICT_STEPS.to_string(),
                message: format!("expected true or false, got {raw:?}"),
            })?;
            config.validation = if strict {
                ValidationPolicy::EveryStep
            } else {
                ValidationPolicy::FirstStepOnly
            };
        }

        if let Some(raw) = lookup(ENV_EVENT_CAPACITY) {
            config.event_capacity = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_EVENT_CAPACITY.to_string(),
                        message: format!("expected a positive integer, got {raw:?}"),
                    });
                }
            };
        }

        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
