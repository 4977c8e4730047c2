//! Configuration loading from disk and environment.

use std::path::Path;
use std::fs;
use crate::config::schema::RedirectorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => write!(f, "Invalid value for {}: '{}'", var, value),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse configuration from a TOML file without validating it.
pub fn load_config(path: &Path) -> Result<RedirectorConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Apply environment overrides on top of a parsed configuration.
///
/// `lookup` is `std::env::var(..).ok()` in production; tests pass a map.
///
/// | Variable              | Field                                  |
/// |-----------------------|----------------------------------------|
/// | `LISTEN_ADDR`         | host part of `listener.bind_address`   |
/// | `PORT`                | port part of `listener.bind_address`   |
/// | `SPREADSHEET_ID`      | `sheet.spreadsheet_id`                 |
/// | `SHEET_RANGE`         | `sheet.range`                          |
/// | `SHEETS_API_KEY`      | `sheet.api_key`                        |
/// | `SHEETS_BEARER_TOKEN` | `sheet.bearer_token`                   |
/// | `SHEETS_ENDPOINT`     | `sheet.endpoint`                       |
/// | `LOG_LEVEL`           | `observability.log_level`              |
pub fn apply_env_overrides<F>(config: &mut RedirectorConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("LISTEN_ADDR");
    let port = lookup("PORT");
    if host.is_some() || port.is_some() {
        let (current_host, current_port) = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(h, p)| (h.to_string(), p.to_string()))
            .unwrap_or_else(|| (config.listener.bind_address.clone(), "8080".to_string()));

        if let Some(port) = &port {
            if port.parse::<u16>().is_err() {
                return Err(ConfigError::Env { var: "PORT", value: port.clone() });
            }
        }

        let host = host.unwrap_or(current_host);
        let port = port.unwrap_or(current_port);
        config.listener.bind_address = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, port)
        } else {
            format!("{}:{}", host, port)
        };
    }

    if let Some(id) = lookup("SPREADSHEET_ID") {
        config.sheet.spreadsheet_id = id;
    }
    if let Some(range) = lookup("SHEET_RANGE") {
        config.sheet.range = range;
    }
    if let Some(key) = lookup("SHEETS_API_KEY") {
        config.sheet.api_key = Some(key);
    }
    if let Some(token) = lookup("SHEETS_BEARER_TOKEN") {
        config.sheet.bearer_token = Some(token);
    }
    if let Some(endpoint) = lookup("SHEETS_ENDPOINT") {
        config.sheet.endpoint = endpoint;
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        config.observability.log_level = level;
    }

    Ok(())
}

/// Load configuration: optional TOML file, then environment, then validation.
pub fn load<F>(path: Option<&Path>, lookup: F) -> Result<RedirectorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => RedirectorConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration using the process environment.
pub fn load_from_env(path: Option<&Path>) -> Result<RedirectorConfig, ConfigError> {
    load(path, |var| std::env::var(var).ok())
}
