//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DatabaseTarget, LastseenConfig};
use super::secret::SecretValue;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use secrecy::Secret;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into LastseenConfig
/// 4. Applies environment variable overrides (LASTSEEN_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced variable is unset,
/// TOML parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use lastseen::config::loader::load_config;
///
/// let config = load_config("lastseen.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<LastseenConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: LastseenConfig = toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SyncError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SyncError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using LASTSEEN_* prefix
///
/// Environment variables follow the pattern: LASTSEEN_<SECTION>_<KEY>,
/// e.g. LASTSEEN_GBIF_USER_AGENT_PREFIX, LASTSEEN_SYNC_SAMPLE_SIZE
fn apply_env_overrides(config: &mut LastseenConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("LASTSEEN_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("LASTSEEN_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // GBIF overrides
    if let Ok(val) = std::env::var("LASTSEEN_GBIF_BASE_URL") {
        config.gbif.base_url = val;
    }
    if let Ok(val) = std::env::var("LASTSEEN_GBIF_USER_AGENT_PREFIX") {
        config.gbif.user_agent_prefix = Some(val);
    }
    if let Ok(val) = std::env::var("LASTSEEN_GBIF_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.gbif.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("LASTSEEN_GBIF_PAGE_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.gbif.page_delay_ms = delay;
        }
    }

    // Sync overrides
    if let Ok(val) = std::env::var("LASTSEEN_SYNC_SAMPLE_SIZE") {
        if let Ok(size) = val.parse() {
            config.sync.sample_size = size;
        }
    }
    if let Ok(val) = std::env::var("LASTSEEN_SYNC_SCHEDULE_INTERVAL_SECONDS") {
        if let Ok(interval) = val.parse() {
            config.sync.schedule_interval_seconds = interval;
        }
    }

    // Database overrides
    if let Ok(val) = std::env::var("LASTSEEN_DATABASE_TARGET") {
        config.database_target = match val.to_lowercase().as_str() {
            "postgresql" => DatabaseTarget::PostgreSQL,
            "memory" => DatabaseTarget::Memory,
            other => {
                return Err(SyncError::Configuration(format!(
                    "Invalid LASTSEEN_DATABASE_TARGET '{other}'. Must be postgresql or memory"
                )))
            }
        };
    }
    if let Some(ref mut pg_config) = config.postgresql {
        if let Ok(val) = std::env::var("LASTSEEN_POSTGRESQL_CONNECTION_STRING") {
            pg_config.connection_string = Secret::new(SecretValue::from(val));
        }
        if let Ok(val) = std::env::var("LASTSEEN_POSTGRESQL_SSL_MODE") {
            pg_config.ssl_mode = val;
        }
    }
    if let Ok(val) = std::env::var("LASTSEEN_MEMORY_TAXA_FILE") {
        config.memory.taxa_file = Some(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("LASTSEEN_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("LASTSEEN_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
