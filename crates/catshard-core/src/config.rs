use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Reads the process environment without loading `.env` files.
fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment is valid.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let output_dir = PathBuf::from(or_default("CATSHARD_OUTPUT_DIR", "./output"));
    let log_level = or_default("CATSHARD_LOG_LEVEL", "info");
    let navigation_timeout_secs = parse_u64("CATSHARD_NAVIGATION_TIMEOUT_SECS", "30")?;
    if navigation_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CATSHARD_NAVIGATION_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("CATSHARD_USER_AGENT", "catshard/0.1 (catalog-crawler)");
    let inter_request_delay_ms = parse_u64("CATSHARD_INTER_REQUEST_DELAY_MS", "250")?;

    Ok(AppConfig {
        output_dir,
        log_level,
        navigation_timeout_secs,
        user_agent,
        inter_request_delay_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
