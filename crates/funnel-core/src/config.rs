use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// `BOT_TOKEN` is optional here; commands that talk to the bot API call
/// [`AppConfig::require_bot_token`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let bot_token = lookup("BOT_TOKEN").ok().filter(|t| !t.trim().is_empty());

    let users_path = PathBuf::from(or_default("FUNNEL_USERS_PATH", "./users.csv"));
    let output_dir = PathBuf::from(or_default("FUNNEL_OUTPUT_DIR", "./output"));
    let profiles_dir = PathBuf::from(or_default("FUNNEL_PROFILES_DIR", "./profiles"));
    let templates_dir = PathBuf::from(or_default("FUNNEL_TEMPLATES_DIR", "./templates"));
    let assets_root = PathBuf::from(or_default("FUNNEL_ASSETS_ROOT", "."));

    let send_delay_ms = parse_u64("FUNNEL_SEND_DELAY_MS", "1000")?;
    let log_level = or_default("FUNNEL_LOG_LEVEL", "info");

    let telegram_api_url = or_default("FUNNEL_TELEGRAM_API_URL", "https://api.telegram.org");
    let request_timeout_secs = parse_u64("FUNNEL_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FUNNEL_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let browser_path = lookup("FUNNEL_BROWSER_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        bot_token,
        users_path,
        output_dir,
        profiles_dir,
        templates_dir,
        assets_root,
        send_delay_ms,
        log_level,
        telegram_api_url,
        request_timeout_secs,
        browser_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
