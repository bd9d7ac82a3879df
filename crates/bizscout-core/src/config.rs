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
/// Decoupled from the real environment so it can be tested with a pure
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("SCOUT_LOG_LEVEL", "info");
    let niches_path = PathBuf::from(or_default("SCOUT_NICHES_PATH", "./config/niches.yaml"));

    let maps_base_url = or_default(
        "SCOUT_MAPS_BASE_URL",
        "https://maps.googleapis.com/maps/api/place",
    );
    let maps_api_key = optional("SCOUT_MAPS_API_KEY");
    let social_base_url = or_default("SCOUT_SOCIAL_BASE_URL", "https://i.instagram.com");
    let social_app_id = optional("SCOUT_SOCIAL_APP_ID");
    let user_agent = or_default(
        "SCOUT_USER_AGENT",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    );

    let request_timeout_secs = parse_u64("SCOUT_REQUEST_TIMEOUT_SECS", "15")?;
    let website_timeout_secs = parse_u64("SCOUT_WEBSITE_TIMEOUT_SECS", "10")?;
    let min_delay_ms = parse_u64("SCOUT_MIN_DELAY_MS", "1500")?;
    let max_delay_ms = parse_u64("SCOUT_MAX_DELAY_MS", "2500")?;
    if min_delay_ms > max_delay_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "SCOUT_MIN_DELAY_MS".to_string(),
            reason: format!("{min_delay_ms} exceeds SCOUT_MAX_DELAY_MS ({max_delay_ms})"),
        });
    }
    let max_retries = parse_u32("SCOUT_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("SCOUT_RETRY_BACKOFF_BASE_SECS", "2")?;
    let max_workers = parse_usize("SCOUT_MAX_WORKERS", "3")?;
    if max_workers == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SCOUT_MAX_WORKERS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let stage_timeout_secs = parse_u64("SCOUT_STAGE_TIMEOUT_SECS", "45")?;
    let run_budget_secs = parse_u64("SCOUT_RUN_BUDGET_SECS", "600")?;
    let social_post_sample = parse_usize("SCOUT_SOCIAL_POST_SAMPLE", "12")?;

    let analyzer_api_key = optional("GROQ_API_KEY");
    let analyzer_url = or_default(
        "SCOUT_ANALYZER_URL",
        "https://api.groq.com/openai/v1/chat/completions",
    );
    let analyzer_model = or_default("SCOUT_ANALYZER_MODEL", "llama-3.3-70b-versatile");

    Ok(AppConfig {
        log_level,
        niches_path,
        maps_base_url,
        maps_api_key,
        social_base_url,
        social_app_id,
        user_agent,
        request_timeout_secs,
        website_timeout_secs,
        min_delay_ms,
        max_delay_ms,
        max_retries,
        retry_backoff_base_secs,
        max_workers,
        stage_timeout_secs,
        run_budget_secs,
        social_post_sample,
        analyzer_api_key,
        analyzer_url,
        analyzer_model,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
