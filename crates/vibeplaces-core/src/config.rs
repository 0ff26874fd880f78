use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const DEFAULT_ALLOWED_ORIGIN_SUFFIXES: &str = ".netlify.app";
const DEFAULT_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for tests
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset, matching how `.env` templates leave them.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("VIBEPLACES_ENV", "development"));

    let bind_addr = match optional("VIBEPLACES_BIND_ADDR") {
        Some(raw) => raw
            .parse::<SocketAddr>()
            .map_err(|e| invalid("VIBEPLACES_BIND_ADDR", e.to_string()))?,
        None => {
            let port = optional("PORT")
                .map(|raw| {
                    raw.parse::<u16>()
                        .map_err(|e| invalid("PORT", e.to_string()))
                })
                .transpose()?
                .unwrap_or(5000);
            SocketAddr::from(([0, 0, 0, 0], port))
        }
    };

    let log_level = or_default("VIBEPLACES_LOG_LEVEL", "info");
    let google_maps_api_key = optional("GOOGLE_MAPS_API_KEY");

    let mut allowed_origins = split_list(&or_default(
        "VIBEPLACES_ALLOWED_ORIGINS",
        DEFAULT_ALLOWED_ORIGINS,
    ));
    if let Some(frontend) = optional("FRONTEND_URL") {
        if !allowed_origins.contains(&frontend) {
            allowed_origins.push(frontend);
        }
    }
    let allowed_origin_suffixes = split_list(&or_default(
        "VIBEPLACES_ALLOWED_ORIGIN_SUFFIXES",
        DEFAULT_ALLOWED_ORIGIN_SUFFIXES,
    ));

    let vibes_path = optional("VIBEPLACES_VIBES_PATH").map(PathBuf::from);
    let maps_base_url = or_default("VIBEPLACES_MAPS_BASE_URL", DEFAULT_MAPS_BASE_URL);

    let maps_timeout_secs = or_default("VIBEPLACES_MAPS_TIMEOUT_SECS", "15")
        .parse::<u64>()
        .map_err(|e| invalid("VIBEPLACES_MAPS_TIMEOUT_SECS", e.to_string()))?;

    let geocode_region = or_default("VIBEPLACES_GEOCODE_REGION", "India");

    let rng_seed = optional("VIBEPLACES_RNG_SEED")
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|e| invalid("VIBEPLACES_RNG_SEED", e.to_string()))
        })
        .transpose()?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        google_maps_api_key,
        allowed_origins,
        allowed_origin_suffixes,
        vibes_path,
        maps_base_url,
        maps_timeout_secs,
        geocode_region,
        rng_seed,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
