use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, Environment, FinderSettings};
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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        parse_value::<SocketAddr>(var, &or_default(var, default))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        parse_value::<u32>(var, &or_default(var, default))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_value::<u64>(var, &or_default(var, default))
    };

    let parse_positive_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = parse_value::<f64>(var, &or_default(var, default))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must be a positive number, got {value}"),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("STOREFINDER_ENV", "development"));
    let bind_addr = parse("STOREFINDER_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("STOREFINDER_LOG_LEVEL", "info");
    let database_url = optional("DATABASE_URL");
    let catalog_path = PathBuf::from(or_default(
        "STOREFINDER_CATALOG_PATH",
        "./config/stores.yaml",
    ));

    let db_max_connections = parse_u32("STOREFINDER_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("STOREFINDER_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("STOREFINDER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let viacep_base_url = or_default("VIACEP_BASE_URL", "https://viacep.com.br/ws");
    let google_maps_base_url = or_default(
        "GOOGLE_MAPS_BASE_URL",
        "https://maps.googleapis.com/maps/api",
    );
    let google_maps_api_key = optional("GOOGLE_MAPS_API_KEY");
    let melhor_envio_base_url = or_default(
        "MELHOR_ENVIO_BASE_URL",
        "https://sandbox.melhorenvio.com.br/api/v2",
    );
    let melhor_envio_token = optional("MELHOR_ENVIO_TOKEN");
    let http_timeout_secs = parse_u64("STOREFINDER_HTTP_TIMEOUT_SECS", "10")?;
    let http_user_agent = or_default(
        "STOREFINDER_HTTP_USER_AGENT",
        "storefinder/0.1 (nearest-store)",
    );

    let defaults = FinderSettings::default();
    let search_radius_meters = parse_positive_f64("STOREFINDER_SEARCH_RADIUS_METERS", "50000")?;
    let fallback_speed_kmh = parse_positive_f64("STOREFINDER_FALLBACK_SPEED_KMH", "60")?;
    let dropoff_fee = parse_value::<Decimal>(
        "STOREFINDER_DROPOFF_FEE",
        &or_default("STOREFINDER_DROPOFF_FEE", "15.00"),
    )?;
    if dropoff_fee.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_DROPOFF_FEE".to_string(),
            reason: "fee must not be negative".to_string(),
        });
    }
    let dropoff_delivery_days = parse_u32("STOREFINDER_DROPOFF_DELIVERY_DAYS", "1")?;
    let allowed_services = parse_service_list(&or_default("STOREFINDER_ALLOWED_SERVICES", "1,2"));
    if allowed_services.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_ALLOWED_SERVICES".to_string(),
            reason: "at least one service code is required".to_string(),
        });
    }
    let max_concurrent_candidates =
        parse_value::<usize>(
            "STOREFINDER_MAX_CONCURRENT_CANDIDATES",
            &or_default("STOREFINDER_MAX_CONCURRENT_CANDIDATES", "4"),
        )?
        .max(1);
    let request_budget_ms = parse_u64("STOREFINDER_REQUEST_BUDGET_MS", "20000")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        database_url,
        catalog_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        viacep_base_url,
        google_maps_base_url,
        google_maps_api_key,
        melhor_envio_base_url,
        melhor_envio_token,
        http_timeout_secs,
        http_user_agent,
        finder: FinderSettings {
            search_radius_meters,
            fallback_speed_kmh,
            dropoff_fee,
            dropoff_delivery_days,
            allowed_services,
            max_concurrent_candidates,
            request_budget_ms,
            ..defaults
        },
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Split a comma-separated list of carrier service codes, dropping blanks.
fn parse_service_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
