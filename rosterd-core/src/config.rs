//! Environment-derived configuration
//!
//! Configuration is snapshotted from the process environment once at
//! startup. Tests build configs from plain maps via `from_vars` so they
//! never mutate global process state.

use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::warn;

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to bind to (HOST, default 0.0.0.0)
    pub host: String,
    /// Listening port (PORT, default 3000)
    pub port: u16,
    pub pool: PoolConfig,
    pub secrets: SecretsConfig,
}

/// Connection pool sizing and checkout behavior.
///
/// The pool owns all queueing/admission logic; these two knobs are the
/// only tuning surface exposed.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Ceiling on simultaneous physical connections (DB_POOL_SIZE)
    pub max_connections: u32,
    /// Checkout timeout in seconds (DB_ACQUIRE_TIMEOUT_SECS)
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            acquire_timeout_secs: 30,
        }
    }
}

/// Inputs to the secrets resolver, covering all three fallback tiers.
#[derive(Debug, Clone, Default)]
pub struct SecretsConfig {
    /// Vault endpoint (VAULT_ADDR); the Vault tier is active only when
    /// both address and token are present.
    pub vault_addr: Option<String>,
    /// Vault access token (VAULT_TOKEN)
    pub vault_token: Option<String>,
    /// First segment of the secret path (PROJECT_NAME, default "default")
    pub project_name: String,
    /// Second segment of the secret path (ENVIRONMENT, default "dev")
    pub environment: String,
    /// Whether the Vault tier is consulted at all (VAULT_AUTO_INIT,
    /// disabled only by the literal string "false")
    pub auto_init: bool,
    /// Whether to run the periodic token renewal task (VAULT_AUTO_RENEW,
    /// enabled only by the literal string "true")
    pub auto_renew: bool,
    /// Renewal cadence in hours (VAULT_RENEW_INTERVAL_HOURS, default 6)
    pub renew_interval_hours: u64,
    /// Explicit connection string override (DATABASE_URL)
    pub database_url: Option<String>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub db_name: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
}

impl AppConfig {
    /// Snapshot configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(&env::vars().collect())
    }

    /// Build configuration from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        Self {
            host: vars
                .get("HOST")
                .cloned()
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", vars.get("PORT"), 3000),
            pool: PoolConfig {
                max_connections: parse_or("DB_POOL_SIZE", vars.get("DB_POOL_SIZE"), 20),
                acquire_timeout_secs: parse_or(
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    vars.get("DB_ACQUIRE_TIMEOUT_SECS"),
                    30,
                ),
            },
            secrets: SecretsConfig::from_vars(vars),
        }
    }
}

impl SecretsConfig {
    /// Snapshot resolver inputs from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(&env::vars().collect())
    }

    /// Build resolver inputs from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        Self {
            vault_addr: non_empty(vars.get("VAULT_ADDR")),
            vault_token: non_empty(vars.get("VAULT_TOKEN")),
            project_name: vars
                .get("PROJECT_NAME")
                .cloned()
                .unwrap_or_else(|| "default".to_string()),
            environment: vars
                .get("ENVIRONMENT")
                .cloned()
                .unwrap_or_else(|| "dev".to_string()),
            auto_init: vars.get("VAULT_AUTO_INIT").map(String::as_str) != Some("false"),
            auto_renew: vars.get("VAULT_AUTO_RENEW").map(String::as_str) == Some("true"),
            renew_interval_hours: parse_or(
                "VAULT_RENEW_INTERVAL_HOURS",
                vars.get("VAULT_RENEW_INTERVAL_HOURS"),
                6,
            ),
            database_url: non_empty(vars.get("DATABASE_URL")),
            db_host: non_empty(vars.get("DB_HOST")),
            db_port: vars.get("DB_PORT").and_then(|p| {
                p.parse()
                    .map_err(|e| warn!("Invalid DB_PORT value '{p}': {e}"))
                    .ok()
            }),
            db_name: non_empty(vars.get("DB_NAME")),
            db_user: non_empty(vars.get("DB_USER")),
            db_password: non_empty(vars.get("DB_PASSWORD")),
        }
    }

    /// Whether a Vault backend is configured and enabled.
    pub fn vault_enabled(&self) -> bool {
        self.auto_init && self.vault_addr.is_some() && self.vault_token.is_some()
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

fn parse_or<T: FromStr>(key: &str, value: Option<&String>, default: T) -> T
where
    T::Err: Display,
{
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}, using default");
            default
        }),
        None => default,
    }
}
