//! HashiCorp Vault client for database credentials
//!
//! Minimal KV v1 client over the HTTP API: one structured secret read at
//! `secret/{project}/{environment}/database` plus token self-renewal. The
//! renewal task runs in the background on a fixed interval; failures are
//! logged and never invalidate credentials already handed out.

use std::time::Duration;

use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::error::{Result, SecretsError};

/// Client for a single Vault endpoint/token pair.
#[derive(Debug, Clone)]
pub struct VaultClient {
    http: reqwest::Client,
    addr: String,
    token: String,
}

/// Database credential fields stored under the project secret path.
#[derive(Debug, Clone)]
pub struct DatabaseSecret {
    pub host: String,
    pub port: Option<u16>,
    pub database: String,
    pub username: String,
    pub password: String,
}

/// KV v1 read envelope: the secret fields sit under `data`.
#[derive(Debug, Deserialize)]
struct SecretEnvelope {
    data: RawSecret,
}

/// Raw secret payload before required-field validation. Vault KV stores
/// strings, so the port may arrive as either a string or a number.
#[derive(Debug, Deserialize)]
struct RawSecret {
    host: Option<String>,
    port: Option<serde_json::Value>,
    database: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl RawSecret {
    fn into_secret(self) -> Result<DatabaseSecret> {
        Ok(DatabaseSecret {
            host: self.host.ok_or(SecretsError::MissingField { field: "host" })?,
            port: self.port.as_ref().and_then(coerce_port),
            database: self
                .database
                .ok_or(SecretsError::MissingField { field: "database" })?,
            username: self
                .username
                .ok_or(SecretsError::MissingField { field: "username" })?,
            password: self
                .password
                .ok_or(SecretsError::MissingField { field: "password" })?,
        })
    }
}

fn coerce_port(value: &serde_json::Value) -> Option<u16> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

impl DatabaseSecret {
    /// Build a Postgres connection URL from the secret fields. The port
    /// defaults to 5432 when the secret omits it.
    pub fn connection_url(&self) -> String {
        let port = self.port.unwrap_or(5432);
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, port, self.database
        )
    }
}

/// Secret path for a project/environment pair.
fn database_secret_path(project: &str, environment: &str) -> String {
    format!("secret/{project}/{environment}/database")
}

impl VaultClient {
    pub fn new(addr: impl Into<String>, token: impl Into<String>) -> Self {
        let addr = addr.into();
        Self {
            http: reqwest::Client::new(),
            addr: addr.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Read the database secret for a project/environment pair.
    pub async fn read_database_secret(
        &self,
        project: &str,
        environment: &str,
    ) -> Result<DatabaseSecret> {
        let path = database_secret_path(project, environment);
        let response = self
            .http
            .get(format!("{}/v1/{}", self.addr, path))
            .header("X-Vault-Token", &self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SecretsError::Status {
                status: response.status().as_u16(),
                path,
            });
        }

        let envelope: SecretEnvelope = response.json().await?;
        envelope.data.into_secret()
    }

    /// Renew the client's own token via `auth/token/renew-self`.
    pub async fn renew_self(&self) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/v1/auth/token/renew-self", self.addr))
            .header("X-Vault-Token", &self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SecretsError::Status {
                status: response.status().as_u16(),
                path: "auth/token/renew-self".to_string(),
            });
        }

        Ok(())
    }

    /// Spawn the periodic token renewal task.
    ///
    /// The returned handle is abortable; the server aborts it during
    /// orderly shutdown. Renewal failures are logged and do not affect
    /// credentials issued from earlier reads.
    pub fn spawn_renewal(&self, every: Duration) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; skip it so the initial
            // renewal happens one full interval after startup.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match client.renew_self().await {
                    Ok(()) => info!("vault token renewed"),
                    Err(err) => warn!(error = %err, "vault token renewal failed"),
                }
            }
        })
    }
}
