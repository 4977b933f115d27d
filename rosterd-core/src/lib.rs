//! rosterd-core: configuration and database credential resolution
//!
//! Everything the server needs before it can open a connection pool lives
//! here: typed environment configuration and the tiered secrets resolver
//! (Vault, then environment variables, then a local-development default).

pub mod config;
pub mod error;
pub mod secrets;

pub use config::{AppConfig, PoolConfig, SecretsConfig};
pub use error::SecretsError;
pub use secrets::{ConnectionConfig, CredentialSource, CredentialTier, Resolver};
