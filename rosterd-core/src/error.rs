/// Structured error types for rosterd-core.
///
/// Uses `thiserror` for better API surface and error composition. These
/// errors never cross the resolver boundary: the resolver converts them to
/// fallback transitions, logging as it goes. The binary crate uses `anyhow`
/// for top-level convenience.
use thiserror::Error;

/// Errors produced while talking to the secrets backend.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// HTTP transport failure
    #[error("vault request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// Vault answered with a non-success status
    #[error("vault returned {status} for {path}")]
    Status { status: u16, path: String },

    /// Secret payload is missing a required field
    #[error("vault secret missing required field '{field}'")]
    MissingField { field: &'static str },
}

/// Result type alias for rosterd-core operations
pub type Result<T> = std::result::Result<T, SecretsError>;
