//! Crate-wide error type.
//!
//! Each module owns a focused error enum; `Error` aggregates them for
//! callers that drive several modules, such as the CLI.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::storage::StorageError;

/// Storefront error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog request failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Credential check failed.
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Input could not be parsed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<bozor_core::PriceError> for Error {
    fn from(err: bozor_core::PriceError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
