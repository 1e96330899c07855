//! Durable key-value storage for persisted state.
//!
//! Three backends share one trait: an in-process map, a directory of JSON
//! files and a `PostgreSQL` table. [`AnyStore`] picks one at runtime from
//! configuration.

mod file;
mod memory;
mod postgres;

use std::future::Future;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use postgres::{PgStore, create_pool, run_migrations};

use crate::config::{StorageBackend, StorefrontConfig};

/// Longest key any backend accepts.
pub const MAX_KEY_LENGTH: usize = 128;

/// Errors from storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Key contains characters the backend cannot store.
    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// Backend is misconfigured or not reachable.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous string key-value storage.
///
/// Values are opaque strings. `get` of an unknown key is `Ok(None)` and
/// `remove` of an unknown key succeeds.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete `key`.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Check that `key` is usable by every backend.
///
/// Keys are limited to ASCII letters, digits, `.`, `_` and `-`, may not
/// start with `.` and may not be empty.
///
/// # Errors
///
/// Returns `StorageError::InvalidKey` describing the first violation.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let reason = if key.is_empty() {
        Some("empty")
    } else if key.len() > MAX_KEY_LENGTH {
        Some("too long")
    } else if key.starts_with('.') {
        Some("starts with '.'")
    } else if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        Some("only letters, digits, '.', '_' and '-' are allowed")
    } else {
        None
    };

    reason.map_or(Ok(()), |reason| {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
            reason,
        })
    })
}

/// A backend chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Memory(MemoryStore),
    File(FileStore),
    Postgres(PgStore),
}

impl AnyStore {
    /// Open the backend selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if postgres is selected without a
    /// URL, or the underlying error if the database cannot be reached.
    pub async fn connect(config: &StorefrontConfig) -> Result<Self, StorageError> {
        match config.storage {
            StorageBackend::Memory => Ok(Self::Memory(MemoryStore::new())),
            StorageBackend::File => Ok(Self::File(FileStore::new(&config.state_dir))),
            StorageBackend::Postgres => {
                let url = config.database_url.as_ref().ok_or_else(|| {
                    StorageError::Unavailable("no database URL configured".to_string())
                })?;
                let pool = create_pool(url).await?;
                Ok(Self::Postgres(PgStore::new(pool)))
            }
        }
    }

    /// Short backend name for logs.
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File(_) => "file",
            Self::Postgres(_) => "postgres",
        }
    }
}

impl KeyValueStore for AnyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::Memory(store) => store.get(key).await,
            Self::File(store) => store.get(key).await,
            Self::Postgres(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Self::Memory(store) => store.set(key, value).await,
            Self::File(store) => store.set(key, value).await,
            Self::Postgres(store) => store.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Self::Memory(store) => store.remove(key).await,
            Self::File(store) => store.remove(key).await,
            Self::Postgres(store) => store.remove(key).await,
        }
    }
}
