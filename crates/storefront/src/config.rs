//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Storage
//! - `BOZOR_STORAGE` - Backend: `memory`, `file` or `postgres` (default: file)
//! - `BOZOR_STATE_DIR` - Directory for the file backend (default: .bozor)
//! - `BOZOR_DATABASE_URL` - `PostgreSQL` connection string, falls back to
//!   `DATABASE_URL`. Required for the postgres backend.
//!
//! ## Persistence
//! - `BOZOR_NAMESPACE` - Key namespace (default: root)
//! - `BOZOR_PERSIST` - Comma-separated slices to persist (default: auth,cart,favorites)
//! - `BOZOR_WRITE_POLICY` - `write-through` or `deferred` (default: write-through)
//!
//! ## Catalog
//! - `CATALOG_BASE_URL` - Product catalog endpoint (default: <https://dummyjson.com>)
//! - `CATALOG_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `CATALOG_PAGE_SIZE` - Listing page size (default: 12)

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bozor_core::Slice;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::storage::validate_key;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where persisted state lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local map. Nothing survives a restart.
    Memory,
    /// One JSON file per key.
    #[default]
    File,
    /// `storefront.kv_entry` table.
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

/// When state changes reach storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// Every changing dispatch awaits its write.
    #[default]
    WriteThrough,
    /// Changed slices are marked dirty and written on flush.
    Deferred,
}

impl FromStr for WritePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "write-through" | "writethrough" => Ok(Self::WriteThrough),
            "deferred" => Ok(Self::Deferred),
            other => Err(format!("unknown write policy '{other}'")),
        }
    }
}

/// How state is mirrored to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistConfig {
    /// Prefix of every storage key, e.g. `root` gives `root.cart`.
    pub namespace: String,
    /// Slices that are persisted and rehydrated.
    pub whitelist: Vec<Slice>,
    /// When writes happen.
    pub write_policy: WritePolicy,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            namespace: "root".to_string(),
            whitelist: Slice::ALL.to_vec(),
            write_policy: WritePolicy::WriteThrough,
        }
    }
}

impl PersistConfig {
    /// True if `slice` is persisted.
    #[must_use]
    pub fn persists(&self, slice: Slice) -> bool {
        self.whitelist.contains(&slice)
    }

    /// Storage key for `slice`.
    #[must_use]
    pub fn key(&self, slice: Slice) -> String {
        format!("{}.{}", self.namespace, slice)
    }
}

/// Product catalog client configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Catalog base URL
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Products per listing page
    pub page_size: u32,
}

/// Storefront configuration.
///
/// Implements `Debug` manually to redact the database URL.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Selected storage backend
    pub storage: StorageBackend,
    /// Directory used by the file backend
    pub state_dir: PathBuf,
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Persistence settings
    pub persist: PersistConfig,
    /// Catalog client settings
    pub catalog: CatalogConfig,
}

impl fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("storage", &self.storage)
            .field("state_dir", &self.state_dir)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("persist", &self.persist)
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid, or if the postgres
    /// backend is selected without a database URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let storage = env.parse_or("BOZOR_STORAGE", StorageBackend::File)?;
        let state_dir = PathBuf::from(env.or_default("BOZOR_STATE_DIR", ".bozor"));
        let database_url = env
            .optional("BOZOR_DATABASE_URL")
            .or_else(|| env.optional("DATABASE_URL"))
            .map(SecretString::from);
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingEnvVar("BOZOR_DATABASE_URL".to_string()));
        }

        Ok(Self {
            storage,
            state_dir,
            database_url,
            persist: PersistConfig::from_env(&env)?,
            catalog: CatalogConfig::from_env(&env)?,
        })
    }
}

impl PersistConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let namespace = env.or_default("BOZOR_NAMESPACE", "root");
        validate_key(&namespace).map_err(|e| {
            ConfigError::InvalidEnvVar("BOZOR_NAMESPACE".to_string(), e.to_string())
        })?;

        let whitelist = match env.optional("BOZOR_PERSIST") {
            None => Slice::ALL.to_vec(),
            Some(raw) => parse_whitelist(&raw)
                .map_err(|e| ConfigError::InvalidEnvVar("BOZOR_PERSIST".to_string(), e))?,
        };

        Ok(Self {
            namespace,
            whitelist,
            write_policy: env.parse_or("BOZOR_WRITE_POLICY", WritePolicy::WriteThrough)?,
        })
    }
}

impl CatalogConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let base_url = env
            .or_default("CATALOG_BASE_URL", "https://dummyjson.com")
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_BASE_URL".to_string(), e.to_string())
            })?;
        let timeout_secs: u64 = env.parse_or("CATALOG_TIMEOUT_SECS", 10)?;
        let page_size: u32 = env.parse_or("CATALOG_PAGE_SIZE", 12)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            page_size,
        })
    }
}

/// Parse a comma-separated slice list. An empty list disables persistence.
fn parse_whitelist(raw: &str) -> Result<Vec<Slice>, String> {
    let mut slices = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let slice = part.parse::<Slice>()?;
        if !slices.contains(&slice) {
            slices.push(slice);
        }
    }
    Ok(slices)
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable. Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, using `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}
