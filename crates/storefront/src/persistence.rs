//! Mirrors state slices to a [`KeyValueStore`].
//!
//! Each slice is written under `<namespace>.<slice>` wrapped in an envelope:
//!
//! ```json
//! {"version": 1, "savedAt": "2026-03-01T12:00:00Z", "state": {"items": []}}
//! ```
//!
//! Reading never fails. A missing key, unparseable JSON, an unknown envelope
//! version or a slice that breaks its invariants all come back as the empty
//! slice. Write failures are logged and counted, not returned.

use bozor_core::{AuthState, CartState, FavoritesState, RootState, Slice};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::PersistConfig;
use crate::storage::KeyValueStore;

/// Envelope version written by this build.
pub const ENVELOPE_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeOut<'a, T> {
    version: u32,
    saved_at: DateTime<Utc>,
    state: &'a T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeIn {
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    state: serde_json::Value,
}

/// Why a stored slice was discarded.
#[derive(Debug, thiserror::Error)]
enum DecodeError {
    #[error("malformed envelope: {0}")]
    Envelope(serde_json::Error),
    #[error("unsupported envelope version {0}")]
    Version(u32),
    #[error("invalid slice: {0}")]
    Slice(serde_json::Error),
}

/// Serialize one slice of `state` into an envelope.
///
/// # Errors
///
/// Returns the `serde_json` error if serialization fails.
pub fn encode_slice(state: &RootState, slice: Slice) -> Result<String, serde_json::Error> {
    let saved_at = Utc::now();
    match slice {
        Slice::Auth => wrap(state.auth(), saved_at),
        Slice::Cart => wrap(state.cart(), saved_at),
        Slice::Favorites => wrap(state.favorites(), saved_at),
    }
}

fn wrap<T: Serialize>(state: &T, saved_at: DateTime<Utc>) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeOut {
        version: ENVELOPE_VERSION,
        saved_at,
        state,
    })
}

fn decode<T: DeserializeOwned>(raw: &str) -> Result<(T, Option<DateTime<Utc>>), DecodeError> {
    let envelope: EnvelopeIn = serde_json::from_str(raw).map_err(DecodeError::Envelope)?;
    if envelope.version != ENVELOPE_VERSION {
        return Err(DecodeError::Version(envelope.version));
    }
    let state = serde_json::from_value(envelope.state).map_err(DecodeError::Slice)?;
    Ok((state, envelope.saved_at))
}

/// Reads and writes state slices through a storage backend.
#[derive(Debug)]
pub struct Persistor<S> {
    storage: S,
    config: PersistConfig,
    failed_writes: u64,
}

impl<S: KeyValueStore> Persistor<S> {
    pub const fn new(storage: S, config: PersistConfig) -> Self {
        Self {
            storage,
            config,
            failed_writes: 0,
        }
    }

    /// Persistence settings.
    pub const fn config(&self) -> &PersistConfig {
        &self.config
    }

    /// Writes and removals that failed since this persistor was created.
    pub const fn failed_writes(&self) -> u64 {
        self.failed_writes
    }

    /// Load every whitelisted slice. Other slices start empty.
    #[instrument(skip(self), fields(namespace = %self.config.namespace))]
    pub async fn rehydrate(&self) -> RootState {
        let auth: AuthState = self.load(Slice::Auth).await;
        let cart: CartState = self.load(Slice::Cart).await;
        let favorites: FavoritesState = self.load(Slice::Favorites).await;
        tracing::debug!(
            cart_lines = cart.len(),
            favorites = favorites.len(),
            signed_in = auth.is_auth(),
            "Rehydrated state"
        );
        RootState::new(auth, cart, favorites)
    }

    async fn load<T: DeserializeOwned + Default>(&self, slice: Slice) -> T {
        if !self.config.persists(slice) {
            return T::default();
        }

        let key = self.config.key(slice);
        let raw = match self.storage.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read persisted state, starting empty");
                return T::default();
            }
        };

        match decode::<T>(&raw) {
            Ok((state, saved_at)) => {
                tracing::trace!(key = %key, saved_at = ?saved_at, "Loaded slice");
                state
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding malformed persisted state");
                T::default()
            }
        }
    }

    /// Write one slice if it is whitelisted. Returns true if a write
    /// happened and succeeded.
    #[instrument(skip(self, state, slice), fields(slice = %slice))]
    pub async fn persist(&mut self, state: &RootState, slice: Slice) -> bool {
        if !self.config.persists(slice) {
            return false;
        }

        let key = self.config.key(slice);
        let value = match encode_slice(state, slice) {
            Ok(value) => value,
            Err(e) => {
                self.failed_writes += 1;
                tracing::error!(key = %key, error = %e, "Failed to serialize state");
                return false;
            }
        };

        match self.storage.set(&key, &value).await {
            Ok(()) => {
                tracing::debug!(key = %key, bytes = value.len(), "Persisted slice");
                true
            }
            Err(e) => {
                self.failed_writes += 1;
                tracing::error!(key = %key, error = %e, "Failed to persist state");
                false
            }
        }
    }

    /// Remove every slice key in the namespace, whitelisted or not.
    #[instrument(skip(self), fields(namespace = %self.config.namespace))]
    pub async fn purge(&mut self) {
        for slice in Slice::ALL {
            let key = self.config.key(slice);
            if let Err(e) = self.storage.remove(&key).await {
                self.failed_writes += 1;
                tracing::error!(key = %key, error = %e, "Failed to purge state");
            }
        }
    }
}
