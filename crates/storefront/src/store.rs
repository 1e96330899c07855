//! The storefront state container.
//!
//! A [`Store`] owns the current [`RootState`], applies actions through the
//! pure reducers, publishes each new snapshot to subscribers and hands
//! changed slices to the [`Persistor`] according to the configured
//! [`WritePolicy`].
//!
//! ```no_run
//! # async fn demo() {
//! use bozor_core::Action;
//! use bozor_storefront::config::PersistConfig;
//! use bozor_storefront::storage::MemoryStore;
//! use bozor_storefront::store::Store;
//!
//! let mut store = Store::open(MemoryStore::new(), PersistConfig::default()).await;
//! let mut updates = store.subscribe();
//! store.dispatch(Action::ClearCart).await;
//! let latest = updates.borrow_and_update().clone();
//! # let _ = latest;
//! # }
//! ```

use bozor_core::{Action, RootState, Slice};
use tokio::sync::watch;
use tracing::instrument;

use crate::config::{PersistConfig, WritePolicy};
use crate::persistence::Persistor;
use crate::storage::KeyValueStore;

/// Single-writer state container.
///
/// `dispatch` takes `&mut self`, so actions apply one at a time in the order
/// they are issued.
#[derive(Debug)]
pub struct Store<S> {
    state: RootState,
    persistor: Persistor<S>,
    dirty: Vec<Slice>,
    updates: watch::Sender<RootState>,
}

impl<S: KeyValueStore> Store<S> {
    /// Rehydrate from `storage` and return a ready store.
    ///
    /// Never fails: unreadable or malformed slices start empty.
    #[instrument(skip_all, fields(namespace = %config.namespace))]
    pub async fn open(storage: S, config: PersistConfig) -> Self {
        let persistor = Persistor::new(storage, config);
        let state = persistor.rehydrate().await;
        let (updates, _) = watch::channel(state.clone());
        tracing::info!(
            cart_lines = state.cart().len(),
            favorites = state.favorites().len(),
            "Store opened"
        );
        Self {
            state,
            persistor,
            dirty: Vec::new(),
            updates,
        }
    }

    /// Current state snapshot.
    pub const fn state(&self) -> &RootState {
        &self.state
    }

    /// Receive every new state snapshot.
    ///
    /// The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.updates.subscribe()
    }

    /// Writes that failed since the store was opened.
    pub const fn failed_writes(&self) -> u64 {
        self.persistor.failed_writes()
    }

    /// Slices changed but not yet written under the deferred policy.
    pub fn pending(&self) -> &[Slice] {
        &self.dirty
    }

    /// Apply `action` and return the new state.
    ///
    /// Always succeeds. If the action changed its slice, subscribers are
    /// notified and the slice is written (write-through) or marked pending
    /// (deferred). Unchanged slices are never rewritten.
    #[instrument(skip(self, action), fields(action = action.kind()))]
    pub async fn dispatch(&mut self, action: Action) -> RootState {
        let slice = action.slice();
        let next = self.state.reduce(&action);
        if !next.changed(&self.state, slice) {
            tracing::debug!("No change");
            return self.state.clone();
        }

        self.state = next;
        self.updates.send_replace(self.state.clone());

        match self.persistor.config().write_policy {
            WritePolicy::WriteThrough => {
                self.persistor.persist(&self.state, slice).await;
            }
            WritePolicy::Deferred => {
                if self.persistor.config().persists(slice) && !self.dirty.contains(&slice) {
                    self.dirty.push(slice);
                }
            }
        }

        self.state.clone()
    }

    /// Write all pending slices. Returns how many were written successfully.
    #[instrument(skip(self), fields(pending = self.dirty.len()))]
    pub async fn flush(&mut self) -> usize {
        let mut written = 0;
        for slice in std::mem::take(&mut self.dirty) {
            if self.persistor.persist(&self.state, slice).await {
                written += 1;
            }
        }
        written
    }

    /// Delete all persisted keys and reset to the empty state.
    #[instrument(skip(self))]
    pub async fn purge(&mut self) {
        self.persistor.purge().await;
        self.dirty.clear();
        self.state = RootState::default();
        self.updates.send_replace(self.state.clone());
        tracing::info!("State purged");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use core::num::NonZeroU32;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bozor_core::{AuthSession, AuthToken, LineItem, Price, ProductId, UserRecord};
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    fn item(id: i64, price: i64) -> LineItem {
        LineItem::new(
            ProductId::new(id),
            format!("product {id}"),
            Price::new(Decimal::from(price)).unwrap(),
        )
    }

    /// Counts writes and optionally fails them.
    #[derive(Debug, Clone, Default)]
    struct ProbeStore {
        inner: MemoryStore,
        writes: Arc<AtomicUsize>,
        fail: bool,
    }

    impl ProbeStore {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl KeyValueStore for ProbeStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StorageError::Unavailable("disk full".to_string()));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            if self.fail {
                return Err(StorageError::Unavailable("disk full".to_string()));
            }
            self.inner.remove(key).await
        }
    }

    async fn open(storage: MemoryStore) -> Store<MemoryStore> {
        Store::open(storage, PersistConfig::default()).await
    }

    #[tokio::test]
    async fn test_add_twice_then_restart() {
        let storage = MemoryStore::new();
        let mut store = open(storage.clone()).await;
        store.dispatch(Action::add_to_cart(item(1, 100), None)).await;
        store.dispatch(Action::add_to_cart(item(1, 100), None)).await;
        drop(store);

        let store = open(storage).await;
        let line = store.state().cart().get(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity.get(), 2);
    }

    #[tokio::test]
    async fn test_set_zero_removes_and_persists() {
        let storage = MemoryStore::new();
        let mut store = open(storage.clone()).await;
        store
            .dispatch(Action::add_to_cart(item(2, 50), NonZeroU32::new(1)))
            .await;
        let state = store.dispatch(Action::set_quantity(ProductId::new(2), 0)).await;
        assert!(state.cart().is_empty());

        let reopened = open(storage).await;
        assert!(reopened.state().cart().is_empty());
    }

    #[tokio::test]
    async fn test_favorites_twice_single_entry() {
        let storage = MemoryStore::new();
        let mut store = open(storage.clone()).await;
        store.dispatch(Action::AddToFavorites(item(5, 1))).await;
        store.dispatch(Action::AddToFavorites(item(5, 1))).await;
        assert_eq!(store.state().favorites().len(), 1);
        assert_eq!(open(storage).await.state().favorites().len(), 1);
    }

    #[tokio::test]
    async fn test_noop_skips_write() {
        let storage = ProbeStore::default();
        let mut store = Store::open(storage.clone(), PersistConfig::default()).await;

        store.dispatch(Action::RemoveFromCart(ProductId::new(99))).await;
        assert_eq!(storage.writes(), 0);

        store.dispatch(Action::AddToFavorites(item(5, 1))).await;
        store.dispatch(Action::AddToFavorites(item(5, 1))).await;
        assert_eq!(storage.writes(), 1);
    }

    #[tokio::test]
    async fn test_failed_writes_are_counted_not_returned() {
        let mut store = Store::open(ProbeStore::failing(), PersistConfig::default()).await;
        let state = store.dispatch(Action::add_to_cart(item(1, 10), None)).await;

        assert_eq!(state.cart().len(), 1);
        assert_eq!(store.state().cart().len(), 1);
        assert_eq!(store.failed_writes(), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_each_change() {
        let mut store = open(MemoryStore::new()).await;
        let mut updates = store.subscribe();
        assert!(updates.borrow_and_update().cart().is_empty());

        store.dispatch(Action::add_to_cart(item(1, 10), None)).await;
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().cart().len(), 1);

        store.dispatch(Action::RemoveFromCart(ProductId::new(42))).await;
        assert!(!updates.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_deferred_writes_on_flush() {
        let storage = ProbeStore::default();
        let config = PersistConfig {
            write_policy: WritePolicy::Deferred,
            ..PersistConfig::default()
        };
        let mut store = Store::open(storage.clone(), config.clone()).await;
        store.dispatch(Action::add_to_cart(item(1, 10), None)).await;
        store.dispatch(Action::add_to_cart(item(2, 10), None)).await;
        store.dispatch(Action::AddToFavorites(item(3, 10))).await;

        assert_eq!(storage.writes(), 0);
        assert_eq!(store.pending(), [Slice::Cart, Slice::Favorites]);

        assert_eq!(store.flush().await, 2);
        assert_eq!(storage.writes(), 2);
        assert!(store.pending().is_empty());

        let reopened = Store::open(storage, config).await;
        assert_eq!(reopened.state().cart().len(), 2);
        assert_eq!(reopened.state().favorites().len(), 1);
    }

    #[tokio::test]
    async fn test_deferred_ignores_non_whitelisted() {
        let config = PersistConfig {
            write_policy: WritePolicy::Deferred,
            whitelist: vec![Slice::Cart],
            ..PersistConfig::default()
        };
        let mut store = Store::open(MemoryStore::new(), config).await;
        store.dispatch(Action::AddToFavorites(item(3, 10))).await;
        assert!(store.pending().is_empty());
    }

    #[tokio::test]
    async fn test_login_logout_persist() {
        let storage = MemoryStore::new();
        let mut store = open(storage.clone()).await;
        store
            .dispatch(Action::Login(AuthSession {
                user: UserRecord::new(json!({"email": "a@b.uz"})),
                token: AuthToken::new("tok"),
            }))
            .await;
        assert!(open(storage.clone()).await.state().auth().is_auth());

        store.dispatch(Action::Logout).await;
        assert!(!open(storage).await.state().auth().is_auth());
    }

    #[tokio::test]
    async fn test_purge_resets_everything() {
        let storage = MemoryStore::new();
        let mut store = open(storage.clone()).await;
        store.dispatch(Action::add_to_cart(item(1, 10), None)).await;
        store.dispatch(Action::AddToFavorites(item(2, 10))).await;
        let mut updates = store.subscribe();

        store.purge().await;

        assert_eq!(store.state(), &RootState::default());
        assert!(storage.is_empty().await);
        assert!(updates.has_changed().unwrap());
        assert!(updates.borrow_and_update().favorites().is_empty());
    }
}
