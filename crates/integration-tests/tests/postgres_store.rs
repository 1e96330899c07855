//! Integration tests for the postgres storage backend.
//!
//! These need a scratch database in `BOZOR_TEST_DATABASE_URL` and are
//! ignored by default.

#![allow(clippy::unwrap_used)]

use bozor_core::{Action, ProductId};
use bozor_integration_tests::{TEST_DATABASE_URL_VAR, item, test_database_url};
use bozor_storefront::config::PersistConfig;
use bozor_storefront::storage::{KeyValueStore, PgStore, create_pool, run_migrations};
use bozor_storefront::store::Store;

async fn connect() -> PgStore {
    let url = test_database_url()
        .unwrap_or_else(|| panic!("{TEST_DATABASE_URL_VAR} must be set for postgres tests"));
    let pool = create_pool(&url).await.unwrap();
    run_migrations(&pool).await.unwrap();
    PgStore::new(pool)
}

/// A namespace no other test run shares.
fn namespace(test: &str) -> PersistConfig {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    PersistConfig {
        namespace: format!("it-{test}-{nanos}"),
        ..PersistConfig::default()
    }
}

#[tokio::test]
#[ignore = "Requires BOZOR_TEST_DATABASE_URL"]
async fn test_set_get_remove() {
    let store = connect().await;
    let key = format!("{}.cart", namespace("kv").namespace);

    assert_eq!(store.get(&key).await.unwrap(), None);
    store.set(&key, "one").await.unwrap();
    store.set(&key, "two").await.unwrap();
    assert_eq!(store.get(&key).await.unwrap().as_deref(), Some("two"));

    store.remove(&key).await.unwrap();
    store.remove(&key).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "Requires BOZOR_TEST_DATABASE_URL"]
async fn test_cart_survives_restart() {
    let config = namespace("restart");

    let mut store = Store::open(connect().await, config.clone()).await;
    store
        .dispatch(Action::add_to_cart(item(1, "Phone", 49_900), None))
        .await;
    store
        .dispatch(Action::add_to_cart(item(1, "Phone", 49_900), None))
        .await;
    store
        .dispatch(Action::AddToFavorites(item(2, "Case", 1_500)))
        .await;
    assert_eq!(store.failed_writes(), 0);
    drop(store);

    let mut store = Store::open(connect().await, config).await;
    assert_eq!(
        store.state().cart().get(ProductId::new(1)).unwrap().quantity.get(),
        2
    );
    assert_eq!(store.state().favorites().len(), 1);

    store.purge().await;
    assert_eq!(store.failed_writes(), 0);
}
