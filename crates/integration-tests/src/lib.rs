//! Integration tests for Bozor.
//!
//! # Running Tests
//!
//! ```bash
//! # File and memory backends
//! cargo test -p bozor-integration-tests
//!
//! # Postgres backend (needs a scratch database)
//! BOZOR_TEST_DATABASE_URL=postgres://localhost/bozor_test \
//!     cargo test -p bozor-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `restart` - state survives a store being dropped and reopened
//! - `postgres_store` - the `storefront.kv_entry` backend

use bozor_core::{LineItem, Price, ProductId};
use rust_decimal::Decimal;
use secrecy::SecretString;

/// Env var holding the scratch database URL for postgres tests.
pub const TEST_DATABASE_URL_VAR: &str = "BOZOR_TEST_DATABASE_URL";

/// A line item priced in cents.
///
/// # Panics
///
/// Panics if `cents` is negative.
#[must_use]
pub fn item(id: i64, name: &str, cents: i64) -> LineItem {
    let price = Price::new(Decimal::new(cents, 2)).unwrap_or_else(|e| panic!("bad fixture: {e}"));
    LineItem::new(ProductId::new(id), name, price)
}

/// The scratch database URL, if configured.
#[must_use]
pub fn test_database_url() -> Option<SecretString> {
    std::env::var(TEST_DATABASE_URL_VAR).ok().map(SecretString::from)
}
