//! Bozor Core - Shared types and state reducers.
//!
//! This crate provides the pure building blocks used across all Bozor components:
//! - `storefront` - Persistence, storage backends, store container, catalog client
//! - `cli` - Command-line front end for the store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. Every reducer maps `(previous state, action)` to a
//! new state value without touching the previous one.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, emails and phone numbers
//! - [`state`] - Line items, actions and the cart/favorites/auth reducers
//! - [`selectors`] - Derived values (totals, counts, installments)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod selectors;
pub mod state;
pub mod types;

pub use state::*;
pub use types::*;
