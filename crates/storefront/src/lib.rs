//! Bozor storefront library.
//!
//! Wraps the pure reducers from `bozor-core` in a persistent [`store::Store`]
//! and provides the collaborators around it: storage backends, the product
//! catalog client and the credential policy.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod credentials;
pub mod error;
pub mod persistence;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
