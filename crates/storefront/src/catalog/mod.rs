//! Product catalog access.
//!
//! The catalog is an external, read-only collaborator. Callers that render
//! listings fail closed: a failed request shows as an empty result rather
//! than an error page. See [`fail_closed`].

mod client;
mod listing;
mod types;

use thiserror::Error;

pub use client::CatalogClient;
pub use listing::{Listing, Refinement, SortOrder};
pub use types::{Category, Product, ProductPage};

/// Errors from catalog requests.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Catalog returned {status}: {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The configured base URL cannot be used for requests.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

/// Unwrap a catalog result, logging failures and substituting the empty
/// value.
pub fn fail_closed<T: Default>(result: Result<T, CatalogError>, context: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(context, error = %e, "Catalog request failed, showing empty result");
        T::default()
    })
}
