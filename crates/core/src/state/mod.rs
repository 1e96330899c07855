//! Client-side storefront state.
//!
//! Three independent slices make up the [`RootState`]:
//!
//! - [`CartState`] - line items the shopper intends to buy, each with a quantity
//! - [`FavoritesState`] - a set of liked items, membership only
//! - [`AuthState`] - the signed-in user record and token
//!
//! State only changes through an [`Action`]. Each slice exposes a pure
//! `reduce(&self, &Action) -> Self`; the previous value is never mutated.

pub mod action;
pub mod auth;
pub mod cart;
pub mod favorites;
pub mod item;
pub mod root;

pub use action::{Action, AuthSession, CartLineInput, QuantityUpdate, Slice};
pub use auth::{AuthState, AuthToken, UserRecord};
pub use cart::{CartLine, CartState};
pub use favorites::FavoritesState;
pub use item::LineItem;
pub use root::RootState;

/// Errors raised when a deserialized slice violates its invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Two entries share the same product id.
    #[error("duplicate product id {0}")]
    DuplicateId(crate::ProductId),
}
