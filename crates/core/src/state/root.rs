//! Combined state of all slices.

use std::sync::Arc;

use super::action::{Action, Slice};
use super::auth::AuthState;
use super::cart::CartState;
use super::favorites::FavoritesState;

/// All storefront state.
///
/// Slices sit behind `Arc` and are replaced wholesale. A transition that
/// leaves a slice equal to its previous value keeps the previous `Arc`, so
/// [`RootState::changed`] can detect no-ops by pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootState {
    auth: Arc<AuthState>,
    cart: Arc<CartState>,
    favorites: Arc<FavoritesState>,
}

impl RootState {
    /// Assemble a root state from individual slices.
    #[must_use]
    pub fn new(auth: AuthState, cart: CartState, favorites: FavoritesState) -> Self {
        Self {
            auth: Arc::new(auth),
            cart: Arc::new(cart),
            favorites: Arc::new(favorites),
        }
    }

    /// The auth slice.
    #[must_use]
    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// The cart slice.
    #[must_use]
    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    /// The favorites slice.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesState {
        &self.favorites
    }

    /// Apply an action to the slice it targets.
    #[must_use]
    pub fn reduce(&self, action: &Action) -> Self {
        let mut next = self.clone();
        match action.slice() {
            Slice::Auth => next.auth = replace_if_changed(&self.auth, self.auth.reduce(action)),
            Slice::Cart => next.cart = replace_if_changed(&self.cart, self.cart.reduce(action)),
            Slice::Favorites => {
                next.favorites = replace_if_changed(&self.favorites, self.favorites.reduce(action));
            }
        }
        next
    }

    /// True if `slice` holds a different value than in `previous`.
    #[must_use]
    pub fn changed(&self, previous: &Self, slice: Slice) -> bool {
        match slice {
            Slice::Auth => !Arc::ptr_eq(&self.auth, &previous.auth),
            Slice::Cart => !Arc::ptr_eq(&self.cart, &previous.cart),
            Slice::Favorites => !Arc::ptr_eq(&self.favorites, &previous.favorites),
        }
    }

    /// Replace a single slice with its empty value.
    #[must_use]
    pub fn with_empty(&self, slice: Slice) -> Self {
        let mut next = self.clone();
        match slice {
            Slice::Auth => next.auth = Arc::default(),
            Slice::Cart => next.cart = Arc::default(),
            Slice::Favorites => next.favorites = Arc::default(),
        }
        next
    }
}

fn replace_if_changed<T: PartialEq>(current: &Arc<T>, next: T) -> Arc<T> {
    if **current == next {
        Arc::clone(current)
    } else {
        Arc::new(next)
    }
}
