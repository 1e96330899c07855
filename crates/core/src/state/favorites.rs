//! Favorites slice: a set of liked items keyed by product id.

use serde::{Deserialize, Serialize};

use super::StateError;
use super::action::Action;
use super::item::LineItem;
use crate::ProductId;

/// Liked items, independent of cart membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FavoritesSnapshot")]
pub struct FavoritesState {
    favorites: Vec<LineItem>,
}

#[derive(Deserialize)]
struct FavoritesSnapshot {
    #[serde(default)]
    favorites: Vec<LineItem>,
}

impl TryFrom<FavoritesSnapshot> for FavoritesState {
    type Error = StateError;

    fn try_from(snapshot: FavoritesSnapshot) -> Result<Self, Self::Error> {
        let mut seen = Vec::with_capacity(snapshot.favorites.len());
        for item in &snapshot.favorites {
            if seen.contains(&item.id) {
                return Err(StateError::DuplicateId(item.id));
            }
            seen.push(item.id);
        }
        Ok(Self {
            favorites: snapshot.favorites,
        })
    }
}

impl FavoritesState {
    /// Items in the order they were liked.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.favorites
    }

    /// True if `id` is a favorite.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.favorites.iter().any(|item| item.id == id)
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    /// True if nothing is liked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Apply an action. Non-favorites actions return an identical copy.
    #[must_use]
    pub fn reduce(&self, action: &Action) -> Self {
        match action {
            Action::AddToFavorites(item) if !self.contains(item.id) => {
                let mut favorites = self.favorites.clone();
                favorites.push(item.clone());
                Self { favorites }
            }
            Action::RemoveFromFavorites(id) => Self {
                favorites: self
                    .favorites
                    .iter()
                    .filter(|item| item.id != *id)
                    .cloned()
                    .collect(),
            },
            Action::ClearFavorites => Self::default(),
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::Price;

    fn item(id: i64) -> LineItem {
        LineItem::new(
            ProductId::new(id),
            format!("liked {id}"),
            Price::new(Decimal::from(id)).unwrap(),
        )
    }

    #[test]
    fn test_add_is_idempotent() {
        let add = Action::AddToFavorites(item(5));
        let once = FavoritesState::default().reduce(&add);
        let twice = once.reduce(&add);
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
        assert!(twice.contains(ProductId::new(5)));
    }

    #[test]
    fn test_readd_keeps_original_snapshot() {
        let mut renamed = item(5);
        renamed.name = "renamed".to_string();
        let state = FavoritesState::default()
            .reduce(&Action::AddToFavorites(item(5)))
            .reduce(&Action::AddToFavorites(renamed));
        assert_eq!(state.items().first().unwrap().name, "liked 5");
    }

    #[test]
    fn test_remove() {
        let state = FavoritesState::default()
            .reduce(&Action::AddToFavorites(item(1)))
            .reduce(&Action::AddToFavorites(item(2)))
            .reduce(&Action::RemoveFromFavorites(ProductId::new(1)));
        assert!(!state.contains(ProductId::new(1)));
        assert!(state.contains(ProductId::new(2)));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let state = FavoritesState::default().reduce(&Action::AddToFavorites(item(1)));
        assert_eq!(
            state.reduce(&Action::RemoveFromFavorites(ProductId::new(42))),
            state
        );
    }

    #[test]
    fn test_clear() {
        let state = FavoritesState::default()
            .reduce(&Action::AddToFavorites(item(1)))
            .reduce(&Action::AddToFavorites(item(2)))
            .reduce(&Action::ClearFavorites);
        assert!(state.is_empty());
    }

    #[test]
    fn test_ignores_cart_actions() {
        let state = FavoritesState::default().reduce(&Action::AddToFavorites(item(1)));
        assert_eq!(state.reduce(&Action::ClearCart), state);
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"{"favorites": [
            {"id": 5, "name": "a", "price": "1"},
            {"id": 5, "name": "b", "price": "2"}
        ]}"#;
        assert!(serde_json::from_str::<FavoritesState>(json).is_err());
    }

    #[test]
    fn test_deserialize_missing_field_is_empty() {
        let state: FavoritesState = serde_json::from_str("{}").unwrap();
        assert!(state.is_empty());
    }
}
