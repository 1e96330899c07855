//! Cart slice.
//!
//! Invariants, held by every reachable value:
//! - no two lines share a product id
//! - every line has a quantity of at least one

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::StateError;
use super::action::{Action, CartLineInput};
use super::item::LineItem;
use crate::ProductId;

/// A line item with the quantity the shopper intends to buy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: LineItem,
    pub quantity: NonZeroU32,
}

impl CartLine {
    /// The product id of this line.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.item.id
    }
}

/// The shopper's cart.
///
/// Lines keep insertion order for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CartSnapshot")]
pub struct CartState {
    items: Vec<CartLine>,
}

#[derive(Deserialize)]
struct CartSnapshot {
    #[serde(default)]
    items: Vec<CartLine>,
}

impl TryFrom<CartSnapshot> for CartState {
    type Error = StateError;

    fn try_from(snapshot: CartSnapshot) -> Result<Self, Self::Error> {
        Self::from_lines(snapshot.items)
    }
}

impl CartState {
    /// Build a cart from existing lines.
    ///
    /// # Errors
    ///
    /// Returns `StateError::DuplicateId` if two lines share a product id.
    pub fn from_lines(items: Vec<CartLine>) -> Result<Self, StateError> {
        for (i, line) in items.iter().enumerate() {
            if items.iter().skip(i + 1).any(|other| other.id() == line.id()) {
                return Err(StateError::DuplicateId(line.id()));
            }
        }
        Ok(Self { items })
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.items.iter().find(|line| line.id() == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply an action. Non-cart actions return an identical copy.
    #[must_use]
    pub fn reduce(&self, action: &Action) -> Self {
        match action {
            Action::AddToCart(input) => self.add(input),
            Action::RemoveFromCart(id) => self.remove(*id),
            Action::SetQuantity(update) => self.set_quantity(update.id, update.quantity),
            Action::ClearCart => Self::default(),
            _ => self.clone(),
        }
    }

    fn add(&self, input: &CartLineInput) -> Self {
        let quantity = input.quantity_or_default();
        let mut items = self.items.clone();
        match items.iter_mut().find(|line| line.id() == input.item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity.get()),
            None => items.push(CartLine {
                item: input.item.clone(),
                quantity,
            }),
        }
        Self { items }
    }

    fn remove(&self, id: ProductId) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|line| line.id() != id)
                .cloned()
                .collect(),
        }
    }

    fn set_quantity(&self, id: ProductId, quantity: i64) -> Self {
        // Anything at or below zero drops the line; anything past u32 saturates.
        let Some(quantity) = u32::try_from(quantity.max(0))
            .map_or(Some(NonZeroU32::MAX), NonZeroU32::new)
        else {
            return self.remove(id);
        };

        Self {
            items: self
                .items
                .iter()
                .map(|line| {
                    if line.id() == id {
                        CartLine {
                            item: line.item.clone(),
                            quantity,
                        }
                    } else {
                        line.clone()
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::Price;

    fn item(id: i64, price: i64) -> LineItem {
        LineItem::new(
            ProductId::new(id),
            format!("product {id}"),
            Price::new(Decimal::from(price)).unwrap(),
        )
    }

    fn qty(n: u32) -> Option<NonZeroU32> {
        NonZeroU32::new(n)
    }

    #[test]
    fn test_add_twice_increments_quantity() {
        let add = Action::add_to_cart(item(1, 100), qty(1));
        let cart = CartState::default().reduce(&add).reduce(&add);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity.get(), 2);
    }

    #[test]
    fn test_add_uses_incoming_quantity() {
        let cart = CartState::default()
            .reduce(&Action::add_to_cart(item(1, 10), qty(3)))
            .reduce(&Action::add_to_cart(item(1, 10), qty(4)));
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity.get(), 7);
    }

    #[test]
    fn test_add_keeps_first_snapshot_of_item() {
        let cart = CartState::default()
            .reduce(&Action::add_to_cart(item(1, 10), None))
            .reduce(&Action::add_to_cart(item(1, 99), None));
        let line = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(line.item.price.amount(), Decimal::from(10));
    }

    #[test]
    fn test_add_saturates() {
        let cart = CartState::default()
            .reduce(&Action::add_to_cart(item(1, 1), Some(NonZeroU32::MAX)))
            .reduce(&Action::add_to_cart(item(1, 1), qty(5)));
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, NonZeroU32::MAX);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let cart = CartState::default()
            .reduce(&Action::add_to_cart(item(3, 1), None))
            .reduce(&Action::add_to_cart(item(1, 1), None))
            .reduce(&Action::add_to_cart(item(2, 1), None));
        let ids: Vec<i64> = cart.items().iter().map(|l| l.id().as_i64()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let cart = CartState::default()
            .reduce(&Action::add_to_cart(item(2, 50), qty(1)))
            .reduce(&Action::set_quantity(ProductId::new(2), 0));
        assert!(cart.get(ProductId::new(2)).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_negative_removes() {
        let cart = CartState::default()
            .reduce(&Action::add_to_cart(item(2, 50), qty(4)))
            .reduce(&Action::set_quantity(ProductId::new(2), -7));
        assert!(cart.get(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_set_quantity_is_absolute() {
        let cart = CartState::default()
            .reduce(&Action::add_to_cart(item(2, 50), qty(4)))
            .reduce(&Action::set_quantity(ProductId::new(2), 9));
        assert_eq!(cart.get(ProductId::new(2)).unwrap().quantity.get(), 9);
    }

    #[test]
    fn test_set_quantity_saturates_large_values() {
        let cart = CartState::default()
            .reduce(&Action::add_to_cart(item(2, 50), None))
            .reduce(&Action::set_quantity(ProductId::new(2), i64::MAX));
        assert_eq!(cart.get(ProductId::new(2)).unwrap().quantity, NonZeroU32::MAX);
    }

    #[test]
    fn test_set_quantity_missing_is_noop() {
        let cart = CartState::default().reduce(&Action::add_to_cart(item(1, 5), None));
        let next = cart.reduce(&Action::set_quantity(ProductId::new(99), 3));
        assert_eq!(next, cart);
    }

    #[test]
    fn test_remove_missing_on_empty_is_noop() {
        let cart = CartState::default();
        let next = cart.reduce(&Action::RemoveFromCart(ProductId::new(99)));
        assert_eq!(next, cart);
    }

    #[test]
    fn test_clear_empties() {
        let cart = CartState::default()
            .reduce(&Action::add_to_cart(item(1, 5), None))
            .reduce(&Action::add_to_cart(item(2, 5), None))
            .reduce(&Action::ClearCart);
        assert_eq!(cart.len(), 0);
    }

    #[test]
    fn test_previous_value_untouched() {
        let before = CartState::default().reduce(&Action::add_to_cart(item(1, 5), None));
        let snapshot = before.clone();
        let _after = before.reduce(&Action::ClearCart);
        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_ignores_other_slices() {
        let cart = CartState::default().reduce(&Action::add_to_cart(item(1, 5), None));
        assert_eq!(cart.reduce(&Action::ClearFavorites), cart);
        assert_eq!(cart.reduce(&Action::Logout), cart);
    }

    #[test]
    fn test_uniqueness_over_mixed_sequence() {
        let actions = [
            Action::add_to_cart(item(1, 5), None),
            Action::add_to_cart(item(2, 5), qty(2)),
            Action::add_to_cart(item(1, 5), qty(3)),
            Action::set_quantity(ProductId::new(2), 0),
            Action::add_to_cart(item(2, 5), None),
            Action::RemoveFromCart(ProductId::new(3)),
            Action::add_to_cart(item(1, 5), None),
        ];
        let cart = actions
            .iter()
            .fold(CartState::default(), |state, action| state.reduce(action));

        let mut ids: Vec<i64> = cart.items().iter().map(|l| l.id().as_i64()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), cart.len());
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity.get(), 5);
        assert_eq!(cart.get(ProductId::new(2)).unwrap().quantity.get(), 1);
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"{"items": [
            {"id": 1, "name": "a", "price": "1", "quantity": 1},
            {"id": 1, "name": "a", "price": "1", "quantity": 2}
        ]}"#;
        assert!(serde_json::from_str::<CartState>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_zero_quantity() {
        let json = r#"{"items": [{"id": 1, "name": "a", "price": "1", "quantity": 0}]}"#;
        assert!(serde_json::from_str::<CartState>(json).is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let cart = CartState::default().reduce(&Action::add_to_cart(
            item(1, 100).with_image("https://cdn.example/1.jpg"),
            qty(2),
        ));
        let value = serde_json::to_value(&cart).unwrap();
        let line = &value["items"][0];
        assert_eq!(line["id"], 1);
        assert_eq!(line["name"], "product 1");
        assert_eq!(line["quantity"], 2);
        assert_eq!(line["image"], "https://cdn.example/1.jpg");
    }
}
