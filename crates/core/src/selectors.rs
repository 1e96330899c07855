//! Derived values read by views.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::state::{CartLine, CartState, FavoritesState};
use crate::ProductId;

/// Aggregate figures for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CartTotals {
    /// Distinct lines.
    pub line_count: usize,
    /// Sum of all quantities.
    pub item_count: u64,
    /// Sum of `price * quantity` over all lines, saturating at
    /// [`Decimal::MAX`].
    pub subtotal: Decimal,
}

/// Price of one line: unit price times quantity, saturating at
/// [`Decimal::MAX`].
#[must_use]
pub fn line_total(line: &CartLine) -> Decimal {
    line.item.price.times(line.quantity.get())
}

/// Totals over the whole cart.
#[must_use]
pub fn cart_totals(cart: &CartState) -> CartTotals {
    cart.items().iter().fold(
        CartTotals {
            line_count: cart.len(),
            ..CartTotals::default()
        },
        |mut totals, line| {
            totals.item_count = totals.item_count.saturating_add(u64::from(line.quantity.get()));
            totals.subtotal = totals.subtotal.saturating_add(line_total(line));
            totals
        },
    )
}

/// True if `id` is among the favorites.
#[must_use]
pub fn is_favorite(favorites: &FavoritesState, id: ProductId) -> bool {
    favorites.contains(id)
}

/// Number of favorites.
#[must_use]
pub fn favorites_count(favorites: &FavoritesState) -> usize {
    favorites.len()
}

/// Monthly payment for an interest-free installment plan, rounded to whole
/// currency units (halves round up).
///
/// Zero months is treated as a single payment.
///
/// ```
/// use bozor_core::selectors::monthly_installment;
/// use rust_decimal::Decimal;
///
/// assert_eq!(monthly_installment(Decimal::from(1_000), 12), Decimal::from(83));
/// ```
#[must_use]
pub fn monthly_installment(amount: Decimal, months: u32) -> Decimal {
    let months = Decimal::from(months.max(1));
    (amount / months).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
