//! Typed command set.
//!
//! Actions serialize in the same shape the browser store used:
//! `{"type": "cart/addToCart", "payload": {...}}`.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::auth::{AuthToken, UserRecord};
use super::item::LineItem;
use crate::ProductId;

/// The state slice an action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slice {
    Auth,
    Cart,
    Favorites,
}

impl Slice {
    /// Every slice, in persistence order.
    pub const ALL: [Self; 3] = [Self::Auth, Self::Cart, Self::Favorites];

    /// Stable lowercase name, used as the storage sub-key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Cart => "cart",
            Self::Favorites => "favorites",
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Slice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auth" => Ok(Self::Auth),
            "cart" => Ok(Self::Cart),
            "favorites" => Ok(Self::Favorites),
            other => Err(format!("invalid state slice: {other}")),
        }
    }
}

/// Payload of [`Action::AddToCart`].
///
/// A missing quantity means one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineInput {
    #[serde(flatten)]
    pub item: LineItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<NonZeroU32>,
}

impl CartLineInput {
    /// Add a single unit of `item`.
    #[must_use]
    pub const fn one(item: LineItem) -> Self {
        Self {
            item,
            quantity: None,
        }
    }

    /// Quantity to add, defaulting to one.
    #[must_use]
    pub fn quantity_or_default(&self) -> NonZeroU32 {
        self.quantity.unwrap_or(NonZeroU32::MIN)
    }
}

/// Payload of [`Action::SetQuantity`].
///
/// The quantity is signed: zero or below removes the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityUpdate {
    pub id: ProductId,
    pub quantity: i64,
}

/// Payload of [`Action::Login`] and [`Action::Register`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: UserRecord,
    pub token: AuthToken,
}

/// A command against the storefront state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    #[serde(rename = "cart/addToCart")]
    AddToCart(CartLineInput),
    #[serde(rename = "cart/removeFromCart")]
    RemoveFromCart(ProductId),
    #[serde(rename = "cart/setQuantity")]
    SetQuantity(QuantityUpdate),
    #[serde(rename = "cart/clearCart")]
    ClearCart,
    #[serde(rename = "favorites/addToFavorites")]
    AddToFavorites(LineItem),
    #[serde(rename = "favorites/removeFromFavorites")]
    RemoveFromFavorites(ProductId),
    #[serde(rename = "favorites/clearFavorites")]
    ClearFavorites,
    #[serde(rename = "auth/login")]
    Login(AuthSession),
    #[serde(rename = "auth/register")]
    Register(AuthSession),
    #[serde(rename = "auth/logout")]
    Logout,
}

impl Action {
    /// The slice this action reduces.
    #[must_use]
    pub const fn slice(&self) -> Slice {
        match self {
            Self::AddToCart(_) | Self::RemoveFromCart(_) | Self::SetQuantity(_) | Self::ClearCart => {
                Slice::Cart
            }
            Self::AddToFavorites(_) | Self::RemoveFromFavorites(_) | Self::ClearFavorites => {
                Slice::Favorites
            }
            Self::Login(_) | Self::Register(_) | Self::Logout => Slice::Auth,
        }
    }

    /// The action type string, e.g. `cart/addToCart`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AddToCart(_) => "cart/addToCart",
            Self::RemoveFromCart(_) => "cart/removeFromCart",
            Self::SetQuantity(_) => "cart/setQuantity",
            Self::ClearCart => "cart/clearCart",
            Self::AddToFavorites(_) => "favorites/addToFavorites",
            Self::RemoveFromFavorites(_) => "favorites/removeFromFavorites",
            Self::ClearFavorites => "favorites/clearFavorites",
            Self::Login(_) => "auth/login",
            Self::Register(_) => "auth/register",
            Self::Logout => "auth/logout",
        }
    }

    /// Add `quantity` units of `item` to the cart.
    #[must_use]
    pub const fn add_to_cart(item: LineItem, quantity: Option<NonZeroU32>) -> Self {
        Self::AddToCart(CartLineInput { item, quantity })
    }

    /// Set the quantity of a cart line.
    #[must_use]
    pub const fn set_quantity(id: ProductId, quantity: i64) -> Self {
        Self::SetQuantity(QuantityUpdate { id, quantity })
    }
}
