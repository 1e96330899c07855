//! Line item snapshot recorded by the cart and favorites.

use serde::{Deserialize, Serialize};

use crate::{Price, ProductId};

/// A product reference plus its unit price, as captured at the moment the
/// shopper added it.
///
/// The store does not look the product up again; `name` and `image` are
/// opaque display values. Catalog records call the name `title`, which is
/// accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LineItem {
    /// Create a line item without an image.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
        }
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
