//! Catalog records as served by a DummyJSON-compatible API.

use bozor_core::{LineItem, Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// List price before discount.
    pub price: Price,
    /// Percentage off the list price.
    #[serde(default)]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Price after the discount, rounded to cents.
    #[must_use]
    pub fn discounted_price(&self) -> Price {
        self.price.discounted(self.discount_percentage)
    }

    /// Main image: the first gallery image, else the thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .iter()
            .chain(self.thumbnail.iter())
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
    }

    /// Snapshot this product for the cart or favorites.
    ///
    /// Records the discounted price, which is what the shopper sees.
    #[must_use]
    pub fn to_line_item(&self) -> LineItem {
        let item = LineItem::new(self.id, self.title.clone(), self.discounted_price());
        match self.primary_image() {
            Some(image) => item.with_image(image),
            None => item,
        }
    }
}

/// One page of a product listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

impl ProductPage {
    /// True if another page may follow: the page came back full.
    #[must_use]
    pub fn has_more(&self, page_size: u32) -> bool {
        page_size > 0 && self.products.len() >= page_size as usize
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}
