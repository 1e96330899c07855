//! Client-side refinement of a fetched listing page.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{Product, ProductPage};

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// As returned by the catalog.
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    /// Highest id first.
    Newest,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Newest => "newest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "price-low" | "low" => Ok(Self::PriceLow),
            "price-high" | "high" => Ok(Self::PriceHigh),
            "newest" | "new" => Ok(Self::Newest),
            other => Err(format!(
                "unknown sort '{other}' (expected relevance, price-low, price-high or newest)"
            )),
        }
    }
}

/// Price bounds and ordering applied to a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Refinement {
    /// Inclusive lower bound on list price.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on list price.
    pub max_price: Option<Decimal>,
    pub sort: SortOrder,
}

impl Refinement {
    /// True if `product` lies within the price bounds.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let price = product.price.amount();
        self.min_price.is_none_or(|min| price >= min) && self.max_price.is_none_or(|max| price <= max)
    }

    /// Filter then sort. Ties keep catalog order.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let mut products: Vec<Product> = products.into_iter().filter(|p| self.matches(p)).collect();
        match self.sort {
            SortOrder::Relevance => {}
            SortOrder::PriceLow => products.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Newest => products.sort_by(|a, b| b.id.cmp(&a.id)),
        }
        products
    }
}

/// A refined page ready for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub products: Vec<Product>,
    /// Total matching products reported by the catalog, before refinement.
    pub total: u64,
    /// Whether the next page is worth requesting.
    pub has_more: bool,
}

impl Listing {
    /// Refine `page`. `has_more` looks at the unrefined page, so a filter
    /// that hides everything on a full page still offers the next one.
    #[must_use]
    pub fn from_page(page: ProductPage, page_size: u32, refinement: &Refinement) -> Self {
        let has_more = page.has_more(page_size);
        Self {
            total: page.total,
            products: refinement.apply(page.products),
            has_more,
        }
    }
}
