//! Product catalog records.

use breadbox_core::{Price, ProductId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

/// Image shown for products stored without one.
const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400?text=No+Image";

/// The placeholder image URL used when a product has no image of its own.
#[must_use]
pub fn placeholder_image() -> Url {
    Url::parse(PLACEHOLDER_IMAGE).expect("placeholder image URL is valid")
}

/// A catalog product, owned exclusively by the inventory ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product id.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Free-form category label.
    #[serde(default)]
    pub category: String,
    /// Product image.
    #[serde(default = "placeholder_image")]
    pub image: Url,
    /// Units on hand. Never negative.
    #[serde(default)]
    pub stock: u32,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// When the product was added to the catalog.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Availability derived from the on-hand quantity.
    #[must_use]
    pub const fn stock_status(&self) -> breadbox_core::StockStatus {
        breadbox_core::StockStatus::for_quantity(self.stock)
    }
}

/// Input for creating a product.
///
/// Only title and price are required; everything else takes the catalog
/// defaults (stock 0, placeholder image).
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Display title. Must be non-empty.
    pub title: String,
    /// Unit price. Must be non-negative.
    pub price: Decimal,
    /// Category label.
    pub category: Option<String>,
    /// Product image; placeholder when absent.
    pub image: Option<Url>,
    /// Initial stock level.
    pub stock: u32,
    /// Long-form description.
    pub description: Option<String>,
}

impl NewProduct {
    /// A new-product input with only the required fields set.
    #[must_use]
    pub fn new(title: impl Into<String>, price: Decimal) -> Self {
        Self {
            title: title.into(),
            price,
            category: None,
            image: None,
            stock: 0,
            description: None,
        }
    }
}

/// Partial update for an existing product. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement unit price.
    pub price: Option<Decimal>,
    /// Replacement category label.
    pub category: Option<String>,
    /// Replacement image.
    pub image: Option<Url>,
    /// Replacement stock level.
    pub stock: Option<u32>,
    /// Replacement description.
    pub description: Option<String>,
}
