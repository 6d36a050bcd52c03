//! Cart line-item records.

use breadbox_core::{Price, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::product::{Product, placeholder_image};

/// One line in a user's cart: a quantity-bearing snapshot of a product at
/// add-time. Unique per `(user, product)`.
///
/// The added-at instant persists under the legacy field name `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product this line refers to (weak reference; the product may since
    /// have been deleted from the catalog).
    pub product_id: ProductId,
    /// Product title at add-time.
    pub name: String,
    /// Unit price at add-time.
    pub price: Price,
    /// Units of the product in the cart. At least 1; a drop to 0 removes
    /// the line instead.
    pub quantity: u32,
    /// Product image at add-time.
    #[serde(default = "placeholder_image")]
    pub image: Url,
    /// When the line was first added.
    #[serde(rename = "timestamp", default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Snapshot `product` as a fresh single-unit cart line.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.title.clone(),
            price: product.price,
            quantity: 1,
            image: product.image.clone(),
            added_at: Utc::now(),
        }
    }

    /// The line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> rust_decimal::Decimal {
        self.price.extended(self.quantity)
    }
}
