//! Wishlist records.

use breadbox_core::{Price, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::product::{Product, placeholder_image};

/// A wishlisted product snapshot. Unique per `(user, product)`; carries no
/// quantity. The added-at instant persists under the legacy `timestamp`
/// field, matching [`super::CartItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    /// Product this entry refers to (weak reference).
    pub product_id: ProductId,
    /// Product title at add-time.
    pub name: String,
    /// Unit price at add-time.
    pub price: Price,
    /// Product image at add-time.
    #[serde(default = "placeholder_image")]
    pub image: Url,
    /// When the entry was added.
    #[serde(rename = "timestamp", default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl WishlistItem {
    /// Snapshot `product` as a wishlist entry.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            added_at: Utc::now(),
        }
    }
}
