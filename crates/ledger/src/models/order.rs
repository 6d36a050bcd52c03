//! Order records and the global order index.

use breadbox_core::{OrderNumber, OrderStatus, PaymentMethod, Price, ProductId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use super::cart::CartItem;
use super::product::placeholder_image;

/// A placed order.
///
/// The item list and charge breakdown are immutable after placement; only
/// `status` mutates, through the order ledger's state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Globally unique order number (`ORD-...`).
    pub order_number: OrderNumber,
    /// The user who placed the order.
    pub user_id: UserId,
    /// Purchased line items, snapshotted at checkout.
    pub items: Vec<OrderItem>,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Tax charged on the subtotal.
    pub tax: Decimal,
    /// Shipping charge (zero above the free-shipping threshold).
    pub shipping: Decimal,
    /// Grand total.
    pub total: Decimal,
    /// Fulfillment status.
    #[serde(default)]
    pub status: OrderStatus,
    /// Payment method selected at checkout.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Destination address captured at checkout.
    #[serde(default)]
    pub shipping_address: ShippingAddress,
    /// When the order was placed.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// One purchased line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product purchased (weak reference).
    pub product_id: ProductId,
    /// Product title at checkout.
    pub name: String,
    /// Unit price at checkout.
    pub price: Price,
    /// Units purchased.
    pub quantity: u32,
    /// Product image at checkout.
    #[serde(default = "placeholder_image")]
    pub image: Url,
}

impl OrderItem {
    /// The line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.extended(self.quantity)
    }
}

impl From<CartItem> for OrderItem {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
            image: item.image,
        }
    }
}

/// Shipping destination captured from the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Recipient name.
    #[serde(default)]
    pub full_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// State or region.
    #[serde(default)]
    pub state: String,
    /// Postal code.
    #[serde(default)]
    pub zip_code: String,
    /// Country.
    #[serde(default)]
    pub country: String,
}

/// Global order index entry.
///
/// The per-user order collections are the source of truth; the index holds
/// pointers only, so the per-user and admin views cannot diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPointer {
    /// The order's number.
    pub order_number: OrderNumber,
    /// Owner of the order.
    pub user_id: UserId,
    /// Placement time, for index-side sorting.
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderPointer {
    fn from(order: &Order) -> Self {
        Self {
            order_number: order.order_number.clone(),
            user_id: order.user_id.clone(),
            created_at: order.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_decodes_with_defaults() {
        let raw = r#"{
            "orderNumber": "ORD-1700000000000-abc123def",
            "userId": "u-1",
            "items": [],
            "subtotal": "40.00",
            "tax": "4.00",
            "shipping": "5.99",
            "total": "49.99"
        }"#;
        let order: Order = serde_json::from_str(raw).expect("decode");
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.payment_method, PaymentMethod::CreditCard);
        assert_eq!(order.shipping_address, ShippingAddress::default());
    }

    #[test]
    fn test_pointer_mirrors_order_identity() {
        let raw = r#"{
            "orderNumber": "ORD-1700000000000-abc123def",
            "userId": "u-1",
            "items": [],
            "subtotal": "0",
            "tax": "0",
            "shipping": "0",
            "total": "0",
            "createdAt": "2024-03-01T10:00:00Z"
        }"#;
        let order: Order = serde_json::from_str(raw).expect("decode");
        let pointer = OrderPointer::from(&order);
        assert_eq!(pointer.order_number, order.order_number);
        assert_eq!(pointer.user_id, order.user_id);
        assert_eq!(pointer.created_at, order.created_at);
    }
}
