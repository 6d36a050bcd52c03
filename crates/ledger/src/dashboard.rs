//! Read-only dashboard statistics.
//!
//! [`summarize`] is a pure function over point-in-time snapshots, so it can
//! be tested without a store; [`DashboardAggregator`] snapshots the live
//! ledgers and delegates to it.

use breadbox_core::{OrderStatus, StockStatus};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;
use crate::ledgers::{InventoryLedger, OrderLedger, UserDirectory};
use crate::models::{Order, Product, UserProfile};

/// Summary counters shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Orders across all users.
    pub total_orders: usize,
    /// Products in the catalog.
    pub total_products: usize,
    /// Profiles in the user directory.
    pub total_users: usize,
    /// Sum of every order's grand total.
    pub total_revenue: Decimal,
    /// Orders still in `processing`.
    pub pending_orders: usize,
    /// Products with stock in `1..=5`.
    pub low_stock_products: usize,
    /// Products with zero stock.
    pub out_of_stock_products: usize,
}

/// Compute dashboard counters from snapshots. Empty inputs yield all zeros.
#[must_use]
pub fn summarize(products: &[Product], orders: &[Order], users: &[UserProfile]) -> DashboardStats {
    DashboardStats {
        total_orders: orders.len(),
        total_products: products.len(),
        total_users: users.len(),
        total_revenue: orders.iter().map(|o| o.total).sum(),
        pending_orders: orders
            .iter()
            .filter(|o| o.status == OrderStatus::Processing)
            .count(),
        low_stock_products: products
            .iter()
            .filter(|p| p.stock_status() == StockStatus::LowStock)
            .count(),
        out_of_stock_products: products
            .iter()
            .filter(|p| p.stock_status() == StockStatus::OutOfStock)
            .count(),
    }
}

/// Snapshots the live ledgers and summarizes them.
#[derive(Clone)]
pub struct DashboardAggregator {
    inventory: InventoryLedger,
    orders: OrderLedger,
    users: UserDirectory,
}

impl DashboardAggregator {
    pub(crate) const fn new(
        inventory: InventoryLedger,
        orders: OrderLedger,
        users: UserDirectory,
    ) -> Self {
        Self {
            inventory,
            orders,
            users,
        }
    }

    /// Current dashboard counters.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if any snapshot read fails.
    pub fn snapshot(&self) -> Result<DashboardStats> {
        let products = self.inventory.list_products()?;
        let orders = self.orders.get_all_orders()?;
        let users = self.users.list()?;
        Ok(summarize(&products, &orders, &users))
    }
}

#[cfg(test)]
mod tests {
    use breadbox_core::{
        Email, OrderNumber, PaymentMethod, Price, ProductId, UserId,
    };
    use chrono::Utc;

    use crate::models::{ShippingAddress, placeholder_image};

    use super::*;

    fn product(stock: u32) -> Product {
        Product {
            id: ProductId::new(format!("p-{stock}")),
            title: "Loaf".to_owned(),
            price: Price::new(Decimal::new(500, 2)).expect("valid price"),
            category: String::new(),
            image: placeholder_image(),
            stock,
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    fn order(total_cents: i64, status: OrderStatus) -> Order {
        Order {
            order_number: OrderNumber::new(format!("ORD-{total_cents}-{status}")),
            user_id: UserId::new("u-1"),
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            shipping: Decimal::ZERO,
            total: Decimal::new(total_cents, 2),
            status,
            payment_method: PaymentMethod::CreditCard,
            shipping_address: ShippingAddress::default(),
            created_at: Utc::now(),
        }
    }

    fn user(uid: &str) -> UserProfile {
        UserProfile {
            id: UserId::new(uid),
            email: Email::parse("shopper@example.com").expect("valid email"),
            display_name: "shopper".to_owned(),
            created_at: Utc::now(),
            last_login: Utc::now(),
            login_count: 1,
            is_active: true,
        }
    }

    #[test]
    fn test_empty_inputs_are_all_zeros() {
        let stats = summarize(&[], &[], &[]);
        assert_eq!(stats, DashboardStats::default());
        assert_eq!(stats.total_revenue, Decimal::ZERO);
    }

    #[test]
    fn test_counters() {
        let products = vec![product(0), product(3), product(5), product(12)];
        let orders = vec![
            order(4999, OrderStatus::Processing),
            order(6600, OrderStatus::Delivered),
            order(1099, OrderStatus::Processing),
        ];
        let users = vec![user("u-1"), user("u-2")];

        let stats = summarize(&products, &orders, &users);
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_products, 4);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_revenue, Decimal::new(12_698, 2));
        assert_eq!(stats.pending_orders, 2);
        assert_eq!(stats.low_stock_products, 2);
        assert_eq!(stats.out_of_stock_products, 1);
    }
}
