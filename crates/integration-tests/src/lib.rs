//! Integration tests for Breadbox.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p breadbox-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - cart-to-order flows and charge math
//! - `order_lifecycle` - status transitions and view consistency
//! - `admin_dashboard` - aggregation and the user directory
//! - `storage_layout` - persisted key layout and corruption handling
//!
//! Tests run against an in-memory store by default; `storage_layout` also
//! exercises the durable redb backend.

use breadbox_core::{Email, UserId};
use breadbox_ledger::{
    LoginEvent, MemoryStore, NewProduct, Product, ShippingAddress, Storefront,
};
use rust_decimal::Decimal;

/// A fresh storefront over an in-memory store.
#[must_use]
pub fn fresh_storefront() -> Storefront {
    Storefront::open(Box::new(MemoryStore::new()))
}

/// Create a product with the given price (in cents) and stock.
#[must_use]
pub fn stocked_product(shop: &Storefront, title: &str, price_cents: i64, stock: u32) -> Product {
    let mut new = NewProduct::new(title, Decimal::new(price_cents, 2));
    new.stock = stock;
    new.category = Some("bakery".to_owned());
    shop.inventory()
        .create_product(new)
        .expect("create product")
}

/// Register a user with the directory as the identity provider would.
#[must_use]
pub fn login_user(shop: &Storefront, uid: &str) -> UserId {
    let user_id = UserId::new(uid);
    shop.users()
        .record_login(LoginEvent {
            user_id: user_id.clone(),
            email: Email::parse(&format!("{uid}@example.com")).expect("valid email"),
            display_name: None,
        })
        .expect("record login");
    user_id
}

/// A filled-in shipping address for checkouts.
#[must_use]
pub fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Sam Shopper".to_owned(),
        email: "sam@example.com".to_owned(),
        address: "1 Bakery Lane".to_owned(),
        city: "Breadville".to_owned(),
        state: "OR".to_owned(),
        zip_code: "97201".to_owned(),
        country: "USA".to_owned(),
    }
}
