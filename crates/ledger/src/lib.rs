//! Breadbox Ledger - embedded storefront storage core.
//!
//! A single-process ledger for product inventory, per-user shopping carts,
//! wishlists, a user directory, and orders, persisted as JSON collections in
//! a pluggable string-keyed [`store::KeyValueStore`].
//!
//! # Architecture
//!
//! - [`store`] - the key-value abstraction, backends, and persisted key layout
//! - [`models`] - record types as they live in storage
//! - [`ledgers`] - one ledger per entity type, each owning its collection
//! - [`dashboard`] - read-only summary statistics over ledger snapshots
//! - [`state`] - the [`Storefront`] handle bundling everything together
//!
//! Authentication, rendering, and catalog fetching live outside this crate:
//! the identity provider hands the ledger stable user ids (see
//! [`ledgers::UserDirectory::record_login`]), and external product feeds are
//! ingested as plain snapshots via
//! [`ledgers::InventoryLedger::merge_catalog`].
//!
//! # Example
//!
//! ```
//! use breadbox_ledger::{MemoryStore, NewProduct, Storefront};
//! use breadbox_core::UserId;
//! use rust_decimal::Decimal;
//!
//! let shop = Storefront::open(Box::new(MemoryStore::new()));
//! let product = shop
//!     .inventory()
//!     .create_product(NewProduct::new("Sourdough Loaf", Decimal::new(899, 2)))
//!     .expect("create product");
//! shop.inventory()
//!     .adjust_stock(&product.id, 10)
//!     .expect("stock product");
//!
//! let user = UserId::new("u-1");
//! shop.cart().add_item(&user, &product).expect("add to cart");
//! assert_eq!(shop.cart().get_cart(&user).expect("read cart").len(), 1);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod codec;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod ledgers;
pub mod models;
pub mod state;
pub mod store;

pub use dashboard::{DashboardAggregator, DashboardStats};
pub use error::{LedgerError, Result};
pub use events::{ChangeEvent, SubscriptionId};
pub use ledgers::{CartLedger, InventoryLedger, OrderLedger, UserDirectory, WishlistLedger};
pub use models::{
    CartItem, LoginEvent, NewProduct, Order, OrderItem, OrderPointer, Product, ProductPatch,
    ShippingAddress, UserProfile, WishlistItem,
};
pub use state::Storefront;
pub use store::{KeyValueStore, MemoryStore, RedbStore, StorageError};
