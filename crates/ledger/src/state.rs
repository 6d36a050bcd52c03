//! The storefront handle shared by embedders.

use std::sync::Arc;

use breadbox_core::{PaymentMethod, UserId};
use tracing::instrument;

use crate::dashboard::DashboardAggregator;
use crate::error::{LedgerError, Result};
use crate::events::{ChangeEvent, SubscriptionId};
use crate::ledgers::{CartLedger, InventoryLedger, OrderLedger, UserDirectory, WishlistLedger};
use crate::models::{Order, OrderItem, ShippingAddress};
use crate::store::{KeyValueStore, StoreContext};

/// The assembled storefront ledger.
///
/// Bundles every ledger over one shared store context. Cheaply cloneable via
/// `Arc`; clones observe the same store and the same subscribers.
///
/// Admin-gated operations (stock adjustment, status transitions, the global
/// order view, account toggles) are ordinary methods on the ledgers;
/// authorization is the embedder's policy, not the ledger's.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    ctx: Arc<StoreContext>,
    inventory: InventoryLedger,
    cart: CartLedger,
    wishlist: WishlistLedger,
    orders: OrderLedger,
    users: UserDirectory,
    dashboard: DashboardAggregator,
}

impl Storefront {
    /// Assemble a storefront over the given store backend.
    #[must_use]
    pub fn open(kv: Box<dyn KeyValueStore>) -> Self {
        let ctx = StoreContext::new(kv);
        let inventory = InventoryLedger::new(Arc::clone(&ctx));
        let cart = CartLedger::new(Arc::clone(&ctx), inventory.clone());
        let wishlist = WishlistLedger::new(Arc::clone(&ctx));
        let orders = OrderLedger::new(Arc::clone(&ctx));
        let users = UserDirectory::new(Arc::clone(&ctx));
        let dashboard =
            DashboardAggregator::new(inventory.clone(), orders.clone(), users.clone());

        Self {
            inner: Arc::new(StorefrontInner {
                ctx,
                inventory,
                cart,
                wishlist,
                orders,
                users,
                dashboard,
            }),
        }
    }

    /// The product inventory ledger.
    #[must_use]
    pub fn inventory(&self) -> &InventoryLedger {
        &self.inner.inventory
    }

    /// The shopping cart ledger.
    #[must_use]
    pub fn cart(&self) -> &CartLedger {
        &self.inner.cart
    }

    /// The wishlist ledger.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistLedger {
        &self.inner.wishlist
    }

    /// The order ledger.
    #[must_use]
    pub fn orders(&self) -> &OrderLedger {
        &self.inner.orders
    }

    /// The user directory.
    #[must_use]
    pub fn users(&self) -> &UserDirectory {
        &self.inner.users
    }

    /// The dashboard aggregator.
    #[must_use]
    pub fn dashboard(&self) -> &DashboardAggregator {
        &self.inner.dashboard
    }

    /// Check out the user's cart: place an order for its contents, then
    /// empty the cart.
    ///
    /// Product stock is deliberately not decremented here; the storefront
    /// this ledger replaces never did, and changing that silently would
    /// surprise its data. Returns the placed order.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` when the cart is empty, plus
    /// anything [`OrderLedger::place_order`] can return.
    #[instrument(skip(self, shipping_address), fields(user_id = %user_id))]
    pub fn checkout(
        &self,
        user_id: &UserId,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<Order> {
        let items: Vec<OrderItem> = self
            .cart()
            .get_cart(user_id)?
            .into_iter()
            .map(OrderItem::from)
            .collect();
        if items.is_empty() {
            return Err(LedgerError::Validation("cart is empty".to_owned()));
        }

        let order = self
            .orders()
            .place_order(user_id, items, shipping_address, payment_method)?;
        self.cart().clear(user_id)?;
        Ok(order)
    }

    /// Register a change-event subscriber.
    ///
    /// The callback runs synchronously on the mutating thread; keep it
    /// light.
    pub fn subscribe(
        &self,
        callback: impl Fn(&ChangeEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.inner.ctx.events().subscribe(callback)
    }

    /// Remove a change-event subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.ctx.events().unsubscribe(id);
    }
}
