//! Order ledger: placement, status transitions, and the two order views.
//!
//! Orders live in the owner's `user_orders_{userId}` collection; the global
//! `all_orders` collection holds pointers only. Both views therefore resolve
//! to the same record and cannot disagree about an order's contents or
//! status.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use breadbox_core::{OrderNumber, OrderStatus, PaymentMethod, UserId};
use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::error::{LedgerError, Result};
use crate::events::ChangeEvent;
use crate::models::{Order, OrderItem, OrderPointer, ShippingAddress};
use crate::store::{StoreContext, keys};

/// Tax charged on every order, as a fraction of the subtotal.
fn tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Subtotal above which shipping is free.
fn free_shipping_threshold() -> Decimal {
    Decimal::new(50, 0)
}

/// Flat shipping charge below the free-shipping threshold.
fn flat_shipping() -> Decimal {
    Decimal::new(599, 2)
}

/// Owns orders: creation at checkout, the status state machine, and the
/// per-user and admin views.
#[derive(Clone)]
pub struct OrderLedger {
    ctx: Arc<StoreContext>,
}

impl OrderLedger {
    pub(crate) fn new(ctx: Arc<StoreContext>) -> Self {
        Self { ctx }
    }

    /// Place an order for the given line items.
    ///
    /// Computes the charge breakdown (10% tax; flat 5.99 shipping, free
    /// above 50), assigns a fresh globally unique order number, and persists
    /// the order with status `processing`. The per-user record and the
    /// global index are written under both keys' locks; if the index write
    /// fails the order record is rolled back so the views stay consistent.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` for an empty item list and
    /// `LedgerError::Storage` if persisting fails.
    #[instrument(skip(self, items, shipping_address), fields(user_id = %user_id))]
    pub fn place_order(
        &self,
        user_id: &UserId,
        items: Vec<OrderItem>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<Order> {
        if items.is_empty() {
            return Err(LedgerError::Validation(
                "order must contain at least one item".to_owned(),
            ));
        }

        let subtotal: Decimal = items.iter().map(OrderItem::line_total).sum();
        let tax = subtotal * tax_rate();
        let shipping = if subtotal > free_shipping_threshold() {
            Decimal::ZERO
        } else {
            flat_shipping()
        };

        let order = Order {
            order_number: generate_order_number(),
            user_id: user_id.clone(),
            items,
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
            status: OrderStatus::Processing,
            payment_method,
            shipping_address,
            created_at: Utc::now(),
        };

        let user_key = keys::user_orders(user_id);
        let user_guard = self.ctx.lock(&user_key);
        let index_guard = self.ctx.lock(keys::ALL_ORDERS);

        let mut orders: Vec<Order> = self.ctx.load(&user_key)?;
        orders.insert(0, order.clone());
        self.ctx.save(&user_key, &orders)?;

        let mut index: Vec<OrderPointer> = self.ctx.load(keys::ALL_ORDERS)?;
        index.insert(0, OrderPointer::from(&order));
        if let Err(err) = self.ctx.save(keys::ALL_ORDERS, &index) {
            // Roll the order record back so the two views stay in agreement.
            orders.retain(|o| o.order_number != order.order_number);
            if let Err(rollback_err) = self.ctx.save(&user_key, &orders) {
                error!(
                    order_number = %order.order_number,
                    error = %rollback_err,
                    "order record and index diverged; run reconcile_index"
                );
            }
            return Err(err.into());
        }

        drop(index_guard);
        drop(user_guard);

        info!(
            order_number = %order.order_number,
            total = %order.total,
            "order placed"
        );
        self.ctx.events().emit(&ChangeEvent::OrdersChanged {
            user_id: Some(user_id.clone()),
        });
        Ok(order)
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` for an unknown order number and
    /// `LedgerError::Validation` when the state machine does not permit the
    /// transition (terminal states never transition).
    #[instrument(skip(self), fields(order_number = %order_number))]
    pub fn update_status(
        &self,
        order_number: &OrderNumber,
        new_status: OrderStatus,
    ) -> Result<Order> {
        let Some(owner) = self.owner_of(order_number)? else {
            return Err(LedgerError::NotFound(format!("order {order_number}")));
        };

        let key = keys::user_orders(&owner);
        let _guard = self.ctx.lock(&key);
        let mut orders: Vec<Order> = self.ctx.load(&key)?;
        let Some(order) = orders.iter_mut().find(|o| o.order_number == *order_number) else {
            warn!("order pointer exists but record is missing");
            return Err(LedgerError::NotFound(format!("order {order_number}")));
        };

        if !order.status.can_transition_to(new_status) {
            return Err(LedgerError::Validation(format!(
                "illegal status transition: {} -> {}",
                order.status, new_status
            )));
        }

        order.status = new_status;
        let updated = order.clone();
        self.ctx.save(&key, &orders)?;
        drop(_guard);

        info!(status = %new_status, "order status updated");
        self.ctx.events().emit(&ChangeEvent::OrdersChanged {
            user_id: Some(owner),
        });
        Ok(updated)
    }

    /// Look up a single order by number.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if a read fails.
    pub fn get_order(&self, order_number: &OrderNumber) -> Result<Option<Order>> {
        let Some(owner) = self.owner_of(order_number)? else {
            return Ok(None);
        };
        let orders: Vec<Order> = self.ctx.load(&keys::user_orders(&owner))?;
        Ok(orders.into_iter().find(|o| o.order_number == *order_number))
    }

    /// One user's order history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the read fails.
    pub fn get_orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        let mut orders: Vec<Order> = self.ctx.load(&keys::user_orders(user_id))?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Every order across all users (the admin view), newest first.
    ///
    /// Resolves the global index against the per-user records; pointers with
    /// no backing record are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if a read fails.
    pub fn get_all_orders(&self) -> Result<Vec<Order>> {
        let index: Vec<OrderPointer> = self.ctx.load(keys::ALL_ORDERS)?;

        let mut by_user: HashMap<UserId, Vec<Order>> = HashMap::new();
        let mut result = Vec::with_capacity(index.len());
        for pointer in &index {
            if !by_user.contains_key(&pointer.user_id) {
                let orders: Vec<Order> = self.ctx.load(&keys::user_orders(&pointer.user_id))?;
                by_user.insert(pointer.user_id.clone(), orders);
            }
            let found = by_user
                .get(&pointer.user_id)
                .and_then(|orders| orders.iter().find(|o| o.order_number == pointer.order_number));
            match found {
                Some(order) => result.push(order.clone()),
                None => warn!(
                    order_number = %pointer.order_number,
                    "dangling order pointer; skipping"
                ),
            }
        }

        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    /// Delete an order from both the owner's record and the global index.
    ///
    /// # Returns
    ///
    /// `true` if the order existed, `false` if it was already gone.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if persisting fails.
    #[instrument(skip(self), fields(order_number = %order_number))]
    pub fn delete_order(&self, order_number: &OrderNumber) -> Result<bool> {
        let Some(owner) = self.owner_of(order_number)? else {
            return Ok(false);
        };

        let user_key = keys::user_orders(&owner);
        let user_guard = self.ctx.lock(&user_key);
        let index_guard = self.ctx.lock(keys::ALL_ORDERS);

        let mut orders: Vec<Order> = self.ctx.load(&user_key)?;
        let before = orders.len();
        orders.retain(|o| o.order_number != *order_number);
        let removed = orders.len() != before;
        if removed {
            self.ctx.save(&user_key, &orders)?;
        }

        let mut index: Vec<OrderPointer> = self.ctx.load(keys::ALL_ORDERS)?;
        index.retain(|p| p.order_number != *order_number);
        self.ctx.save(keys::ALL_ORDERS, &index)?;

        drop(index_guard);
        drop(user_guard);

        info!("order deleted");
        self.ctx.events().emit(&ChangeEvent::OrdersChanged {
            user_id: Some(owner),
        });
        Ok(removed)
    }

    /// Rebuild the global index from the per-user order collections.
    ///
    /// Adds pointers for orders missing from the index and prunes pointers
    /// whose order no longer exists. Returns the number of entries repaired.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if a read or the index write fails.
    #[instrument(skip(self))]
    pub fn reconcile_index(&self) -> Result<usize> {
        let _guard = self.ctx.lock(keys::ALL_ORDERS);
        let existing: Vec<OrderPointer> = self.ctx.load(keys::ALL_ORDERS)?;
        let known: HashSet<&OrderNumber> = existing.iter().map(|p| &p.order_number).collect();

        let mut rebuilt: Vec<OrderPointer> = Vec::new();
        for key in self.ctx.kv().keys()? {
            if !key.starts_with(keys::USER_ORDERS_PREFIX) {
                continue;
            }
            let orders: Vec<Order> = self.ctx.load(&key)?;
            rebuilt.extend(orders.iter().map(OrderPointer::from));
        }
        rebuilt.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let rebuilt_numbers: HashSet<&OrderNumber> =
            rebuilt.iter().map(|p| &p.order_number).collect();
        let added = rebuilt_numbers.difference(&known).count();
        let pruned = known.difference(&rebuilt_numbers).count();
        let repaired = added + pruned;

        if repaired > 0 {
            self.ctx.save(keys::ALL_ORDERS, &rebuilt)?;
            drop(_guard);
            info!(added, pruned, "order index reconciled");
            self.ctx
                .events()
                .emit(&ChangeEvent::OrdersChanged { user_id: None });
        }
        Ok(repaired)
    }

    /// Resolve an order number to its owner via the global index.
    fn owner_of(&self, order_number: &OrderNumber) -> Result<Option<UserId>> {
        let index: Vec<OrderPointer> = self.ctx.load(keys::ALL_ORDERS)?;
        Ok(index
            .into_iter()
            .find(|p| p.order_number == *order_number)
            .map(|p| p.user_id))
    }
}

/// Generate an order number in the storefront's historical format:
/// `ORD-{unix millis}-{9 random lowercase alphanumerics}`.
fn generate_order_number() -> OrderNumber {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    OrderNumber::new(format!("ORD-{}-{suffix}", Utc::now().timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use breadbox_core::{Price, ProductId};

    use crate::models::placeholder_image;
    use crate::store::MemoryStore;

    use super::*;

    fn ledger() -> OrderLedger {
        OrderLedger::new(StoreContext::new(Box::new(MemoryStore::new())))
    }

    fn item(price_cents: i64, quantity: u32) -> OrderItem {
        OrderItem {
            product_id: ProductId::new("p-1"),
            name: "Sourdough Loaf".to_owned(),
            price: Price::new(Decimal::new(price_cents, 2)).expect("valid price"),
            quantity,
            image: placeholder_image(),
        }
    }

    fn place(orders: &OrderLedger, user: &UserId, items: Vec<OrderItem>) -> Order {
        orders
            .place_order(
                user,
                items,
                ShippingAddress::default(),
                PaymentMethod::CreditCard,
            )
            .expect("place order")
    }

    #[test]
    fn test_charge_breakdown_below_free_shipping() {
        let orders = ledger();
        let order = place(&orders, &UserId::new("u-1"), vec![item(2000, 2)]);

        assert_eq!(order.subtotal, Decimal::new(40, 0));
        assert_eq!(order.tax, Decimal::new(4, 0));
        assert_eq!(order.shipping, Decimal::new(599, 2));
        assert_eq!(order.total, Decimal::new(4999, 2));
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[test]
    fn test_free_shipping_above_threshold() {
        let orders = ledger();
        let order = place(&orders, &UserId::new("u-1"), vec![item(3000, 2)]);

        assert_eq!(order.subtotal, Decimal::new(60, 0));
        assert_eq!(order.shipping, Decimal::ZERO);
        assert_eq!(order.total, Decimal::new(66, 0));
    }

    #[test]
    fn test_exactly_threshold_still_pays_shipping() {
        let orders = ledger();
        let order = place(&orders, &UserId::new("u-1"), vec![item(2500, 2)]);

        assert_eq!(order.subtotal, Decimal::new(50, 0));
        assert_eq!(order.shipping, Decimal::new(599, 2));
    }

    #[test]
    fn test_empty_order_is_rejected() {
        let orders = ledger();
        let err = orders
            .place_order(
                &UserId::new("u-1"),
                Vec::new(),
                ShippingAddress::default(),
                PaymentMethod::CreditCard,
            )
            .expect_err("empty order");
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn test_order_numbers_are_unique() {
        let orders = ledger();
        let user = UserId::new("u-1");
        let first = place(&orders, &user, vec![item(2000, 1)]);
        let second = place(&orders, &user, vec![item(2000, 1)]);
        assert_ne!(first.order_number, second.order_number);
        assert!(first.order_number.as_str().starts_with("ORD-"));
    }

    #[test]
    fn test_views_agree_after_placement() {
        let orders = ledger();
        let user = UserId::new("u-1");
        let placed = place(&orders, &user, vec![item(2000, 2)]);

        let mine = orders.get_orders_for_user(&user).expect("user view");
        let all = orders.get_all_orders().expect("admin view");
        assert_eq!(mine, all);
        assert_eq!(mine.first(), Some(&placed));
    }

    #[test]
    fn test_views_agree_after_status_update() {
        let orders = ledger();
        let user = UserId::new("u-1");
        let placed = place(&orders, &user, vec![item(2000, 2)]);

        orders
            .update_status(&placed.order_number, OrderStatus::Shipped)
            .expect("ship");

        let mine = orders.get_orders_for_user(&user).expect("user view");
        let all = orders.get_all_orders().expect("admin view");
        assert_eq!(mine.first().map(|o| o.status), Some(OrderStatus::Shipped));
        assert_eq!(mine, all);
    }

    #[test]
    fn test_happy_path_transitions() {
        let orders = ledger();
        let placed = place(&orders, &UserId::new("u-1"), vec![item(2000, 1)]);

        orders
            .update_status(&placed.order_number, OrderStatus::Shipped)
            .expect("processing -> shipped");
        let delivered = orders
            .update_status(&placed.order_number, OrderStatus::Delivered)
            .expect("shipped -> delivered");
        assert_eq!(delivered.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_terminal_states_reject_transitions() {
        let orders = ledger();
        let placed = place(&orders, &UserId::new("u-1"), vec![item(2000, 1)]);

        orders
            .update_status(&placed.order_number, OrderStatus::Shipped)
            .expect("ship");
        orders
            .update_status(&placed.order_number, OrderStatus::Delivered)
            .expect("deliver");

        let err = orders
            .update_status(&placed.order_number, OrderStatus::Processing)
            .expect_err("delivered is terminal");
        assert!(matches!(err, LedgerError::Validation(_)));

        // The stored status is untouched by the rejected transition.
        let stored = orders
            .get_order(&placed.order_number)
            .expect("read")
            .expect("present");
        assert_eq!(stored.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_cancellation_paths() {
        let orders = ledger();
        let user = UserId::new("u-1");

        let first = place(&orders, &user, vec![item(2000, 1)]);
        orders
            .update_status(&first.order_number, OrderStatus::Cancelled)
            .expect("processing -> cancelled");

        let second = place(&orders, &user, vec![item(2000, 1)]);
        orders
            .update_status(&second.order_number, OrderStatus::Shipped)
            .expect("ship");
        orders
            .update_status(&second.order_number, OrderStatus::Cancelled)
            .expect("shipped -> cancelled");

        let err = orders
            .update_status(&first.order_number, OrderStatus::Shipped)
            .expect_err("cancelled is terminal");
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn test_unknown_order_is_not_found() {
        let orders = ledger();
        let err = orders
            .update_status(&OrderNumber::new("ORD-0-missing"), OrderStatus::Shipped)
            .expect_err("unknown order");
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn test_delete_removes_from_both_views() {
        let orders = ledger();
        let user = UserId::new("u-1");
        let placed = place(&orders, &user, vec![item(2000, 1)]);

        assert!(orders.delete_order(&placed.order_number).expect("delete"));
        assert!(
            !orders
                .delete_order(&placed.order_number)
                .expect("re-delete")
        );
        assert!(orders.get_orders_for_user(&user).expect("user view").is_empty());
        assert!(orders.get_all_orders().expect("admin view").is_empty());
    }

    #[test]
    fn test_reconcile_rebuilds_lost_index() {
        let orders = ledger();
        let user = UserId::new("u-1");
        let placed = place(&orders, &user, vec![item(2000, 1)]);

        // Simulate index loss (e.g. a corrupt value that decoded as empty).
        orders
            .ctx
            .kv()
            .remove(keys::ALL_ORDERS)
            .expect("drop index");
        assert!(orders.get_all_orders().expect("admin view").is_empty());

        let repaired = orders.reconcile_index().expect("reconcile");
        assert_eq!(repaired, 1);

        let all = orders.get_all_orders().expect("admin view");
        assert_eq!(all.first(), Some(&placed));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let orders = ledger();
        place(&orders, &UserId::new("u-1"), vec![item(2000, 1)]);

        assert_eq!(orders.reconcile_index().expect("first pass"), 0);
    }

    #[test]
    fn test_orders_sorted_newest_first() {
        let orders = ledger();
        let user = UserId::new("u-1");
        let first = place(&orders, &user, vec![item(2000, 1)]);
        let second = place(&orders, &user, vec![item(3000, 1)]);

        let history = orders.get_orders_for_user(&user).expect("history");
        let numbers: Vec<_> = history.iter().map(|o| o.order_number.clone()).collect();
        assert_eq!(numbers, vec![second.order_number, first.order_number]);
    }
}
