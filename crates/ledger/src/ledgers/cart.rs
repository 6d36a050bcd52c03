//! Per-user shopping cart ledger.

use std::sync::Arc;

use breadbox_core::{ProductId, UserId};
use tracing::{debug, instrument};

use crate::error::{LedgerError, Result};
use crate::events::ChangeEvent;
use crate::models::{CartItem, Product};
use crate::store::{StoreContext, keys};

use super::inventory::InventoryLedger;

/// Owns per-user cart line items, one collection per user.
///
/// Stock checks go through the inventory ledger; the cart itself never
/// mutates products.
#[derive(Clone)]
pub struct CartLedger {
    ctx: Arc<StoreContext>,
    inventory: InventoryLedger,
}

impl CartLedger {
    pub(crate) fn new(ctx: Arc<StoreContext>, inventory: InventoryLedger) -> Self {
        Self { ctx, inventory }
    }

    /// Add one unit of `product` to the user's cart.
    ///
    /// If the product is already in the cart its quantity is incremented;
    /// otherwise a new line is appended with quantity 1. Returns the line as
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::OutOfStock` when the product's current stock is
    /// zero (including products deleted since the snapshot was taken).
    #[instrument(skip(self, product), fields(user_id = %user_id, product_id = %product.id))]
    pub fn add_item(&self, user_id: &UserId, product: &Product) -> Result<CartItem> {
        if self.inventory.stock_of(&product.id)? == 0 {
            return Err(LedgerError::OutOfStock {
                product_id: product.id.clone(),
            });
        }

        let key = keys::cart(user_id);
        let _guard = self.ctx.lock(&key);
        let mut cart: Vec<CartItem> = self.ctx.load(&key)?;

        let stored = if let Some(line) = cart.iter_mut().find(|i| i.product_id == product.id) {
            line.quantity += 1;
            line.clone()
        } else {
            let line = CartItem::from_product(product);
            cart.push(line.clone());
            line
        };
        self.ctx.save(&key, &cart)?;
        drop(_guard);

        debug!(quantity = stored.quantity, "cart item added");
        self.ctx.events().emit(&ChangeEvent::CartChanged {
            user_id: user_id.clone(),
        });
        Ok(stored)
    }

    /// Set the quantity of a cart line.
    ///
    /// Quantity 0 removes the line and returns `None`. Any other request is
    /// clamped to `[1, stock]` and the clamped value is returned, so callers
    /// can surface the adjustment.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the line is not in the cart, and
    /// `LedgerError::OutOfStock` if the product's current stock is zero.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub fn set_quantity(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Option<u32>> {
        let key = keys::cart(user_id);
        let _guard = self.ctx.lock(&key);
        let mut cart: Vec<CartItem> = self.ctx.load(&key)?;

        let Some(position) = cart.iter().position(|i| i.product_id == *product_id) else {
            return Err(LedgerError::NotFound(format!(
                "cart item {product_id} for user {user_id}"
            )));
        };

        if quantity == 0 {
            cart.remove(position);
            self.ctx.save(&key, &cart)?;
            drop(_guard);
            self.ctx.events().emit(&ChangeEvent::CartChanged {
                user_id: user_id.clone(),
            });
            return Ok(None);
        }

        let stock = self.inventory.stock_of(product_id)?;
        if stock == 0 {
            return Err(LedgerError::OutOfStock {
                product_id: product_id.clone(),
            });
        }

        let clamped = quantity.clamp(1, stock);
        if clamped != quantity {
            debug!(requested = quantity, clamped, stock, "cart quantity clamped");
        }
        if let Some(line) = cart.get_mut(position) {
            line.quantity = clamped;
        }
        self.ctx.save(&key, &cart)?;
        drop(_guard);

        self.ctx.events().emit(&ChangeEvent::CartChanged {
            user_id: user_id.clone(),
        });
        Ok(Some(clamped))
    }

    /// Remove a line from the cart. Removing an absent line is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if persisting fails.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub fn remove_item(&self, user_id: &UserId, product_id: &ProductId) -> Result<()> {
        let key = keys::cart(user_id);
        let _guard = self.ctx.lock(&key);
        let mut cart: Vec<CartItem> = self.ctx.load(&key)?;
        let before = cart.len();
        cart.retain(|i| i.product_id != *product_id);
        if cart.len() == before {
            return Ok(());
        }
        self.ctx.save(&key, &cart)?;
        drop(_guard);

        self.ctx.events().emit(&ChangeEvent::CartChanged {
            user_id: user_id.clone(),
        });
        Ok(())
    }

    /// The user's cart in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the read fails.
    pub fn get_cart(&self, user_id: &UserId) -> Result<Vec<CartItem>> {
        Ok(self.ctx.load(&keys::cart(user_id))?)
    }

    /// Empty the user's cart. Used after a successful checkout.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if persisting fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub fn clear(&self, user_id: &UserId) -> Result<()> {
        let key = keys::cart(user_id);
        let _guard = self.ctx.lock(&key);
        self.ctx.save::<CartItem>(&key, &[])?;
        drop(_guard);

        self.ctx.events().emit(&ChangeEvent::CartChanged {
            user_id: user_id.clone(),
        });
        Ok(())
    }
}
