//! Per-user wishlist ledger.

use std::sync::Arc;

use breadbox_core::{ProductId, UserId};
use tracing::instrument;

use crate::error::Result;
use crate::events::ChangeEvent;
use crate::models::{Product, WishlistItem};
use crate::store::{StoreContext, keys};

/// Owns per-user wishlist entries. Simpler than the cart: entries carry no
/// quantity and adding a duplicate is a reported no-op, not an error.
#[derive(Clone)]
pub struct WishlistLedger {
    ctx: Arc<StoreContext>,
}

impl WishlistLedger {
    pub(crate) fn new(ctx: Arc<StoreContext>) -> Self {
        Self { ctx }
    }

    /// Add `product` to the user's wishlist.
    ///
    /// # Returns
    ///
    /// `true` if the entry was added, `false` if it was already present.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if persisting fails.
    #[instrument(skip(self, product), fields(user_id = %user_id, product_id = %product.id))]
    pub fn add_item(&self, user_id: &UserId, product: &Product) -> Result<bool> {
        let key = keys::wishlist(user_id);
        let _guard = self.ctx.lock(&key);
        let mut wishlist: Vec<WishlistItem> = self.ctx.load(&key)?;

        if wishlist.iter().any(|i| i.product_id == product.id) {
            return Ok(false);
        }
        wishlist.push(WishlistItem::from_product(product));
        self.ctx.save(&key, &wishlist)?;
        drop(_guard);

        self.ctx.events().emit(&ChangeEvent::WishlistChanged {
            user_id: user_id.clone(),
        });
        Ok(true)
    }

    /// Remove an entry. Removing an absent entry is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if persisting fails.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub fn remove_item(&self, user_id: &UserId, product_id: &ProductId) -> Result<()> {
        let key = keys::wishlist(user_id);
        let _guard = self.ctx.lock(&key);
        let mut wishlist: Vec<WishlistItem> = self.ctx.load(&key)?;
        let before = wishlist.len();
        wishlist.retain(|i| i.product_id != *product_id);
        if wishlist.len() == before {
            return Ok(());
        }
        self.ctx.save(&key, &wishlist)?;
        drop(_guard);

        self.ctx.events().emit(&ChangeEvent::WishlistChanged {
            user_id: user_id.clone(),
        });
        Ok(())
    }

    /// The user's wishlist in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the read fails.
    pub fn get_wishlist(&self, user_id: &UserId) -> Result<Vec<WishlistItem>> {
        Ok(self.ctx.load(&keys::wishlist(user_id))?)
    }
}

#[cfg(test)]
mod tests {
    use breadbox_core::Price;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::models::placeholder_image;
    use crate::store::MemoryStore;

    use super::*;

    fn fixture() -> (WishlistLedger, UserId, Product) {
        let ctx = StoreContext::new(Box::new(MemoryStore::new()));
        let product = Product {
            id: ProductId::new("p-1"),
            title: "Rye Loaf".to_owned(),
            price: Price::new(Decimal::new(899, 2)).expect("valid price"),
            category: "bakery".to_owned(),
            image: placeholder_image(),
            stock: 3,
            description: String::new(),
            created_at: Utc::now(),
        };
        (WishlistLedger::new(ctx), UserId::new("u-1"), product)
    }

    #[test]
    fn test_duplicate_add_is_reported_not_error() {
        let (wishlist, user, product) = fixture();

        assert!(wishlist.add_item(&user, &product).expect("first add"));
        assert!(!wishlist.add_item(&user, &product).expect("duplicate add"));
        assert_eq!(wishlist.get_wishlist(&user).expect("read").len(), 1);
    }

    #[test]
    fn test_add_ignores_stock() {
        let (wishlist, user, mut product) = fixture();
        product.stock = 0;

        // Unlike the cart, wishlisting an out-of-stock product is fine.
        assert!(wishlist.add_item(&user, &product).expect("add"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (wishlist, user, product) = fixture();
        wishlist.add_item(&user, &product).expect("add");

        wishlist.remove_item(&user, &product.id).expect("remove");
        wishlist
            .remove_item(&user, &product.id)
            .expect("remove again");
        assert!(wishlist.get_wishlist(&user).expect("read").is_empty());
    }
}
