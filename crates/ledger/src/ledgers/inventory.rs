//! Product inventory ledger.

use std::sync::Arc;

use breadbox_core::{Price, ProductId};
use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{LedgerError, Result};
use crate::events::ChangeEvent;
use crate::models::{NewProduct, Product, ProductPatch, placeholder_image};
use crate::store::{StoreContext, keys};

/// Owns the product catalog: prices, stock levels, categories.
///
/// Stock and price can never go negative; both are rejected at the edge.
/// Deleting a product does not cascade into carts, wishlists, or orders -
/// those hold weak references and treat a missing product as unavailable.
#[derive(Clone)]
pub struct InventoryLedger {
    ctx: Arc<StoreContext>,
}

impl InventoryLedger {
    pub(crate) fn new(ctx: Arc<StoreContext>) -> Self {
        Self { ctx }
    }

    /// Create a product with a fresh unique id and persist it.
    ///
    /// Stock defaults to 0 and the image to a placeholder when not supplied.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` for an empty title or negative
    /// price, and `LedgerError::Storage` if persisting fails.
    #[instrument(skip(self, new))]
    pub fn create_product(&self, new: NewProduct) -> Result<Product> {
        if new.title.trim().is_empty() {
            return Err(LedgerError::Validation(
                "product title cannot be empty".to_owned(),
            ));
        }
        let price = Price::new(new.price)
            .map_err(|err| LedgerError::Validation(err.to_string()))?;

        let product = Product {
            id: ProductId::new(Uuid::new_v4().to_string()),
            title: new.title,
            price,
            category: new.category.unwrap_or_default(),
            image: new.image.unwrap_or_else(placeholder_image),
            stock: new.stock,
            description: new.description.unwrap_or_default(),
            created_at: Utc::now(),
        };

        let _guard = self.ctx.lock(keys::PRODUCTS);
        let mut products: Vec<Product> = self.ctx.load(keys::PRODUCTS)?;
        products.push(product.clone());
        self.ctx.save(keys::PRODUCTS, &products)?;
        drop(_guard);

        info!(product_id = %product.id, title = %product.title, "product created");
        self.ctx.events().emit(&ChangeEvent::ProductsChanged);
        Ok(product)
    }

    /// Merge the given fields into an existing product.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` for an unknown id and
    /// `LedgerError::Validation` if the patch would make the price negative
    /// or the title empty.
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub fn update_product(&self, id: &ProductId, patch: ProductPatch) -> Result<Product> {
        let _guard = self.ctx.lock(keys::PRODUCTS);
        let mut products: Vec<Product> = self.ctx.load(keys::PRODUCTS)?;
        let Some(product) = products.iter_mut().find(|p| p.id == *id) else {
            return Err(LedgerError::NotFound(format!("product {id}")));
        };

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(LedgerError::Validation(
                    "product title cannot be empty".to_owned(),
                ));
            }
            product.title = title;
        }
        if let Some(price) = patch.price {
            product.price =
                Price::new(price).map_err(|err| LedgerError::Validation(err.to_string()))?;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(image) = patch.image {
            product.image = image;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(description) = patch.description {
            product.description = description;
        }

        let updated = product.clone();
        self.ctx.save(keys::PRODUCTS, &products)?;
        drop(_guard);

        self.ctx.events().emit(&ChangeEvent::ProductsChanged);
        Ok(updated)
    }

    /// Remove a product from the catalog.
    ///
    /// Existing cart, wishlist, and order references are left alone; they
    /// degrade to "unavailable" when resolved.
    ///
    /// # Returns
    ///
    /// `true` if the product existed, `false` if it was already gone.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if persisting fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn delete_product(&self, id: &ProductId) -> Result<bool> {
        let _guard = self.ctx.lock(keys::PRODUCTS);
        let mut products: Vec<Product> = self.ctx.load(keys::PRODUCTS)?;
        let before = products.len();
        products.retain(|p| p.id != *id);
        if products.len() == before {
            return Ok(false);
        }
        self.ctx.save(keys::PRODUCTS, &products)?;
        drop(_guard);

        info!(product_id = %id, "product deleted");
        self.ctx.events().emit(&ChangeEvent::ProductsChanged);
        Ok(true)
    }

    /// Set a product's stock level.
    ///
    /// The parameter is signed so a negative request can be rejected rather
    /// than silently wrapped.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` for negative stock and
    /// `LedgerError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn adjust_stock(&self, id: &ProductId, new_stock: i64) -> Result<Product> {
        let new_stock = u32::try_from(new_stock).map_err(|_| {
            LedgerError::Validation(format!("stock cannot be negative: {new_stock}"))
        })?;

        let _guard = self.ctx.lock(keys::PRODUCTS);
        let mut products: Vec<Product> = self.ctx.load(keys::PRODUCTS)?;
        let Some(product) = products.iter_mut().find(|p| p.id == *id) else {
            return Err(LedgerError::NotFound(format!("product {id}")));
        };
        product.stock = new_stock;
        let updated = product.clone();
        self.ctx.save(keys::PRODUCTS, &products)?;
        drop(_guard);

        self.ctx.events().emit(&ChangeEvent::ProductsChanged);
        Ok(updated)
    }

    /// Look up a single product.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the read fails.
    pub fn get_product(&self, id: &ProductId) -> Result<Option<Product>> {
        let products: Vec<Product> = self.ctx.load(keys::PRODUCTS)?;
        Ok(products.into_iter().find(|p| p.id == *id))
    }

    /// All products, in no particular order. Callers sort as needed.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the read fails.
    pub fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.ctx.load(keys::PRODUCTS)?)
    }

    /// Current stock for a product; 0 for products that no longer exist, so
    /// dangling references read as unavailable rather than failing.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the read fails.
    pub fn stock_of(&self, id: &ProductId) -> Result<u32> {
        Ok(self.get_product(id)?.map_or(0, |p| p.stock))
    }

    /// Merge an external catalog feed into the inventory.
    ///
    /// Feed records are inserted only when no product with the same id
    /// exists; locally owned records always win. Returns the number of
    /// products inserted.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if persisting fails.
    #[instrument(skip(self, feed))]
    pub fn merge_catalog(&self, feed: Vec<Product>) -> Result<usize> {
        let _guard = self.ctx.lock(keys::PRODUCTS);
        let mut products: Vec<Product> = self.ctx.load(keys::PRODUCTS)?;
        let mut inserted = 0;
        for incoming in feed {
            if products.iter().any(|p| p.id == incoming.id) {
                continue;
            }
            products.push(incoming);
            inserted += 1;
        }
        if inserted > 0 {
            self.ctx.save(keys::PRODUCTS, &products)?;
        }
        drop(_guard);

        if inserted > 0 {
            info!(inserted, "catalog feed merged");
            self.ctx.events().emit(&ChangeEvent::ProductsChanged);
        }
        Ok(inserted)
    }
}
