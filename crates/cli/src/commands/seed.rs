//! Seed the store with a demo catalog.

use breadbox_ledger::{NewProduct, Storefront};
use rust_decimal::Decimal;
use tracing::info;

/// Products inserted by `bb-cli seed`: (title, price in cents, category, stock).
const DEMO_PRODUCTS: &[(&str, i64, &str, u32)] = &[
    ("Sourdough Loaf", 899, "bakery", 12),
    ("Rye Loaf", 949, "bakery", 8),
    ("Croissant", 350, "pastry", 24),
    ("Pain au Chocolat", 425, "pastry", 5),
    ("Cinnamon Roll", 475, "pastry", 0),
    ("Cold Brew Concentrate", 1299, "coffee", 18),
    ("Single-Origin Beans 250g", 1650, "coffee", 3),
];

/// Insert the demo catalog.
///
/// Safe to run against a non-empty store; products are appended with fresh
/// ids each time.
///
/// # Errors
///
/// Returns an error if any product fails to persist.
pub fn demo_catalog(shop: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    for (title, price_cents, category, stock) in DEMO_PRODUCTS {
        let mut new = NewProduct::new(*title, Decimal::new(*price_cents, 2));
        new.category = Some((*category).to_owned());
        new.stock = *stock;
        let product = shop.inventory().create_product(new)?;
        info!(id = %product.id, title = %product.title, "seeded");
    }

    info!(count = DEMO_PRODUCTS.len(), "demo catalog seeded");
    Ok(())
}
