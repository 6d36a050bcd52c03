//! Product catalog commands.

use breadbox_core::ProductId;
use breadbox_ledger::{NewProduct, Storefront};
use rust_decimal::Decimal;
use tracing::info;
use url::Url;

/// List all products, sorted by title.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub fn list(shop: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let mut products = shop.inventory().list_products()?;
    products.sort_by(|a, b| a.title.cmp(&b.title));

    info!(count = products.len(), "catalog");
    for product in products {
        info!(
            id = %product.id,
            title = %product.title,
            price = %product.price,
            stock = product.stock,
            status = ?product.stock_status(),
            "product"
        );
    }
    Ok(())
}

/// Add a product to the catalog.
///
/// # Errors
///
/// Returns an error if validation or persistence fails.
pub fn add(
    shop: &Storefront,
    title: &str,
    price: Decimal,
    category: Option<String>,
    image: Option<Url>,
    stock: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut new = NewProduct::new(title, price);
    new.category = category;
    new.image = image;
    new.stock = stock;

    let product = shop.inventory().create_product(new)?;
    info!(id = %product.id, title = %product.title, "product created");
    Ok(())
}

/// Set a product's stock level.
///
/// # Errors
///
/// Returns an error for unknown ids, negative stock, or persistence failure.
pub fn adjust_stock(
    shop: &Storefront,
    id: &str,
    stock: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = shop
        .inventory()
        .adjust_stock(&ProductId::new(id), stock)?;
    info!(
        id = %product.id,
        stock = product.stock,
        status = ?product.stock_status(),
        "stock adjusted"
    );
    Ok(())
}

/// Remove a product from the catalog.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn delete(shop: &Storefront, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let existed = shop.inventory().delete_product(&ProductId::new(id))?;
    if existed {
        info!(id, "product deleted");
    } else {
        info!(id, "product was not in the catalog");
    }
    Ok(())
}
