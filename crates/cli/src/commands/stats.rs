//! Dashboard counters command.

use breadbox_ledger::Storefront;
use tracing::info;

/// Show the dashboard summary for the store.
///
/// # Errors
///
/// Returns an error if any ledger snapshot fails to read.
pub fn show(shop: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let stats = shop.dashboard().snapshot()?;

    info!(
        total_orders = stats.total_orders,
        total_products = stats.total_products,
        total_users = stats.total_users,
        total_revenue = %stats.total_revenue,
        pending_orders = stats.pending_orders,
        low_stock_products = stats.low_stock_products,
        out_of_stock_products = stats.out_of_stock_products,
        "dashboard"
    );
    Ok(())
}
