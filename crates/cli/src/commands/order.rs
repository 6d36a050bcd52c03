//! Order management commands.

use breadbox_core::{OrderNumber, OrderStatus};
use breadbox_ledger::Storefront;
use tracing::info;

/// List all orders, newest first.
///
/// # Errors
///
/// Returns an error if the order views cannot be read.
pub fn list(shop: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let orders = shop.orders().get_all_orders()?;

    info!(count = orders.len(), "orders");
    for order in orders {
        info!(
            number = %order.order_number,
            user = %order.user_id,
            status = %order.status,
            total = %order.total,
            items = order.items.len(),
            placed = %order.created_at,
            "order"
        );
    }
    Ok(())
}

/// Move an order to a new status.
///
/// # Errors
///
/// Returns an error for unknown order numbers, unrecognized or illegal
/// status transitions, or persistence failure.
pub fn set_status(
    shop: &Storefront,
    number: &str,
    status: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let status: OrderStatus = status.parse()?;
    let order = shop
        .orders()
        .update_status(&OrderNumber::new(number), status)?;
    info!(number = %order.order_number, status = %order.status, "order status updated");
    Ok(())
}

/// Delete an order from both views.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn delete(shop: &Storefront, number: &str) -> Result<(), Box<dyn std::error::Error>> {
    let existed = shop.orders().delete_order(&OrderNumber::new(number))?;
    if existed {
        info!(number, "order deleted");
    } else {
        info!(number, "order not found");
    }
    Ok(())
}

/// Rebuild the global order index from the per-user records.
///
/// # Errors
///
/// Returns an error if the scan or the index write fails.
pub fn reconcile(shop: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let repaired = shop.orders().reconcile_index()?;
    info!(repaired, "order index reconciled");
    Ok(())
}
