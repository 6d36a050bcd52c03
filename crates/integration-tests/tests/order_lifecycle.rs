//! Order status transitions and consistency between the per-user and admin
//! views.

use breadbox_core::{OrderNumber, OrderStatus, PaymentMethod};
use breadbox_integration_tests::{fresh_storefront, login_user, shipping_address, stocked_product};
use breadbox_ledger::{LedgerError, Order, Storefront};

fn place_one(shop: &Storefront, uid: &str) -> Order {
    let user = login_user(shop, uid);
    let product = stocked_product(shop, "Sourdough Loaf", 2000, 5);
    shop.cart().add_item(&user, &product).expect("add");
    shop.checkout(&user, shipping_address(), PaymentMethod::CreditCard)
        .expect("checkout")
}

#[test]
fn full_lifecycle_processing_to_delivered() {
    let shop = fresh_storefront();
    let order = place_one(&shop, "u1");
    assert_eq!(order.status, OrderStatus::Processing);

    shop.orders()
        .update_status(&order.order_number, OrderStatus::Shipped)
        .expect("ship");
    let delivered = shop
        .orders()
        .update_status(&order.order_number, OrderStatus::Delivered)
        .expect("deliver");
    assert_eq!(delivered.status, OrderStatus::Delivered);
}

#[test]
fn delivered_to_processing_is_rejected() {
    let shop = fresh_storefront();
    let order = place_one(&shop, "u1");

    shop.orders()
        .update_status(&order.order_number, OrderStatus::Shipped)
        .expect("ship");
    shop.orders()
        .update_status(&order.order_number, OrderStatus::Delivered)
        .expect("deliver");

    let err = shop
        .orders()
        .update_status(&order.order_number, OrderStatus::Processing)
        .expect_err("terminal state");
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn skipping_shipped_is_rejected() {
    let shop = fresh_storefront();
    let order = place_one(&shop, "u1");

    let err = shop
        .orders()
        .update_status(&order.order_number, OrderStatus::Delivered)
        .expect_err("must ship first");
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn both_views_return_the_same_order() {
    let shop = fresh_storefront();
    let placed = place_one(&shop, "u1");

    let mine = shop
        .orders()
        .get_orders_for_user(&placed.user_id)
        .expect("user view");
    let all = shop.orders().get_all_orders().expect("admin view");

    assert_eq!(mine, all);
    let from_user = mine.first().expect("order present");
    assert_eq!(from_user.total, placed.total);
    assert_eq!(from_user.status, placed.status);
}

#[test]
fn admin_view_spans_users_newest_first() {
    let shop = fresh_storefront();
    let first = place_one(&shop, "u1");
    let second = place_one(&shop, "u2");

    let all = shop.orders().get_all_orders().expect("admin view");
    let numbers: Vec<&OrderNumber> = all.iter().map(|o| &o.order_number).collect();
    assert_eq!(numbers, vec![&second.order_number, &first.order_number]);
}

#[test]
fn status_update_is_visible_in_both_views() {
    let shop = fresh_storefront();
    let order = place_one(&shop, "u1");

    shop.orders()
        .update_status(&order.order_number, OrderStatus::Shipped)
        .expect("ship");

    let mine = shop
        .orders()
        .get_orders_for_user(&order.user_id)
        .expect("user view");
    let all = shop.orders().get_all_orders().expect("admin view");
    assert_eq!(mine.first().map(|o| o.status), Some(OrderStatus::Shipped));
    assert_eq!(all.first().map(|o| o.status), Some(OrderStatus::Shipped));
}

#[test]
fn deleting_an_order_clears_both_views() {
    let shop = fresh_storefront();
    let order = place_one(&shop, "u1");

    assert!(shop.orders().delete_order(&order.order_number).expect("delete"));
    assert!(
        shop.orders()
            .get_orders_for_user(&order.user_id)
            .expect("user view")
            .is_empty()
    );
    assert!(shop.orders().get_all_orders().expect("admin view").is_empty());
}

#[test]
fn unknown_order_number_is_not_found() {
    let shop = fresh_storefront();
    let err = shop
        .orders()
        .update_status(&OrderNumber::new("ORD-0-nonesuch"), OrderStatus::Shipped)
        .expect_err("unknown order");
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[test]
fn orders_survive_for_each_user_independently() {
    let shop = fresh_storefront();
    let first = place_one(&shop, "u1");
    let second = place_one(&shop, "u2");

    shop.orders()
        .delete_order(&first.order_number)
        .expect("delete u1 order");

    let remaining = shop.orders().get_all_orders().expect("admin view");
    assert_eq!(remaining.len(), 1);
    assert_eq!(
        remaining.first().map(|o| o.order_number.clone()),
        Some(second.order_number)
    );
}
