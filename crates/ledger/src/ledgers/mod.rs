//! One ledger per entity type.
//!
//! A ledger owns its collection(s) in the store and is the only writer to
//! them. Every mutation is a lock -> load -> modify -> store cycle on the
//! collection's key, followed by a change notification.

mod cart;
mod inventory;
mod orders;
mod users;
mod wishlist;

pub use cart::CartLedger;
pub use inventory::InventoryLedger;
pub use orders::OrderLedger;
pub use users::UserDirectory;
pub use wishlist::WishlistLedger;
