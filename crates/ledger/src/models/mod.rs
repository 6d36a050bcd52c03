//! Record types as they live in storage.
//!
//! Field names serialize in `camelCase` (with a couple of legacy spellings
//! noted per type) so a store written by the legacy browser storefront
//! decodes unchanged. Defaults for missing fields are declared here and
//! applied by the codec.

mod cart;
mod order;
mod product;
mod user;
mod wishlist;

pub use cart::CartItem;
pub use order::{Order, OrderItem, OrderPointer, ShippingAddress};
pub use product::{NewProduct, Product, ProductPatch, placeholder_image};
pub use user::{LoginEvent, UserProfile};
pub use wishlist::WishlistItem;
