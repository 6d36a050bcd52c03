//! Breadbox Core - Shared types library.
//!
//! This crate provides common types used across all Breadbox components:
//! - `ledger` - Embedded storefront ledger (inventory, carts, wishlists, orders)
//! - `cli` - Command-line tools for store management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
