//! Key-value storage abstraction and persisted layout.
//!
//! Every ledger collection is one entry in a string-keyed blob store. The
//! layout is inherited from the browser storefront this ledger replaces, so an
//! existing profile's data decodes unchanged:
//!
//! | key                     | contents                          |
//! |-------------------------|-----------------------------------|
//! | `adminProducts`         | product catalog                   |
//! | `users`                 | user directory                    |
//! | `cart_{userId}`         | one user's cart line items        |
//! | `wishlist_{userId}`     | one user's wishlist items         |
//! | `user_orders_{userId}`  | one user's orders (source of truth) |
//! | `all_orders`            | global order index (pointers)     |
//!
//! Backends implement [`KeyValueStore`]; [`MemoryStore`] for tests and
//! ephemeral use, [`RedbStore`] for a durable on-disk store.

mod file;
mod memory;

pub use file::RedbStore;
pub use memory::MemoryStore;

use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::codec;
use crate::events::EventBus;

/// Errors surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store failed to read or write.
    #[error("storage backend: {0}")]
    Backend(String),

    /// A stored value failed to decode. The codec degrades this to an empty
    /// collection for the caller; the error itself is logged.
    #[error("corrupt record at {key}: {reason}")]
    Corrupt {
        /// Store key holding the malformed value.
        key: String,
        /// Decoder diagnostics.
        reason: String,
    },

    /// A record collection failed to serialize.
    #[error("failed to encode records for {key}: {source}")]
    Encode {
        /// Store key the records were destined for.
        key: String,
        /// Underlying serializer error.
        source: serde_json::Error,
    },
}

/// Opaque persistent string-keyed blob store.
///
/// Implementations must be safe to share across threads; the ledger layers
/// its own per-key serialization on top, so a backend only needs each
/// individual `get`/`set`/`remove` to be atomic.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the read fails.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the write fails.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Deleting an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the delete fails.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Enumerate all keys currently present.
    ///
    /// Used to discover per-user collections (e.g. every `user_orders_*`
    /// entry) for admin aggregation and index reconciliation.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the scan fails.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }
}

/// Persisted key layout.
pub(crate) mod keys {
    use breadbox_core::UserId;

    /// Product catalog collection.
    pub const PRODUCTS: &str = "adminProducts";
    /// User directory collection.
    pub const USERS: &str = "users";
    /// Global order index collection.
    pub const ALL_ORDERS: &str = "all_orders";
    /// Prefix of per-user order collections.
    pub const USER_ORDERS_PREFIX: &str = "user_orders_";

    /// Key of one user's cart collection.
    pub fn cart(user_id: &UserId) -> String {
        format!("cart_{user_id}")
    }

    /// Key of one user's wishlist collection.
    pub fn wishlist(user_id: &UserId) -> String {
        format!("wishlist_{user_id}")
    }

    /// Key of one user's order collection.
    pub fn user_orders(user_id: &UserId) -> String {
        format!("{USER_ORDERS_PREFIX}{user_id}")
    }
}

/// Per-key mutual exclusion for read-modify-write cycles.
///
/// Two concurrent mutations of the same collection must not interleave their
/// read and write halves, or one update is silently lost. Holding the key in
/// a shared set serializes them while leaving unrelated keys concurrent.
struct KeyLocks {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

impl KeyLocks {
    fn new() -> Self {
        Self {
            held: Mutex::new(HashSet::new()),
            released: Condvar::new(),
        }
    }

    /// Block until `key` is free, then hold it until the guard drops.
    fn acquire(&self, key: &str) -> KeyGuard<'_> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while held.contains(key) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(key.to_owned());
        KeyGuard {
            locks: self,
            key: key.to_owned(),
        }
    }
}

/// Guard representing exclusive access to one storage key.
pub(crate) struct KeyGuard<'a> {
    locks: &'a KeyLocks,
    key: String,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        let mut held = self
            .locks
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.key);
        self.locks.released.notify_all();
    }
}

/// Shared storage context handed to every ledger.
///
/// Bundles the injected [`KeyValueStore`] capability with the per-key lock
/// table and the change-event bus, so ledgers stay free of hidden global
/// state.
pub(crate) struct StoreContext {
    kv: Box<dyn KeyValueStore>,
    locks: KeyLocks,
    events: EventBus,
}

impl StoreContext {
    pub(crate) fn new(kv: Box<dyn KeyValueStore>) -> Arc<Self> {
        Arc::new(Self {
            kv,
            locks: KeyLocks::new(),
            events: EventBus::new(),
        })
    }

    /// Acquire the mutation lock for `key`.
    ///
    /// Multi-key operations must acquire the per-user key before the global
    /// index key; every call site uses that order.
    pub(crate) fn lock(&self, key: &str) -> KeyGuard<'_> {
        self.locks.acquire(key)
    }

    /// Load and decode the collection stored under `key`.
    ///
    /// Malformed stored values decode as an empty collection (and are logged
    /// by the codec); only backend read failures surface as errors.
    pub(crate) fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StorageError> {
        let raw = self.kv.get(key)?;
        Ok(codec::decode_collection(key, raw.as_deref()))
    }

    /// Encode and store `items` under `key`.
    pub(crate) fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StorageError> {
        let encoded = codec::encode_collection(key, items)?;
        self.kv.set(key, &encoded)
    }

    pub(crate) fn kv(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.events
    }
}
