//! Change notifications for dependent views.
//!
//! Every ledger mutation emits a [`ChangeEvent`] so dashboards and admin
//! views can refresh without polling the store. The legacy storefront
//! broadcast a window-level `localStorageChange` event; here subscribers
//! register typed callbacks instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use breadbox_core::UserId;

/// A mutation notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The product catalog changed.
    ProductsChanged,
    /// One user's cart changed.
    CartChanged {
        /// Owner of the cart.
        user_id: UserId,
    },
    /// One user's wishlist changed.
    WishlistChanged {
        /// Owner of the wishlist.
        user_id: UserId,
    },
    /// Orders changed; `None` means an index-wide change (reconciliation).
    OrdersChanged {
        /// Owner of the affected order, when known.
        user_id: Option<UserId>,
    },
    /// The user directory changed.
    UsersChanged,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Registry of change subscribers.
pub(crate) struct EventBus {
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub(crate) fn subscribe(
        &self,
        callback: impl Fn(&ChangeEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub(crate) fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(sub_id, _)| *sub_id != id);
    }

    /// Deliver `event` to every subscriber, in subscription order.
    pub(crate) fn emit(&self, event: &ChangeEvent) {
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for (_, callback) in subscribers.iter() {
            callback(event);
        }
    }
}
