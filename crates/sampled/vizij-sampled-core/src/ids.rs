//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// Handle returned by `ChangeNotifier::subscribe`, used to unsubscribe.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

/// Monotonic allocator for SubscriptionId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_subscription: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_subscription(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.wrapping_add(1);
        id
    }
}
