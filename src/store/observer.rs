//! Field-level change subscriptions

use std::sync::Arc;

use super::state::{StoreField, StoreState};

/// Handle returned by [`Subscribers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked with a snapshot of the state after an update
pub type Callback = Arc<dyn Fn(&StoreState) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    field: StoreField,
    callback: Callback,
}

/// Registry of per-field subscribers
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    entries: Vec<Subscription>,
}

impl Subscribers {
    pub fn subscribe(&mut self, field: StoreField, callback: Callback) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push(Subscription {
            id,
            field,
            callback,
        });
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| s.id != id);
        self.entries.len() != before
    }

    /// Callbacks subscribed to any of `changed`, in registration order.
    ///
    /// Returned as owned handles so they can run after the registry lock is
    /// released.
    pub fn affected(&self, changed: &[StoreField]) -> Vec<Callback> {
        self.entries
            .iter()
            .filter(|s| changed.contains(&s.field))
            .map(|s| s.callback.clone())
            .collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
