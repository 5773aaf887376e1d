use log::debug;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

pub(crate) type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Token identifying one listener registration within a store.
///
/// Ids are handed out in increasing order, so ordering by id is ordering by
/// subscription time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered registry of listeners keyed by subscription token.
pub(crate) struct Listeners<S> {
    next_id: AtomicU64,
    entries: Mutex<BTreeMap<SubscriberId, Listener<S>>>,
}

impl<S> Listeners<S> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub(crate) fn insert(&self, listener: Listener<S>) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().insert(id, listener);
        id
    }

    /// Copy of the current registrations in subscription order.
    pub(crate) fn snapshot(&self) -> Vec<(SubscriberId, Listener<S>)> {
        self.entries
            .lock()
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

pub(crate) fn log_prefix(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("[{}] ", name),
        None => String::new(),
    }
}

/// Type-erased view of a registry, so handles don't carry the state type.
pub(crate) trait Detach: Send + Sync {
    fn detach(&self, id: SubscriberId) -> bool;
    fn contains(&self, id: SubscriberId) -> bool;
}

impl<S: 'static> Detach for Listeners<S> {
    fn detach(&self, id: SubscriberId) -> bool {
        self.entries.lock().remove(&id).is_some()
    }

    fn contains(&self, id: SubscriberId) -> bool {
        self.entries.lock().contains_key(&id)
    }
}

/// Handle returned by [`Store::subscribe`](crate::Store::subscribe).
///
/// Removes exactly the registration it was created for, even when the same
/// callback was subscribed more than once. Dropping the handle leaves the
/// listener subscribed; use [`Subscription::guard`] for scoped listeners.
pub struct Subscription {
    id: SubscriberId,
    registry: Weak<dyn Detach>,
    store_name: Option<Arc<str>>,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriberId,
        registry: Weak<dyn Detach>,
        store_name: Option<Arc<str>>,
    ) -> Self {
        Self {
            id,
            registry,
            store_name,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Name of the store this subscription belongs to, if it was given one.
    pub fn store_name(&self) -> Option<&str> {
        self.store_name.as_deref()
    }

    /// Remove this registration from the store.
    ///
    /// Returns `true` only for the call that actually removed it. Calling it
    /// again, or after the store is gone, does nothing.
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let removed = registry.detach(self.id);
        if removed {
            debug!(
                "{}unsubscribed listener {}",
                log_prefix(self.store_name()),
                self.id
            );
        }
        removed
    }

    /// Whether the registration is still present in a live store.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }

    /// Turn this handle into one that unsubscribes when dropped.
    pub fn guard(self) -> SubscriptionGuard {
        SubscriptionGuard(self)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// RAII guard for a subscription.
#[derive(Debug)]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
    pub fn id(&self) -> SubscriberId {
        self.0.id()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.0.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<Listeners<i32>> {
        Arc::new(Listeners::new())
    }

    fn noop() -> Listener<i32> {
        Arc::new(|_: &i32| {})
    }

    fn handle(registry: &Arc<Listeners<i32>>, id: SubscriberId) -> Subscription {
        let weak: Weak<dyn Detach> = Arc::downgrade(registry) as Weak<dyn Detach>;
        Subscription::new(id, weak, None)
    }

    #[test]
    fn ids_follow_insertion_order() {
        let registry = registry();
        let a = registry.insert(noop());
        let b = registry.insert(noop());
        let c = registry.insert(noop());
        assert!(a < b && b < c);

        let order: Vec<_> = registry.snapshot().into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, b, c]);
    }

    #[test]
    fn unsubscribe_is_one_shot() {
        let registry = registry();
        let id = registry.insert(noop());
        let sub = handle(&registry, id);

        assert!(sub.is_active());
        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        assert!(!sub.is_active());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn shared_callback_removes_single_entry() {
        let registry = registry();
        let listener = noop();
        let first = handle(&registry, registry.insert(Arc::clone(&listener)));
        let second = handle(&registry, registry.insert(listener));

        assert!(first.unsubscribe());
        assert_eq!(registry.len(), 1);
        assert!(second.is_active());
    }

    #[test]
    fn dead_registry_is_noop() {
        let registry = registry();
        let sub = handle(&registry, registry.insert(noop()));
        drop(registry);

        assert!(!sub.is_active());
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn log_prefix_tags_named_stores() {
        assert_eq!(log_prefix(Some("tally")), "[tally] ");
        assert_eq!(log_prefix(None), "");
    }

    #[test]
    fn guard_unsubscribes_on_drop() {
        let registry = registry();
        let guard = handle(&registry, registry.insert(noop())).guard();
        assert_eq!(registry.len(), 1);
        drop(guard);
        assert_eq!(registry.len(), 0);
    }
}
