use crate::config::{ListenerPolicy, StoreConfig};
use crate::error::{DispatchError, DispatchResult};
use crate::reducer::Reducer;
use crate::store::subscription::{
    log_prefix, Detach, Listener, Listeners, SubscriberId, Subscription,
};
use log::{debug, error, trace, warn};
use parking_lot::{Mutex, ReentrantMutex};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

struct Current<S> {
    value: S,
    revision: u64,
}

struct Inner<S, A> {
    state: Mutex<Current<S>>,
    // Held for a whole dispatch so notifications finish in revision order.
    // Reentrant so a listener may dispatch again on the same thread.
    dispatching: ReentrantMutex<()>,
    reducer: Box<dyn Reducer<S, A>>,
    listeners: Arc<Listeners<S>>,
    config: StoreConfig,
}

/// A reducer-driven state container.
///
/// State only changes through [`dispatch`](Store::dispatch), which runs the
/// reducer and then notifies every subscribed listener, in subscription order,
/// with the new state. Cloning a `Store` yields another handle to the same
/// state and listeners.
///
/// # Examples
///
/// ```
/// use tally::{tally_store, TallyAction};
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use std::sync::Arc;
///
/// let store = tally_store();
/// let seen = Arc::new(AtomicI64::new(-1));
/// let seen_clone = seen.clone();
///
/// let subscription = store.subscribe(move |count| {
///     seen_clone.store(*count, Ordering::SeqCst);
/// });
///
/// store.dispatch(TallyAction::Add).unwrap();
/// assert_eq!(store.state(), 1);
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
///
/// subscription.unsubscribe();
/// store.dispatch(TallyAction::Add).unwrap();
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub struct Store<S, A> {
    inner: Arc<Inner<S, A>>,
}

/// Non-owning handle to a [`Store`], for listeners that refer back to the
/// store they are subscribed to.
pub struct WeakStore<S, A> {
    inner: Weak<Inner<S, A>>,
}

impl<S, A> WeakStore<S, A> {
    /// The store, if any [`Store`] handle to it is still alive.
    pub fn upgrade(&self) -> Option<Store<S, A>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl<S, A> Clone for WeakStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
{
    /// Create a store with the default configuration.
    pub fn new<R>(reducer: R, initial: S) -> Self
    where
        R: Reducer<S, A>,
    {
        Self::with_config(reducer, initial, StoreConfig::default())
    }

    pub fn with_config<R>(reducer: R, initial: S, config: StoreConfig) -> Self
    where
        R: Reducer<S, A>,
    {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(Current {
                    value: initial,
                    revision: 0,
                }),
                dispatching: ReentrantMutex::new(()),
                reducer: Box::new(reducer),
                listeners: Arc::new(Listeners::new()),
                config,
            }),
        }
    }

    /// Get a clone of the current state.
    pub fn state(&self) -> S {
        self.inner.state.lock().value.clone()
    }

    /// Read state without cloning.
    ///
    /// The store is locked while `f` runs, so `f` must not dispatch to it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let current = self.inner.state.lock();
        f(&current.value)
    }

    /// Number of state replacements since the store was created.
    pub fn revision(&self) -> u64 {
        self.inner.state.lock().revision
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.config.name()
    }

    pub fn listener_policy(&self) -> ListenerPolicy {
        self.inner.config.listener_policy()
    }

    pub fn downgrade(&self) -> WeakStore<S, A> {
        WeakStore {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Apply `action` through the reducer and notify listeners.
    ///
    /// If the reducer fails (returns an error or panics) the state is left
    /// as it was and no listener runs. Otherwise the state is replaced, even
    /// when the new value equals the old one, and the listeners subscribed at
    /// this point are called in order. Listeners added while they run are
    /// first called on the next dispatch; listeners removed while they run
    /// still see this one.
    ///
    /// Dispatches from different threads are applied and notified one at a
    /// time, so the last notification a listener receives is always the
    /// current state. A listener may dispatch again from its own thread; that
    /// nested dispatch completes before the outer notification pass resumes.
    ///
    /// A panicking listener is handled according to the store's
    /// [`ListenerPolicy`].
    pub fn dispatch(&self, action: A) -> DispatchResult {
        let _dispatching = self.inner.dispatching.lock();

        let (state, revision) = {
            let mut current = self.inner.state.lock();
            let next = match self.inner.reducer.reduce(&current.value, &action) {
                Ok(next) => next,
                Err(err) => {
                    warn!("{}reducer rejected action: {}", self.log_prefix(), err);
                    return Err(DispatchError::Reducer(err));
                }
            };
            current.value = next;
            current.revision += 1;
            (current.value.clone(), current.revision)
        };

        let listeners = self.inner.listeners.snapshot();
        trace!(
            "{}dispatch applied, revision {}, notifying {} listener(s)",
            self.log_prefix(),
            revision,
            listeners.len()
        );

        match self.inner.config.listener_policy() {
            ListenerPolicy::Abort => {
                for (_, listener) in &listeners {
                    listener(&state);
                }
                Ok(())
            }
            ListenerPolicy::Isolate => self.notify_isolated(&state, &listeners),
        }
    }

    fn notify_isolated(
        &self,
        state: &S,
        listeners: &[(SubscriberId, Listener<S>)],
    ) -> DispatchResult {
        let mut failed = 0;
        let mut first_message = None;

        for (id, listener) in listeners {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener(state))) {
                let message = panic_message(payload.as_ref());
                error!("{}listener {} panicked: {}", self.log_prefix(), id, message);
                failed += 1;
                first_message.get_or_insert(message);
            }
        }

        match first_message {
            None => Ok(()),
            Some(message) => Err(DispatchError::ListenerPanicked { failed, message }),
        }
    }

    /// Subscribe to state changes.
    ///
    /// The callback is called with the new state after every dispatch until
    /// the returned [`Subscription`] is used to unsubscribe. Subscribing the
    /// same callback twice registers it twice.
    ///
    /// The store owns its listeners, so a listener that captures a `Store`
    /// clone keeps the store alive for good. Capture [`Store::downgrade`]
    /// instead when a listener needs to reach back into its own store.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = self.inner.listeners.insert(Arc::new(listener));
        debug!("{}subscribed listener {}", self.log_prefix(), id);
        let registry: Weak<dyn Detach> =
            Arc::downgrade(&self.inner.listeners) as Weak<dyn Detach>;
        Subscription::new(id, registry, self.inner.config.shared_name())
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }

    fn log_prefix(&self) -> String {
        log_prefix(self.inner.config.name())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.inner.state.lock();
        f.debug_struct("Store")
            .field("name", &self.inner.config.name())
            .field("state", &current.value)
            .field("revision", &current.revision)
            .field("subscribers", &self.inner.listeners.len())
            .finish()
    }
}
