//! Per-store configuration.

use std::sync::Arc;

/// What a dispatch does when a listener panics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListenerPolicy {
    /// Let the panic unwind out of `dispatch`. Listeners after the one that
    /// panicked are not notified for that dispatch.
    #[default]
    Abort,
    /// Catch each listener's panic, keep notifying the rest, then report the
    /// failures as a [`DispatchError::ListenerPanicked`](crate::DispatchError).
    Isolate,
}

/// Options for [`Store::with_config`](crate::Store::with_config).
#[derive(Clone, Debug, Default)]
pub struct StoreConfig {
    pub(crate) name: Option<Arc<str>>,
    pub(crate) listener_policy: ListenerPolicy,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used to tag this store's log records.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        self.name = Some(Arc::from(name));
        self
    }

    pub fn with_listener_policy(mut self, policy: ListenerPolicy) -> Self {
        self.listener_policy = policy;
        self
    }

    pub fn listener_policy(&self) -> ListenerPolicy {
        self.listener_policy
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn shared_name(&self) -> Option<Arc<str>> {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_abort() {
        let config = StoreConfig::new();
        assert_eq!(config.listener_policy(), ListenerPolicy::Abort);
        assert_eq!(config.name(), None);
    }

    #[test]
    fn builder_sets_fields() {
        let config = StoreConfig::new()
            .with_name("tally")
            .with_listener_policy(ListenerPolicy::Isolate);
        assert_eq!(config.name(), Some("tally"));
        assert_eq!(config.listener_policy(), ListenerPolicy::Isolate);
    }
}
