//! The state container and its subscription handles.
//!
//! A [`Store`] owns one state value and a reducer. Dispatching an action
//! replaces the state with the reducer's output and fans the new state out to
//! every subscribed listener.

mod store;
mod subscription;

pub use store::{Store, WeakStore};
pub use subscription::{SubscriberId, Subscription, SubscriptionGuard};
