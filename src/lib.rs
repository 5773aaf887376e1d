//! # Tally
//!
//! A minimal observable state container for Rust.
//!
//! A [`Store`] holds a single state value that only changes through
//! [`Store::dispatch`]: the action is handed to a pure [`Reducer`], its result
//! replaces the state, and every subscribed listener is called with the new
//! state in the order it subscribed.
//!
//! - `Store<S, A>` - Thread-safe container; clones are handles to the same store
//! - `Subscription` - One-shot unsubscribe handle for exactly one registration
//! - `Reducer` - Closures `Fn(&S, &A) -> S`, or [`Fallible`] ones that can reject
//! - `tally` - Sample counter reducer driven by `"ADD"`, `"SUBTRACT"`, `"RESET"`
//!
//! ```
//! use tally::{tally_store, TallyAction};
//!
//! let store = tally_store();
//! for kind in ["ADD", "ADD", "SUBTRACT"] {
//!     store.dispatch(kind.parse::<TallyAction>().unwrap()).unwrap();
//! }
//! assert_eq!(store.state(), 1);
//! ```

pub mod config;
pub mod error;
pub mod reducer;
pub mod store;

// Re-export main types for convenience
pub use config::{ListenerPolicy, StoreConfig};
pub use error::{DispatchError, DispatchResult, ReduceError};
pub use reducer::{tally, tally_store, Fallible, Reducer, TallyAction, TallyReducer};
pub use store::{Store, SubscriberId, Subscription, SubscriptionGuard, WeakStore};
