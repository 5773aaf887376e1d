use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

pub type DispatchResult = Result<(), DispatchError>;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure reported by a reducer. The store keeps its previous state.
#[derive(Debug)]
pub struct ReduceError(BoxError);

impl ReduceError {
    pub fn new<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ReduceError(Box::new(err))
    }

    pub fn msg(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        ReduceError(msg.into())
    }

    /// The underlying reducer error.
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }
}

impl fmt::Display for ReduceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for ReduceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The reducer rejected the action; state and listeners were left alone.
    #[error("reducer failed: {0}")]
    Reducer(#[from] ReduceError),

    /// One or more listeners panicked while being notified. State was already
    /// replaced and every other listener still ran.
    #[error("{failed} listener(s) panicked during notification: {message}")]
    ListenerPanicked { failed: usize, message: String },
}

impl DispatchError {
    pub fn is_reducer(&self) -> bool {
        matches!(self, DispatchError::Reducer(_))
    }
}
