//! Reducers: pure state transitions.
//!
//! Any `Fn(&S, &A) -> S` closure is a reducer. Wrap a closure returning
//! `Result<S, E>` in [`Fallible`] when a transition can be rejected.

mod tally;

pub use tally::{tally, tally_store, TallyAction, TallyReducer};

use crate::error::ReduceError;
use std::error::Error as StdError;

/// Computes the next state from the current state and an action.
///
/// Implementations must not have observable side effects and must return the
/// input state unchanged for actions they do not recognize.
pub trait Reducer<S, A>: Send + Sync + 'static {
    fn reduce(&self, state: &S, action: &A) -> Result<S, ReduceError>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&S, &A) -> S + Send + Sync + 'static,
{
    fn reduce(&self, state: &S, action: &A) -> Result<S, ReduceError> {
        Ok(self(state, action))
    }
}

/// Adapts a reducer that can reject an action.
///
/// # Example
///
/// ```
/// use tally::{Fallible, Store};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("balance would go negative")]
/// struct Overdraft;
///
/// let store = Store::new(
///     Fallible(|balance: &u32, withdraw: &u32| balance.checked_sub(*withdraw).ok_or(Overdraft)),
///     10,
/// );
/// assert!(store.dispatch(4).is_ok());
/// assert!(store.dispatch(20).is_err());
/// assert_eq!(store.state(), 6);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Fallible<F>(pub F);

impl<S, A, E, F> Reducer<S, A> for Fallible<F>
where
    F: Fn(&S, &A) -> Result<S, E> + Send + Sync + 'static,
    E: StdError + Send + Sync + 'static,
{
    fn reduce(&self, state: &S, action: &A) -> Result<S, ReduceError> {
        (self.0)(state, action).map_err(ReduceError::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("odd step")]
    struct OddStep;

    #[test]
    fn closure_is_infallible_reducer() {
        let double = |n: &i32, _: &()| n * 2;
        assert_eq!(double.reduce(&21, &()).ok(), Some(42));
    }

    #[test]
    fn fallible_maps_error() {
        let even_only = Fallible(|n: &i32, step: &i32| {
            if step % 2 == 0 {
                Ok(n + step)
            } else {
                Err(OddStep)
            }
        });

        assert_eq!(even_only.reduce(&0, &2).ok(), Some(2));
        let err = even_only.reduce(&0, &3).unwrap_err();
        assert_eq!(err.to_string(), "odd step");
    }
}
