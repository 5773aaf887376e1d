use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReduceError;
use crate::reducer::Reducer;
use crate::store::Store;

/// Actions understood by the tally counter.
///
/// Built from the `type` discriminator of an action record. Anything the
/// counter doesn't know, including a record without a `type`, becomes
/// [`TallyAction::Unknown`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "ActionRecord", into = "ActionRecord")]
pub enum TallyAction {
    Add,
    Subtract,
    Reset,
    Unknown(Option<String>),
}

impl TallyAction {
    pub fn from_type(kind: Option<&str>) -> Self {
        match kind {
            Some("ADD") => TallyAction::Add,
            Some("SUBTRACT") => TallyAction::Subtract,
            Some("RESET") => TallyAction::Reset,
            other => TallyAction::Unknown(other.map(str::to_owned)),
        }
    }

    /// The `type` discriminator, if any.
    pub fn kind(&self) -> Option<&str> {
        match self {
            TallyAction::Add => Some("ADD"),
            TallyAction::Subtract => Some("SUBTRACT"),
            TallyAction::Reset => Some("RESET"),
            TallyAction::Unknown(kind) => kind.as_deref(),
        }
    }
}

impl FromStr for TallyAction {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TallyAction::from_type(Some(s)))
    }
}

impl fmt::Display for TallyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().unwrap_or("<untyped>"))
    }
}

// Wire shape of an action: a record with an optional `type` tag. Payload
// fields are ignored.
#[derive(Deserialize, Serialize)]
struct ActionRecord {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

impl From<ActionRecord> for TallyAction {
    fn from(record: ActionRecord) -> Self {
        TallyAction::from_type(record.kind.as_deref())
    }
}

impl From<TallyAction> for ActionRecord {
    fn from(action: TallyAction) -> Self {
        ActionRecord {
            kind: action.kind().map(str::to_owned),
        }
    }
}

/// The tally counter reducer.
pub fn tally(state: &i64, action: &TallyAction) -> i64 {
    match action {
        TallyAction::Add => state.wrapping_add(1),
        TallyAction::Subtract => state.wrapping_sub(1),
        TallyAction::Reset => 0,
        TallyAction::Unknown(_) => *state,
    }
}

/// [`tally`] as a nameable reducer type.
#[derive(Clone, Copy, Debug, Default)]
pub struct TallyReducer;

impl Reducer<i64, TallyAction> for TallyReducer {
    fn reduce(&self, state: &i64, action: &TallyAction) -> Result<i64, ReduceError> {
        Ok(tally(state, action))
    }
}

/// A tally store starting at zero.
pub fn tally_store() -> Store<i64, TallyAction> {
    Store::new(TallyReducer, 0)
}
