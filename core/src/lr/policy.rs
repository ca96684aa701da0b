use log::warn;

use crate::{ErrorKind, LrResult, Symbol};

use super::{Action, StateId};

pub mod traits {
    use crate::{lr::Conflict, LrResult};

    use super::Action;

    /// Decides the content of an ACTION cell which received two different
    /// proposals.
    pub trait ConflictPolicy {
        fn resolve(&self, conflict: &Conflict) -> LrResult<Action>;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
    /// The accept entry on `$` met another action.
    Accept,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictKind::ShiftReduce => write!(f, "shift/reduce"),
            ConflictKind::ReduceReduce => write!(f, "reduce/reduce"),
            ConflictKind::Accept => write!(f, "accept"),
        }
    }
}

/// Two different actions proposed for the same (state, terminal) cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub state: StateId,
    pub symbol: Symbol,
    /// The action already in the cell, then the proposed one.
    pub actions: [Action; 2],
}

impl Conflict {
    pub fn new(state: StateId, symbol: Symbol, existing: Action, proposed: Action) -> Self {
        Self {
            state,
            symbol,
            actions: [existing, proposed],
        }
    }

    pub fn kind(&self) -> ConflictKind {
        match self.actions {
            [Action::Reduce(_), Action::Reduce(_)] => ConflictKind::ReduceReduce,
            [Action::Accept, _] | [_, Action::Accept] => ConflictKind::Accept,
            _ => ConflictKind::ShiftReduce,
        }
    }
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} conflict in state {} on '{}': {} vs {}",
            self.kind(),
            self.state,
            self.symbol,
            self.actions[0],
            self.actions[1]
        )
    }
}

/// The LR(0) tie-break.
///
/// - accept beats anything ;
/// - shift beats reduce ;
/// - between two reduces, the smaller rule wins.
///
/// The result does not depend on which action came first.
pub fn resolve(existing: Action, proposed: Action) -> Action {
    match (existing, proposed) {
        (Action::Accept, _) | (_, Action::Accept) => Action::Accept,
        (Action::Shift(_), _) => existing,
        (_, Action::Shift(_)) => proposed,
        (Action::Reduce(a), Action::Reduce(b)) => Action::Reduce(a.min(b)),
    }
}

/// Silently resolves conflicts with [resolve].
///
/// This may hide that the grammar is not LR(0).
#[derive(Debug, Default, Clone, Copy)]
pub struct Naive;

impl traits::ConflictPolicy for Naive {
    fn resolve(&self, conflict: &Conflict) -> LrResult<Action> {
        let [existing, proposed] = conflict.actions;
        let action = resolve(existing, proposed);
        warn!("{conflict}, keeping {action}");
        Ok(action)
    }
}

/// Rejects the grammar on the first conflict.
#[derive(Debug, Default, Clone, Copy)]
pub struct Strict;

impl traits::ConflictPolicy for Strict {
    fn resolve(&self, conflict: &Conflict) -> LrResult<Action> {
        Err(ErrorKind::Conflict(conflict.clone()).into())
    }
}
