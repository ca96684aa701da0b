use crate::{ItemSet, Symbol};

use super::{graph::Automaton, StateId};

/// A state together with its outgoing edges.
pub struct Transition<'set> {
    pub(super) id: StateId,
    pub(super) from: &'set ItemSet,
    pub(super) edges: Vec<(&'set Symbol, StateId)>,
}

impl Automaton<'_> {
    pub fn iter_transitions(&self) -> impl Iterator<Item = Transition<'_>> {
        self.sets.iter().enumerate().map(|(id, set)| Transition {
            id,
            from: set,
            edges: self
                .edges
                .iter()
                .filter(|(from, _, _)| id == *from)
                .map(|(_, sym, to)| (sym, *to))
                .collect(),
        })
    }
}
