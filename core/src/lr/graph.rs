use std::collections::{HashMap, VecDeque};

use log::debug;

use crate::{Grammar, Item, ItemSet, Symbol};

use super::StateId;

/// The LR(0) automaton: the canonical collection of item sets.
///
/// State #0 is the closure of S' -> • S. States are numbered in discovery
/// order, exploring each state's symbols in ascending order, so the
/// numbering only depends on the grammar.
pub struct Automaton<'g> {
    pub(super) grammar: &'g Grammar,
    pub(super) sets: Vec<ItemSet>,
    pub(super) edges: Vec<(StateId, Symbol, StateId)>,
    index: HashMap<ItemSet, StateId>,
}

impl<'g> Automaton<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        let mut automaton = Self {
            grammar,
            sets: vec![],
            edges: vec![],
            index: HashMap::default(),
        };
        automaton.push(ItemSet::closure([Item::new(0, 0)], grammar));
        automaton
    }

    /// Build the canonical collection of the grammar.
    pub fn build(grammar: &'g Grammar) -> Self {
        let mut automaton = Self::new(grammar);
        let mut queue = VecDeque::from_iter([0]);

        while let Some(from) = queue.pop_front() {
            let set = &automaton.sets[from];
            let targets = set
                .iter_symbols(grammar)
                .map(|symbol| (symbol.clone(), set.goto(symbol, grammar)))
                .filter(|(_, target)| !target.is_empty())
                .collect::<Vec<_>>();

            for (symbol, target) in targets {
                let to = match automaton.get_id(&target) {
                    Some(id) => id,
                    None => {
                        let id = automaton.push(target);
                        queue.push_back(id);
                        id
                    }
                };

                automaton.edges.push((from, symbol, to));
            }
        }

        debug!(
            "built LR(0) automaton: {} states, {} transitions",
            automaton.len(),
            automaton.edges.len()
        );

        automaton
    }

    /// Find a state by content.
    pub fn get_id(&self, set: &ItemSet) -> Option<StateId> {
        self.index.get(set).copied()
    }

    /// Push a new set in the automaton, if it does not yet exist.
    fn push(&mut self, set: ItemSet) -> StateId {
        if let Some(id) = self.get_id(&set) {
            return id;
        }

        let id = self.sets.len();
        debug!("state #{id}\n{}", set.display(self.grammar));
        self.index.insert(set.clone(), id);
        self.sets.push(set);
        id
    }

    /// The target of the transition from `from` on `symbol`.
    pub fn transition(&self, from: StateId, symbol: &str) -> Option<StateId> {
        self.edges
            .iter()
            .find(|(f, sym, _)| *f == from && sym.as_str() == symbol)
            .map(|(_, _, to)| *to)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemSet> {
        self.sets.iter()
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl std::fmt::Display for Automaton<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "States ({}):", self.len())?;
        for (id, set) in self.iter().enumerate() {
            writeln!(f, "I{id}:")?;
            writeln!(f, "{}", set.display(self.grammar))?;
        }
        Ok(())
    }
}
