use log::debug;
use prettytable::Table as PtTable;
use std::collections::BTreeMap;

use crate::{Grammar, LrResult, Symbol, SymbolSet, EOS};

use super::{
    policy::traits::ConflictPolicy, Action, Automaton, Conflict, StateId, Transition,
};

pub mod traits {
    use crate::lr::{Action, StateId};

    pub trait LrTable {
        fn action(&self, state: StateId, symbol: &str) -> Option<&Action>;
        fn goto(&self, state: StateId, symbol: &str) -> Option<StateId>;

        /// The terminals having an action in the state, in ascending order.
        fn iter_terminals<'a>(&'a self, state: StateId) -> impl Iterator<Item = &'a str> + 'a;

        /// The number of rows in the table.
        fn len(&self) -> usize;
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Row {
    actions: BTreeMap<Symbol, Action>,
    goto: BTreeMap<Symbol, StateId>,
}

impl Row {
    pub fn action(&self, symbol: &str) -> Option<&Action> {
        self.actions.get(symbol)
    }

    pub fn goto(&self, symbol: &str) -> Option<StateId> {
        self.goto.get(symbol).copied()
    }

    pub fn iter_terminals(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(Symbol::as_str)
    }
}

/// Builds one row, routing every colliding proposal through the policy.
struct RowBuilder<'p, P: ConflictPolicy> {
    state: StateId,
    row: Row,
    policy: &'p P,
    conflicts: Vec<Conflict>,
}

impl<'p, P: ConflictPolicy> RowBuilder<'p, P> {
    fn new(state: StateId, policy: &'p P) -> Self {
        Self {
            state,
            row: Row::default(),
            policy,
            conflicts: vec![],
        }
    }

    fn propose(&mut self, symbol: &Symbol, proposed: Action) -> LrResult<()> {
        match self.row.actions.get(symbol).copied() {
            None => {
                self.row.actions.insert(symbol.clone(), proposed);
            }
            Some(existing) if existing == proposed => {}
            Some(existing) => {
                let conflict = Conflict::new(self.state, symbol.clone(), existing, proposed);
                let action = self.policy.resolve(&conflict)?;
                self.row.actions.insert(symbol.clone(), action);
                self.conflicts.push(conflict);
            }
        }

        Ok(())
    }

    /// Shifts and gotos come from the transitions, reduces and accept from
    /// the exhausted items.
    fn build(
        mut self,
        transition: Transition<'_>,
        grammar: &Grammar,
    ) -> LrResult<(Row, Vec<Conflict>)> {
        for (sym, to) in transition.edges.iter().copied() {
            if grammar.is_terminal(sym) {
                self.propose(sym, Action::Shift(to))?;
            } else {
                self.row.goto.insert(sym.clone(), to);
            }
        }

        for item in transition.from.iter_exhausted_items(grammar) {
            if item.is_accepting(grammar) {
                self.propose(&Symbol::eos(), Action::Accept)?;
            } else {
                // LR(0): reduce whatever the lookahead.
                for sym in grammar.symbols().iter_terminals() {
                    self.propose(sym, Action::Reduce(item.rule))?;
                }
            }
        }

        debug!(
            "row #{}: {} actions, {} gotos",
            transition.id,
            self.row.actions.len(),
            self.row.goto.len()
        );

        Ok((self.row, self.conflicts))
    }
}

/// The ACTION and GOTO tables.
#[derive(PartialEq)]
pub struct LrTable {
    /// Column headers.
    symbols: SymbolSet,
    /// The table rows, one per state.
    rows: Vec<Row>,
    /// The conflicts met, and resolved, while building the rows.
    conflicts: Vec<Conflict>,
}

impl std::fmt::Debug for LrTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

impl std::fmt::Display for LrTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = PtTable::new();

        table.add_row(
            ["#"]
                .into_iter()
                .chain(self.symbols.iter().map(Symbol::as_str))
                .collect(),
        );

        for (id, row) in self.iter().enumerate() {
            table.add_row(
                [id.to_string()]
                    .into_iter()
                    .chain(self.symbols.iter_terminals().map(|sym| {
                        row.actions
                            .get(sym)
                            .map(ToString::to_string)
                            .unwrap_or_default()
                    }))
                    .chain(self.symbols.iter_non_terminals().map(|sym| {
                        row.goto
                            .get(sym)
                            .map(ToString::to_string)
                            .unwrap_or_default()
                    }))
                    .collect(),
            );
        }

        write!(f, "{}", table)
    }
}

impl traits::LrTable for LrTable {
    fn action(&self, state: StateId, symbol: &str) -> Option<&Action> {
        self.rows.get(state).and_then(|row| row.action(symbol))
    }

    fn goto(&self, state: StateId, symbol: &str) -> Option<StateId> {
        self.rows.get(state).and_then(|row| row.goto(symbol))
    }

    fn iter_terminals<'a>(&'a self, state: StateId) -> impl Iterator<Item = &'a str> + 'a {
        self.rows.get(state).into_iter().flat_map(Row::iter_terminals)
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

impl LrTable {
    fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Derive the tables from the automaton.
    pub fn from_automaton<P>(automaton: &Automaton<'_>, policy: &P) -> LrResult<Self>
    where
        P: ConflictPolicy,
    {
        let grammar = automaton.grammar();
        let mut rows = Vec::with_capacity(automaton.len());
        let mut conflicts = Vec::default();

        for transition in automaton.iter_transitions() {
            let (row, row_conflicts) =
                RowBuilder::new(transition.id, policy).build(transition, grammar)?;
            rows.push(row);
            conflicts.extend(row_conflicts);
        }

        Ok(Self {
            symbols: grammar.symbols().clone(),
            rows,
            conflicts,
        })
    }

    /// Build the LR(0) tables of a grammar.
    pub fn build<P>(grammar: &Grammar, policy: &P) -> LrResult<Self>
    where
        P: ConflictPolicy,
    {
        Self::from_automaton(&Automaton::build(grammar), policy)
    }

    /// The conflicts the policy resolved.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Does the state accept on end of input ?
    pub fn is_accepting(&self, state: StateId) -> bool {
        matches!(
            traits::LrTable::action(self, state, EOS),
            Some(Action::Accept)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{traits::LrTable as _, LrTable};
    use crate::{
        fixtures::{expr_grammar, lr0_grammar},
        lr::{Action, Automaton, ConflictKind, Naive, Strict},
        ErrorKind, Grammar, Item,
    };

    #[test]
    fn test_expression_table() {
        let grammar = expr_grammar();
        let table = LrTable::build(&grammar, &Naive).unwrap();

        assert_eq!(table.len(), 6);
        assert_eq!(table.action(0, "id"), Some(&Action::Shift(3)));
        assert_eq!(table.action(0, "+"), None);
        assert_eq!(table.goto(0, "E"), Some(1));
        assert_eq!(table.goto(0, "T"), Some(2));
        assert_eq!(table.action(1, "$"), Some(&Action::Accept));
        assert_eq!(table.action(1, "+"), Some(&Action::Shift(4)));
        assert_eq!(table.action(1, "id"), None);
        assert_eq!(table.goto(4, "T"), Some(5));
        assert_eq!(table.goto(4, "E"), None);

        for sym in ["$", "+", "id"] {
            assert_eq!(table.action(2, sym), Some(&Action::Reduce(2)));
            assert_eq!(table.action(3, sym), Some(&Action::Reduce(3)));
            assert_eq!(table.action(5, sym), Some(&Action::Reduce(1)));
        }

        assert!(!table.has_conflicts());
    }

    #[test]
    fn test_exhausted_items_fill_every_terminal() {
        let grammar = lr0_grammar();
        let automaton = Automaton::build(&grammar);
        let table = LrTable::from_automaton(&automaton, &Naive).unwrap();

        for (state, set) in automaton.iter().enumerate() {
            for item in set.iter_exhausted_items(&grammar) {
                if item.is_accepting(&grammar) {
                    assert!(table.is_accepting(state));
                } else {
                    for sym in grammar.symbols().iter_terminals() {
                        assert!(table.action(state, sym).is_some());
                    }
                }
            }
        }
    }

    #[test]
    fn test_accept_only_where_start_rule_is_exhausted() {
        let grammar = expr_grammar();
        let automaton = Automaton::build(&grammar);
        let table = LrTable::from_automaton(&automaton, &Naive).unwrap();

        for (state, set) in automaton.iter().enumerate() {
            assert_eq!(table.is_accepting(state), set.contains(&Item::new(0, 1)));
        }
    }

    #[test]
    fn test_shift_reduce_conflict_keeps_shift() {
        // E -> T • and E -> T • + E share a state.
        let grammar: Grammar = "E -> T + E | T\nT -> x".parse().unwrap();
        let table = LrTable::build(&grammar, &Naive).unwrap();

        let state = table.goto(0, "T").unwrap();
        assert!(matches!(table.action(state, "+"), Some(Action::Shift(_))));
        assert_eq!(table.action(state, "$"), Some(&Action::Reduce(2)));

        assert!(table
            .conflicts()
            .iter()
            .any(|c| c.state == state && c.kind() == ConflictKind::ShiftReduce));
    }

    #[test]
    fn test_reduce_reduce_conflict_keeps_smaller_rule() {
        let grammar: Grammar = "S -> A | B\nA -> x\nB -> x".parse().unwrap();
        let table = LrTable::build(&grammar, &Naive).unwrap();

        let state = table.action(0, "x").copied();
        let Some(Action::Shift(state)) = state else {
            panic!("expected a shift on x, got {state:?}");
        };

        for sym in ["$", "x"] {
            assert_eq!(table.action(state, sym), Some(&Action::Reduce(3)));
        }
        assert!(table
            .conflicts()
            .iter()
            .all(|c| c.kind() == ConflictKind::ReduceReduce));
    }

    #[test]
    fn test_strict_policy_rejects_conflicts() {
        let grammar: Grammar = "S -> A | B\nA -> x\nB -> x".parse().unwrap();
        let err = LrTable::build(&grammar, &Strict).unwrap_err();

        assert!(matches!(
            err.kind(),
            ErrorKind::Conflict(conflict) if conflict.kind() == ConflictKind::ReduceReduce
        ));
    }

    #[test]
    fn test_strict_policy_accepts_lr0_grammar() {
        let grammar = expr_grammar();
        let strict = LrTable::build(&grammar, &Strict).unwrap();
        let naive = LrTable::build(&grammar, &Naive).unwrap();

        assert_eq!(strict, naive);
    }

    #[test]
    fn test_table_display() {
        let table = LrTable::build(&expr_grammar(), &Naive).unwrap();
        let rendered = table.to_string();

        assert!(rendered.contains("acc"));
        assert!(rendered.contains("s4"));
        assert!(rendered.contains("r3"));
        assert_eq!(rendered.matches("acc").count(), 1);
    }
}
