use std::collections::HashSet;

use log::debug;

use crate::{ErrorKind, Grammar, LrError, LrResult, EOS};

mod action;
mod graph;
mod policy;
mod table;
mod trace;
mod transition;

pub use action::*;
pub use graph::*;
pub use policy::{resolve, Conflict, ConflictKind, Naive, Strict};
pub use table::*;
pub use trace::*;
use transition::*;

pub use self::policy::traits::ConflictPolicy;

/// A state of the automaton, and a row of the tables.
pub type StateId = usize;

/// A shift-reduce parser driven by LR tables.
///
/// The stack only holds states: the symbols of a reduction are read back
/// from the grammar.
pub struct LrParser<'g, 'table, Table>
where
    Table: self::traits::LrTable,
{
    grammar: &'g Grammar,
    table: &'table Table,
}

impl<'g, 'table, Table> LrParser<'g, 'table, Table>
where
    Table: self::traits::LrTable,
{
    pub fn new(grammar: &'g Grammar, table: &'table Table) -> Self {
        Self { grammar, table }
    }

    /// Parse the tokens, `$` is appended to the input.
    ///
    /// The trace is returned whatever the verdict.
    pub fn parse<'i, I>(&self, input: I) -> Parse
    where
        I: IntoIterator<Item = &'i str>,
    {
        let tokens = input
            .into_iter()
            .chain(std::iter::once(EOS))
            .collect::<Vec<_>>();

        let mut trace = Trace::default();
        let result = self.run(&tokens, &mut trace);

        Parse { trace, result }
    }

    fn run(&self, tokens: &[&str], trace: &mut Trace) -> LrResult<()> {
        let mut states: Vec<StateId> = vec![0];
        let mut cursor = 0;
        let mut guard = CycleGuard::default();

        loop {
            let state = states.last().copied().unwrap_or_default();
            let token = tokens.get(cursor).copied().unwrap_or(EOS);

            let Some(action) = self
                .table
                .action(state, token)
                .copied()
                .filter(|_| cursor < tokens.len())
            else {
                trace.push(TraceEvent::Error {
                    state,
                    token: token.to_owned(),
                });

                return Err(LrError::new(
                    ErrorKind::UnexpectedToken {
                        state,
                        token: token.to_owned(),
                        position: cursor,
                        expecting: self.table.iter_terminals(state).collect(),
                    },
                    None,
                ));
            };

            debug!("#{} {} :: {}", state, token, action);

            match action {
                // Push the target state, consume the token.
                Action::Shift(next_state_id) => {
                    states.push(next_state_id);
                    cursor += 1;
                    guard.shifted(&states);

                    trace.push(TraceEvent::Shift {
                        token: token.to_owned(),
                        state: next_state_id,
                    });
                }

                // Reduce by the given rule
                // Pop one state per RHS symbol, then goto on the LHS.
                Action::Reduce(rule_id) => {
                    let rule = self.grammar.rule(rule_id);
                    let missing_goto = |state| {
                        LrError::from(ErrorKind::MissingGoto {
                            state,
                            symbol: rule.lhs.clone(),
                        })
                    };

                    if states.len() <= rule.len() {
                        return Err(missing_goto(state));
                    }

                    states.truncate(states.len() - rule.len());
                    let top = states.last().copied().unwrap_or_default();
                    let goto = self
                        .table
                        .goto(top, &rule.lhs)
                        .ok_or_else(|| missing_goto(top))?;

                    states.push(goto);

                    trace.push(TraceEvent::Reduce {
                        rule: rule_id,
                        lhs: rule.lhs.clone(),
                        rhs: rule.rhs.clone(),
                        goto,
                    });

                    if guard.reduced(&states) {
                        trace.push(TraceEvent::Error {
                            state: goto,
                            token: token.to_owned(),
                        });

                        return Err(ErrorKind::ReductionCycle {
                            state: goto,
                            symbol: rule.lhs.clone(),
                        }
                        .into());
                    }
                }

                Action::Accept => {
                    trace.push(TraceEvent::Accept);
                    return Ok(());
                }
            }
        }
    }
}

/// Detects reductions that can never reach the next shift.
///
/// Between two shifts the lookahead is fixed, so the moves only depend on
/// the stack. The parse loops forever once a stack comes back, or once a
/// state pushed since the last shift is pushed again above itself.
#[derive(Default)]
struct CycleGuard {
    seen: HashSet<Vec<StateId>>,
    /// Stack entries from this index were pushed since the last shift.
    fresh_from: usize,
}

impl CycleGuard {
    fn shifted(&mut self, states: &[StateId]) {
        self.seen.clear();
        self.seen.insert(states.to_vec());
        self.fresh_from = states.len().saturating_sub(1);
    }

    /// Record the stack after a reduction, true if the parse is looping.
    fn reduced(&mut self, states: &[StateId]) -> bool {
        let Some((&top, below)) = states.split_last() else {
            return false;
        };

        self.fresh_from = self.fresh_from.min(below.len());
        let grows = below[self.fresh_from..].contains(&top);
        let repeats = !self.seen.insert(states.to_vec());

        grows || repeats
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        fixtures::{expr_grammar, lr0_grammar},
        lr::{traits, Action, LrParser, LrTable, Naive, StateId, TraceEvent},
        ErrorKind, Grammar, Symbol,
    };

    /// A hand-written table without any GOTO entry.
    struct NoGotoTable(Vec<(StateId, &'static str, Action)>);

    impl traits::LrTable for NoGotoTable {
        fn action(&self, state: StateId, symbol: &str) -> Option<&Action> {
            self.0
                .iter()
                .find(|(from, sym, _)| *from == state && *sym == symbol)
                .map(|(_, _, action)| action)
        }

        fn goto(&self, _state: StateId, _symbol: &str) -> Option<StateId> {
            None
        }

        fn iter_terminals<'a>(&'a self, state: StateId) -> impl Iterator<Item = &'a str> + 'a {
            self.0
                .iter()
                .filter(move |(from, _, _)| *from == state)
                .map(|(_, sym, _)| *sym)
        }

        fn len(&self) -> usize {
            2
        }
    }

    fn shift(token: &str, state: usize) -> TraceEvent {
        TraceEvent::Shift {
            token: token.to_owned(),
            state,
        }
    }

    fn reduce(rule: usize, lhs: &str, rhs: &[&str], goto: usize) -> TraceEvent {
        TraceEvent::Reduce {
            rule,
            lhs: Symbol::from(lhs),
            rhs: rhs.iter().copied().map(Symbol::from).collect(),
            goto,
        }
    }

    #[test]
    pub fn test_lr0_grammar_table_building() {
        let _ = env_logger::builder().is_test(true).try_init();
        let table = LrTable::build(&lr0_grammar(), &Naive).expect("cannot build table");
        println!("{}", table);
    }

    #[test]
    pub fn test_expression_trace() {
        let grammar = expr_grammar();
        let table = LrTable::build(&grammar, &Naive).expect("cannot build table");
        let parser = LrParser::new(&grammar, &table);

        let parse = parser.parse("id + id".split_whitespace());

        assert!(parse.is_accepted());
        assert_eq!(
            parse.trace.as_ref(),
            &[
                shift("id", 3),
                reduce(3, "T", &["id"], 2),
                reduce(2, "E", &["T"], 1),
                shift("+", 4),
                shift("id", 3),
                reduce(3, "T", &["id"], 5),
                reduce(1, "E", &["E", "+", "T"], 1),
                TraceEvent::Accept,
            ]
        );
    }

    #[test]
    pub fn test_expression_rejection() {
        let grammar = expr_grammar();
        let table = LrTable::build(&grammar, &Naive).expect("cannot build table");
        let parser = LrParser::new(&grammar, &table);

        let parse = parser.parse(["id", "id"]);

        assert!(!parse.is_accepted());
        assert_eq!(
            parse.trace.last(),
            Some(&TraceEvent::Error {
                state: 1,
                token: "id".to_owned()
            })
        );

        match parse.error().map(|err| err.kind()) {
            Some(ErrorKind::UnexpectedToken {
                state,
                token,
                position,
                expecting,
            }) => {
                assert_eq!(*state, 1);
                assert_eq!(token, "id");
                assert_eq!(*position, 1);
                assert_eq!(expecting.iter().collect::<Vec<_>>(), vec!["$", "+"]);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    pub fn test_unknown_token() {
        let grammar = expr_grammar();
        let table = LrTable::build(&grammar, &Naive).unwrap();
        let parse = LrParser::new(&grammar, &table).parse(["id", "*", "id"]);

        assert!(matches!(
            parse.error().map(|err| err.kind()),
            Some(ErrorKind::UnexpectedToken { position: 1, .. })
        ));
    }

    #[test]
    pub fn test_empty_input() {
        let grammar = expr_grammar();
        let table = LrTable::build(&grammar, &Naive).unwrap();
        let parse = LrParser::new(&grammar, &table).parse([]);

        assert_eq!(
            parse.trace.as_ref(),
            &[TraceEvent::Error {
                state: 0,
                token: "$".to_owned()
            }]
        );
    }

    #[test]
    pub fn test_lr0_parser() {
        let grammar = lr0_grammar();
        let table = LrTable::build(&grammar, &Naive).expect("cannot build table");
        let parser = LrParser::new(&grammar, &table);

        let trace = parser
            .parse("1 + 1 * 0 * 1 * 1".split_whitespace())
            .into_result()
            .unwrap();

        let shifts = trace
            .iter()
            .filter(|event| matches!(event, TraceEvent::Shift { .. }))
            .count();
        assert_eq!(shifts, 9);
        assert_eq!(trace.last(), Some(&TraceEvent::Accept));
    }

    #[test]
    pub fn test_epsilon_rule() {
        let grammar: Grammar = "S -> A b\nA -> eps".parse().unwrap();
        let table = LrTable::build(&grammar, &Naive).unwrap();
        let parse = LrParser::new(&grammar, &table).parse(["b"]);

        assert!(parse.is_accepted());
        assert_eq!(
            parse.trace.iter().next(),
            Some(&reduce(2, "A", &[], 1))
        );
    }

    #[test]
    pub fn test_balanced_parentheses() {
        let grammar: Grammar = "S -> ( S ) | x".parse().unwrap();
        let table = LrTable::build(&grammar, &Naive).unwrap();
        let parser = LrParser::new(&grammar, &table);

        assert!(parser.parse("( ( x ) )".split_whitespace()).is_accepted());
        assert!(!parser.parse("( ( x )".split_whitespace()).is_accepted());
    }

    #[test]
    pub fn test_missing_goto_after_reduce() {
        let grammar = expr_grammar();
        let table = NoGotoTable(vec![
            (0, "id", Action::Shift(1)),
            (1, "$", Action::Reduce(3)),
        ]);

        let parse = LrParser::new(&grammar, &table).parse(["id"]);

        assert_eq!(parse.trace.as_ref(), &[shift("id", 1)]);
        assert!(matches!(
            parse.error().map(|err| err.kind()),
            Some(ErrorKind::MissingGoto { state: 0, symbol }) if symbol.as_str() == "T"
        ));
    }

    #[test]
    pub fn test_missing_goto_on_short_stack() {
        let grammar = expr_grammar();
        let table = NoGotoTable(vec![(0, "id", Action::Reduce(1))]);

        let parse = LrParser::new(&grammar, &table).parse(["id"]);

        assert!(parse.trace.is_empty());
        assert!(matches!(
            parse.error().map(|err| err.kind()),
            Some(ErrorKind::MissingGoto { state: 0, symbol }) if symbol.as_str() == "E"
        ));
    }

    #[test]
    pub fn test_unit_cycle_terminates() {
        let grammar: Grammar = "S -> S | x".parse().unwrap();
        let table = LrTable::build(&grammar, &Naive).unwrap();

        let parse = LrParser::new(&grammar, &table).parse(["x", "x"]);

        assert_eq!(
            parse.trace.as_ref(),
            &[
                shift("x", 2),
                reduce(2, "S", &["x"], 1),
                reduce(1, "S", &["S"], 1),
                TraceEvent::Error {
                    state: 1,
                    token: "x".to_owned()
                },
            ]
        );
        assert!(matches!(
            parse.error().map(|err| err.kind()),
            Some(ErrorKind::ReductionCycle { state: 1, symbol }) if symbol.as_str() == "S"
        ));
    }

    #[test]
    pub fn test_epsilon_cycle_terminates() {
        let grammar: Grammar = "S -> A S | x\nA -> eps".parse().unwrap();
        let table = LrTable::build(&grammar, &Naive).unwrap();

        let parse = LrParser::new(&grammar, &table).parse([]);

        assert_eq!(
            parse.trace.as_ref(),
            &[
                reduce(3, "A", &[], 1),
                reduce(3, "A", &[], 1),
                TraceEvent::Error {
                    state: 1,
                    token: "$".to_owned()
                },
            ]
        );
        assert!(matches!(
            parse.error().map(|err| err.kind()),
            Some(ErrorKind::ReductionCycle { state: 1, symbol }) if symbol.as_str() == "A"
        ));

        // The shift of `x` wins over the empty reduction.
        assert!(LrParser::new(&grammar, &table).parse(["x"]).is_accepted());
    }
}
