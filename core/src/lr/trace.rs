use itertools::Itertools;

use crate::{LrError, LrResult, RuleId, Symbol, EPSILON};

use super::StateId;

/// A move of the shift-reduce parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Shift {
        token: String,
        state: StateId,
    },
    Reduce {
        rule: RuleId,
        lhs: Symbol,
        rhs: Vec<Symbol>,
        /// The state pushed after the reduction.
        goto: StateId,
    },
    Accept,
    Error {
        state: StateId,
        token: String,
    },
}

impl std::fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceEvent::Shift { token, state } => write!(f, "shift '{token}' -> state {state}"),
            TraceEvent::Reduce {
                rule,
                lhs,
                rhs,
                goto,
            } => {
                let rhs = if rhs.is_empty() {
                    EPSILON.to_owned()
                } else {
                    rhs.iter().join(" ")
                };
                write!(f, "reduce by {rule}: {lhs} -> {rhs}\ngoto state {goto}")
            }
            TraceEvent::Accept => write!(f, "Input accepted (ACCEPT)"),
            TraceEvent::Error { state, token } => {
                write!(f, "Parse error at token '{token}' (state {state})")
            }
        }
    }
}

/// The moves of a parse, in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Trace(Vec<TraceEvent>);

impl Trace {
    pub(super) fn push(&mut self, event: TraceEvent) {
        self.0.push(event)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraceEvent> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&TraceEvent> {
        self.0.last()
    }
}

impl AsRef<[TraceEvent]> for Trace {
    fn as_ref(&self) -> &[TraceEvent] {
        &self.0
    }
}

impl std::fmt::Display for Trace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in self.iter() {
            writeln!(f, "{event}")?;
        }
        Ok(())
    }
}

/// The outcome of a parse: the trace, complete or up to the failure, and
/// the verdict.
#[derive(Debug)]
pub struct Parse {
    pub trace: Trace,
    pub result: LrResult<()>,
}

impl Parse {
    pub fn is_accepted(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&LrError> {
        self.result.as_ref().err()
    }

    pub fn into_result(self) -> LrResult<Trace> {
        self.result.map(|_| self.trace)
    }
}
