use itertools::Itertools as _;
use thiserror::Error;

use crate::{lr::Conflict, Span, Symbol};

/// The terminals the parser could have handled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedSymbols(Vec<String>);

impl ExpectedSymbols {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: ToString> FromIterator<S> for ExpectedSymbols {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(|s| s.to_string()).collect())
    }
}

impl std::fmt::Display for ExpectedSymbols {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(", "))
    }
}

#[derive(Error, Debug)]
pub enum ErrorKind {
    #[error("invalid production (missing ->): {0}")]
    GrammarFormat(String),

    #[error("invalid production (empty left-hand side): {0}")]
    EmptyLhs(String),

    #[error("the grammar has no productions")]
    EmptyGrammar,

    #[error("the start symbol {0} is not the left-hand side of any production")]
    UnknownStart(Symbol),

    #[error("could not open grammar file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Conflict(Conflict),

    #[error("no GOTO for state {state} and nonterminal {symbol}")]
    MissingGoto { state: usize, symbol: Symbol },

    #[error("reductions to {symbol} loop in state {state} without consuming input")]
    ReductionCycle { state: usize, symbol: Symbol },

    #[error("parse error at token '{token}' (state {state}), expecting {expecting}")]
    UnexpectedToken {
        state: usize,
        token: String,
        /// Index of the offending token in the input.
        position: usize,
        expecting: ExpectedSymbols,
    },
}

#[derive(Error, Debug)]
pub struct LrError {
    /// Kind of error
    kind: ErrorKind,
    /// Location of the error in the grammar source.
    pub(crate) span: Option<Span>,
}

impl std::fmt::Display for LrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.span {
            Some(span) => write!(f, "line {}: {}", span.from.line, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl LrError {
    pub fn new(kind: impl Into<ErrorKind>, span: Option<Span>) -> Self {
        Self {
            kind: kind.into(),
            span,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }
}

impl From<ErrorKind> for LrError {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, span: None }
    }
}

impl From<Conflict> for ErrorKind {
    fn from(conflict: Conflict) -> Self {
        Self::Conflict(conflict)
    }
}
