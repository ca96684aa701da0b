pub mod error;
pub mod grammar;
pub mod item;
pub mod lr;
pub mod reader;
pub mod rule;
pub mod span;
pub mod symbol;

pub use error::{ErrorKind, ExpectedSymbols, LrError};
pub use grammar::Grammar;
pub use item::{Item, ItemSet};
pub use rule::*;
pub use span::Span;
pub use symbol::*;

pub use lr::{Automaton, LrParser, LrTable};

pub mod traits {
    pub use crate::lr::traits::LrTable;
    pub use crate::lr::ConflictPolicy;
}

pub type LrResult<T> = Result<T, LrError>;
