use std::{borrow::Borrow, collections::BTreeSet, ops::Deref};

/// The end-of-input terminal.
pub const EOS: &str = "$";

/// The token standing for an empty right-hand side in grammar sources.
pub const EPSILON: &str = "eps";

/// A grammar symbol.
///
/// Symbols are opaque names; whether a symbol is a terminal is decided by
/// the [SymbolSet] of the grammar it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn eos() -> Self {
        Self::new(EOS)
    }

    pub fn is_eos(&self) -> bool {
        self.0 == EOS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Symbol {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The terminal and non-terminal symbols of a grammar.
///
/// Both sets iterate in ascending name order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    pub(crate) terminals: BTreeSet<Symbol>,
    pub(crate) non_terminals: BTreeSet<Symbol>,
}

impl SymbolSet {
    pub fn is_terminal(&self, symbol: &str) -> bool {
        self.terminals.contains(symbol)
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.non_terminals.contains(symbol)
    }

    pub fn iter_terminals(&self) -> impl Iterator<Item = &Symbol> {
        self.terminals.iter()
    }

    pub fn iter_non_terminals(&self) -> impl Iterator<Item = &Symbol> {
        self.non_terminals.iter()
    }

    /// Iterate over all symbols, terminals first.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.iter_terminals().chain(self.iter_non_terminals())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.is_terminal(symbol) || self.is_non_terminal(symbol)
    }
}
