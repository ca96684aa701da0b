use std::collections::BTreeSet;

use log::debug;

use crate::{ErrorKind, LrResult, Rule, RuleDef, RuleId, RuleSet, Symbol, SymbolSet};

#[derive(Debug, Clone, PartialEq, Eq)]
/// An augmented grammar
///
/// Rule #0 is the synthetic start rule `S' -> S`, where `S` is the start
/// symbol of the source grammar and `S'` a fresh non-terminal.
///
/// # Example
///
/// For the following grammar :
///
/// ```grammar
/// E -> E + T | T
/// T -> id
/// ```
///
/// the augmented rules are :
///
/// ```grammar
/// 0. E' -> E
/// 1. E -> E + T
/// 2. E -> T
/// 3. T -> id
/// ```
pub struct Grammar {
    rules: RuleSet,
    symbols: SymbolSet,
    start: Symbol,
}

impl Grammar {
    /// Augment the rules, using the first left-hand side as start symbol.
    pub fn new<I>(defs: I) -> LrResult<Self>
    where
        I: IntoIterator<Item = RuleDef>,
    {
        let defs = defs.into_iter().collect::<Vec<_>>();
        let start = defs
            .first()
            .map(|def| def.lhs.clone())
            .ok_or(ErrorKind::EmptyGrammar)?;

        Self::with_start(defs, start)
    }

    /// Augment the rules with the given start symbol.
    pub fn with_start<I>(defs: I, start: impl Into<Symbol>) -> LrResult<Self>
    where
        I: IntoIterator<Item = RuleDef>,
    {
        let defs = defs.into_iter().collect::<Vec<_>>();
        let start = start.into();

        if defs.is_empty() {
            return Err(ErrorKind::EmptyGrammar.into());
        }

        let mut symbols = SymbolSet::default();
        symbols
            .non_terminals
            .extend(defs.iter().map(|def| def.lhs.clone()));

        if !symbols.is_non_terminal(&start) {
            return Err(ErrorKind::UnknownStart(start).into());
        }

        let terminals = defs
            .iter()
            .flat_map(|def| def.rhs.iter())
            .filter(|sym| !symbols.is_non_terminal(sym))
            .cloned()
            .collect::<BTreeSet<_>>();
        symbols.terminals = terminals;
        symbols.terminals.insert(Symbol::eos());

        let augmented = fresh_symbol(&start, &symbols);
        symbols.non_terminals.insert(augmented.clone());

        let rules = std::iter::once(RuleDef {
            lhs: augmented,
            rhs: vec![start.clone()],
        })
        .chain(defs)
        .enumerate()
        .map(|(id, def)| Rule {
            id,
            lhs: def.lhs,
            rhs: def.rhs,
        })
        .collect::<RuleSet>();

        debug!(
            "augmented grammar: {} rules, {} terminals, {} non-terminals",
            rules.len(),
            symbols.terminals.len(),
            symbols.non_terminals.len()
        );

        Ok(Self {
            rules,
            symbols,
            start,
        })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// # Panics
    /// Panics if the rule does not exist.
    pub fn rule(&self, id: RuleId) -> &Rule {
        self.rules.borrow_rule(id)
    }

    /// The start symbol of the source grammar.
    pub fn start(&self) -> &Symbol {
        &self.start
    }

    /// The synthetic start symbol, left-hand side of rule #0.
    pub fn augmented_start(&self) -> &Symbol {
        &self.rules.borrow_rule(0).lhs
    }

    pub fn is_terminal(&self, symbol: &str) -> bool {
        self.symbols.is_terminal(symbol)
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.symbols.is_non_terminal(symbol)
    }
}

/// Mint `start'`, adding quotes until the name is free.
fn fresh_symbol(start: &Symbol, symbols: &SymbolSet) -> Symbol {
    let mut candidate = format!("{start}'");

    while symbols.contains(&candidate) {
        candidate.push('\'');
    }

    Symbol::from(candidate)
}
