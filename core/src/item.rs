use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;

use crate::{Grammar, RuleId, Symbol};

/// A rule item.
///
/// The position is the number of right-hand side symbols already matched.
///
/// # Example
/// E -> E • + T
///
/// Items order by rule, then position; that order is the canonical order
/// of an [ItemSet].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub rule: RuleId,
    pub position: usize,
}

impl Item {
    pub fn new(rule: RuleId, position: usize) -> Self {
        Self { rule, position }
    }

    /// Returns the symbol after the dot.
    /// If A -> w •, then returns None.
    pub fn symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        grammar.rule(self.rule).rhs.get(self.position)
    }

    /// Check if we reached the end of a rule.
    ///
    /// # Example
    /// A -> w •
    pub fn is_exhausted(&self, grammar: &Grammar) -> bool {
        self.position >= grammar.rule(self.rule).len()
    }

    /// The augmented start rule is exhausted: S' -> S •
    pub fn is_accepting(&self, grammar: &Grammar) -> bool {
        self.rule == 0 && self.is_exhausted(grammar)
    }

    /// Returns the item with the dot moved one symbol right.
    ///
    /// Returns None, if the current rule is exhausted.
    pub fn next(&self, grammar: &Grammar) -> Option<Self> {
        (!self.is_exhausted(grammar)).then(|| Self::new(self.rule, self.position + 1))
    }

    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> ItemDisplay<'a> {
        ItemDisplay {
            item: self,
            grammar,
        }
    }
}

/// Renders an item as `[1] E -> E . + T`.
pub struct ItemDisplay<'a> {
    item: &'a Item,
    grammar: &'a Grammar,
}

impl std::fmt::Display for ItemDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rule = self.grammar.rule(self.item.rule);
        let rhs = rule
            .rhs
            .iter()
            .map(Symbol::as_str)
            .enumerate()
            .flat_map(|(pos, sym)| {
                (pos == self.item.position)
                    .then_some(".")
                    .into_iter()
                    .chain([sym])
            })
            .chain(self.item.is_exhausted(self.grammar).then_some("."))
            .join(" ");

        write!(f, "[{}] {} -> {}", rule.id, rule.lhs, rhs)
    }
}

/// A closed set of items, kept in canonical order.
///
/// Two sets are equal when they hold the same items, whatever the way
/// they were built.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ItemSet(Vec<Item>);

impl ItemSet {
    /// Close the items
    ///
    /// For every item A -> α • B β, the items B -> • γ are added until no
    /// item is left to expand.
    pub fn closure<I>(items: I, grammar: &Grammar) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        let mut set = HashSet::<Item>::default();
        let mut stack = Vec::default();

        for item in items {
            if set.insert(item) {
                stack.push(item);
            }
        }

        while let Some(item) = stack.pop() {
            let Some(sym) = item.symbol(grammar) else {
                continue;
            };

            if !grammar.is_non_terminal(sym) {
                continue;
            }

            for rule in grammar.rules().iter_by_symbol(sym) {
                let item = Item::new(rule.id, 0);
                if set.insert(item) {
                    stack.push(item);
                }
            }
        }

        Self(set.into_iter().sorted().collect())
    }

    /// The set reached after moving past `symbol`.
    ///
    /// An empty set means there is no such transition.
    pub fn goto(&self, symbol: &str, grammar: &Grammar) -> Self {
        Self::closure(
            self.iter()
                .filter(|item| item.symbol(grammar).is_some_and(|sym| sym.as_str() == symbol))
                .flat_map(|item| item.next(grammar)),
            grammar,
        )
    }

    /// The distinct symbols found after a dot, in ascending order.
    pub fn iter_symbols<'g>(&self, grammar: &'g Grammar) -> impl Iterator<Item = &'g Symbol> {
        self.iter()
            .flat_map(|item| item.symbol(grammar))
            .collect::<BTreeSet<_>>()
            .into_iter()
    }

    /// Iterate over all exhausted items (A -> w •)
    pub fn iter_exhausted_items<'a>(
        &'a self,
        grammar: &'a Grammar,
    ) -> impl Iterator<Item = &'a Item> + 'a {
        self.iter().filter(|item| item.is_exhausted(grammar))
    }

    /// Returns true if S' -> S • is in the set.
    pub fn is_accepting(&self, grammar: &Grammar) -> bool {
        self.iter().any(|item| item.is_accepting(grammar))
    }

    /// Iterate over all items within the set.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.0.iter()
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.0.binary_search(item).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> ItemSetDisplay<'a> {
        ItemSetDisplay { set: self, grammar }
    }
}

/// Renders a set with one item per line.
pub struct ItemSetDisplay<'a> {
    set: &'a ItemSet,
    grammar: &'a Grammar,
}

impl std::fmt::Display for ItemSetDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for item in self.set.iter() {
            writeln!(f, "  {}", item.display(self.grammar))?;
        }
        Ok(())
    }
}
