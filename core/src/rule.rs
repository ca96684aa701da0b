use itertools::Itertools;

use crate::{Symbol, EPSILON};

/// The rule's identifier in the grammar.
pub type RuleId = usize;

/// Defines a grammar rule, as read from a grammar source.
///
/// The grammar turns definitions into numbered [Rule]s.
/// X := A1..An
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDef {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl RuleDef {
    pub fn new<L, I, S>(lhs: L, rhs: I) -> Self
    where
        L: Into<Symbol>,
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
/// A grammar rule
///
/// # Example
/// (1) E -> E + T
pub struct Rule {
    pub id: RuleId,
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.lhs, self.rhs_to_string())
    }
}

impl Rule {
    /// The right-hand side joined by spaces, or `eps` when empty.
    pub fn rhs_to_string(&self) -> String {
        if self.rhs.is_empty() {
            EPSILON.to_owned()
        } else {
            self.rhs.iter().join(" ")
        }
    }

    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }
}

/// The ordered rules of an augmented grammar.
///
/// Rule #0 is always the augmented start rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet(Vec<Rule>);

impl FromIterator<Rule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl RuleSet {
    /// Iterate over all rules of the grammar
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }

    /// Iterate the rules producing a specific non-terminal symbol.
    pub fn iter_by_symbol<'a>(&'a self, sym: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.iter().filter(move |rule| rule.lhs.as_str() == sym)
    }

    /// # Panics
    /// Panics if the rule does not exist.
    pub fn borrow_rule(&self, id: RuleId) -> &Rule {
        &self.0[id]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
