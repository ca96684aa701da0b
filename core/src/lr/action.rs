use crate::RuleId;

use super::StateId;

/// An ACTION table entry.
///
/// An absent entry is a parse error.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Action {
    Shift(StateId),
    Reduce(RuleId),
    Accept,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(to) => write!(f, "s{}", to),
            Action::Reduce(to) => write!(f, "r{}", to),
            Action::Accept => write!(f, "acc"),
        }
    }
}
