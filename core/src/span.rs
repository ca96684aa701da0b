use std::ops::Add;

/// A position in a grammar source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Add<NextLine> for Cursor {
    type Output = Self;

    fn add(mut self, rhs: NextLine) -> Self::Output {
        self += rhs;
        self
    }
}

impl Add<NextColumn> for Cursor {
    type Output = Self;

    fn add(mut self, rhs: NextColumn) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::AddAssign<NextLine> for Cursor {
    fn add_assign(&mut self, _: NextLine) {
        self.column = 0;
        self.line += 1;
    }
}

impl std::ops::AddAssign<NextColumn> for Cursor {
    fn add_assign(&mut self, rhs: NextColumn) {
        self.column += rhs.0;
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
/// The location of a fragment in the grammar source.
pub struct Span {
    pub from: Cursor,
    pub to: Cursor,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}-{}", self.from, self.to)
        }
    }
}

impl From<Cursor> for Span {
    fn from(value: Cursor) -> Self {
        Self {
            from: value,
            to: value,
        }
    }
}

impl Add<NextColumn> for Span {
    type Output = Span;

    fn add(self, rhs: NextColumn) -> Self::Output {
        Self {
            from: self.from,
            to: self.to + rhs,
        }
    }
}

pub struct NextLine;

/// Advance by a number of columns.
pub struct NextColumn(pub usize);
