//! Grammar source reader.
//!
//! The format is line based:
//!
//! ```grammar
//! # expressions
//! E -> E + T | T
//! T -> id
//! A -> eps
//! ```
//!
//! The first left-hand side is the start symbol, `eps` stands for an empty
//! alternative and `#` starts a comment.
use std::{path::Path, str::FromStr};

use log::debug;

use crate::{
    span::{Cursor, NextColumn, NextLine},
    ErrorKind, Grammar, LrError, LrResult, RuleDef, Span, Symbol, EPSILON,
};

const ARROW: &str = "->";
const COMMENT: char = '#';
const ALTERNATIVE: char = '|';

/// Read the rule definitions of a grammar source.
pub fn read_rules(source: &str) -> LrResult<Vec<RuleDef>> {
    let mut cursor = Cursor::default();
    let mut defs = Vec::default();

    for raw in source.lines() {
        let line = raw.split(COMMENT).next().unwrap_or_default();
        let trimmed = line.trim();

        if !trimmed.is_empty() {
            let span = Span::from(cursor) + NextColumn(line.chars().count());
            defs.extend(read_line(trimmed, span)?);
        }

        cursor += NextLine;
    }

    debug!("read {} rule definitions", defs.len());
    Ok(defs)
}

/// Read a production group: `LHS -> alt1 | alt2 | ...`
fn read_line(line: &str, span: Span) -> LrResult<Vec<RuleDef>> {
    let (lhs, rest) = line
        .split_once(ARROW)
        .ok_or_else(|| LrError::new(ErrorKind::GrammarFormat(line.to_owned()), Some(span)))?;

    let lhs = lhs.trim();
    if lhs.is_empty() {
        return Err(LrError::new(ErrorKind::EmptyLhs(line.to_owned()), Some(span)));
    }

    Ok(rest
        .split(ALTERNATIVE)
        .map(|alt| RuleDef {
            lhs: Symbol::from(lhs),
            rhs: alt
                .split_whitespace()
                .filter(|tok| *tok != EPSILON)
                .map(Symbol::from)
                .collect(),
        })
        .collect())
}

impl FromStr for Grammar {
    type Err = LrError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Grammar::new(read_rules(source)?)
    }
}

impl Grammar {
    /// Read and augment a grammar file.
    pub fn from_file(path: impl AsRef<Path>) -> LrResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ErrorKind::Io {
            path: path.display().to_string(),
            source,
        })?;

        source.parse()
    }
}
