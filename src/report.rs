//! Human-readable report of a run.
use std::io::{self, Write};

use itertools::Itertools;
use lrzero_core::{lr::Parse, Automaton, Grammar, LrTable, EOS};

/// `  0: E' -> E`, one line per rule.
pub fn write_productions<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    writeln!(out, "Grammar productions:")?;
    for rule in grammar.rules().iter() {
        writeln!(out, "  {}: {}", rule.id, rule)?;
    }
    writeln!(out)
}

pub fn write_states<W: Write>(out: &mut W, automaton: &Automaton<'_>) -> io::Result<()> {
    write!(out, "{automaton}")
}

pub fn write_table<W: Write>(out: &mut W, table: &LrTable) -> io::Result<()> {
    writeln!(out, "ACTION / GOTO table:")?;
    writeln!(out, "{table}")?;

    if table.has_conflicts() {
        writeln!(out, "Conflicts resolved ({}):", table.conflicts().len())?;
        for conflict in table.conflicts() {
            writeln!(out, "  {conflict}")?;
        }
        writeln!(out)?;
    }

    Ok(())
}

pub fn write_trace<W: Write>(out: &mut W, tokens: &[&str], parse: &Parse) -> io::Result<()> {
    writeln!(
        out,
        "Parsing input: {}\n",
        tokens.iter().copied().chain([EOS]).join(" ")
    )?;
    write!(out, "{}", parse.trace)
}

/// The construction report: productions, states and tables.
pub struct Report<'a> {
    pub grammar: &'a Grammar,
    pub automaton: &'a Automaton<'a>,
    pub table: &'a LrTable,
}

impl Report<'_> {
    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_productions(out, self.grammar)?;
        write_states(out, self.automaton)?;
        write_table(out, self.table)
    }
}
