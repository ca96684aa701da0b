use std::{io::Write, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use log::info;
use lrzero_core::{
    lr::{ConflictPolicy, Naive, Strict},
    Automaton, Grammar, LrParser, LrResult, LrTable,
};

use crate::report::{self, Report};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Build the LR(0) tables of a grammar and trace the parse of an input
pub struct Options {
    /// Grammar file, one `LHS -> alt1 | alt2` group per line
    pub grammar: PathBuf,

    /// Input tokens, separated by whitespace
    pub tokens: Vec<String>,

    /// Reject grammars with conflicts instead of resolving them
    #[arg(long)]
    pub strict: bool,

    /// Only build and print the tables
    #[arg(long)]
    pub tables_only: bool,

    /// Only print the parse trace
    #[arg(short, long)]
    pub quiet: bool,
}

impl Options {
    /// The input, re-split on whitespace.
    pub fn input(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .flat_map(|arg| arg.split_whitespace())
            .collect()
    }
}

fn build_table(automaton: &Automaton<'_>, strict: bool) -> LrResult<LrTable> {
    fn with<P: ConflictPolicy>(automaton: &Automaton<'_>, policy: P) -> LrResult<LrTable> {
        LrTable::from_automaton(automaton, &policy)
    }

    if strict {
        with(automaton, Strict)
    } else {
        with(automaton, Naive)
    }
}

/// Run the whole pipeline, writing the report to `out`.
///
/// A rejected input is an error, reported after its trace.
pub fn run<W: Write>(options: &Options, out: &mut W) -> anyhow::Result<()> {
    let grammar = Grammar::from_file(&options.grammar)
        .with_context(|| format!("reading grammar {}", options.grammar.display()))?;

    let automaton = Automaton::build(&grammar);
    let table = build_table(&automaton, options.strict).context("building LR(0) tables")?;

    info!(
        "{} rules, {} states, {} conflicts resolved",
        grammar.rules().len(),
        automaton.len(),
        table.conflicts().len()
    );

    if !options.quiet {
        Report {
            grammar: &grammar,
            automaton: &automaton,
            table: &table,
        }
        .write(out)?;
    }

    if options.tables_only {
        return Ok(());
    }

    let input = options.input();
    let parse = LrParser::new(&grammar, &table).parse(input.iter().copied());
    report::write_trace(out, &input, &parse)?;

    parse.into_result().context("parsing input")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::Options;

    #[test]
    fn test_tokens_are_resplit() {
        let options = Options::try_parse_from(["lrzero", "g.txt", "id + id", "*", "id"]).unwrap();
        assert_eq!(options.input(), vec!["id", "+", "id", "*", "id"]);
        assert!(!options.strict);
    }

    #[test]
    fn test_flags() {
        let options =
            Options::try_parse_from(["lrzero", "--strict", "--tables-only", "g.txt"]).unwrap();
        assert!(options.strict);
        assert!(options.tables_only);
        assert!(options.input().is_empty());
    }

    #[test]
    fn test_grammar_is_required() {
        assert!(Options::try_parse_from(["lrzero"]).is_err());
    }
}
