use std::process::ExitCode;

use clap::Parser as _;
use lrzero::cli::{self, Options};

fn main() -> ExitCode {
    env_logger::init();
    let options = Options::parse();

    let stdout = std::io::stdout();
    match cli::run(&options, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
