mod cli;

use clap::Parser;
use cli::Cli;
use proposer::common::consts::EXIT_SYSTEM_ERROR;

fn main() {
    match Cli::parse().run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:?}");
            std::process::exit(EXIT_SYSTEM_ERROR);
        }
    }
}
