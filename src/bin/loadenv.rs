// src/bin/loadenv.rs

use clap::Parser;
use colored::Colorize;
use loadenv::{
    cli::{Cli, handlers},
    system::{executor, logging},
};

/// The main entry point of `loadenv`.
/// It sets up logging, parses arguments, runs the launch handler and turns
/// its outcome into this process's exit status.
fn main() {
    let cli = Cli::parse();
    logging::init(cli.debug);

    match handlers::launch::handle(&cli) {
        Ok(outcome) => executor::exit_with(outcome),
        Err(e) => {
            // --- Centralized Error Handling ---
            // Resolution errors are fatal: never run with a partial environment.
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}
