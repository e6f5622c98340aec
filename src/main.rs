#![forbid(unsafe_code)]

//! fandash: live fan, temperature and power dashboard entry point.

use clap::Parser;
use colored::Colorize;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        eprintln!("{} {e}", "fandash:".red().bold());
        std::process::exit(e.exit_code());
    }
}
