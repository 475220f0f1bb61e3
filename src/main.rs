//! dupecache - incremental duplicate file finder.
//!
//! Entry point for the dupecache CLI.

use clap::Parser;
use dupecache::{cli::Cli, error::ExitCode, logging::init_logging, run_app};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    match run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            log::error!("{:#}", err);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    }
}
