// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

mod artifact;
mod check;
mod cmd;
mod config;
mod error;
mod extract;
mod generator;
mod init_sql;
mod literal;
mod ordering;
mod process;
mod report;
mod sanitizer;
mod scaffold;
mod seeder;
mod sync;
mod writer;

use clap::Parser;
use cmd::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = cmd::run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for `--json` and completions.
/// `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "tusk=debug,warn" } else { "tusk=info,warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
