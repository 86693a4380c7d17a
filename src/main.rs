//! # calsched
//!
//! `calsched` schedules meetings on calendar dates. A problem names how many
//! meetings there are, the range of dates they may take, and a list of unary
//! (`meeting OP date`) and binary (`meeting OP meeting`) constraints. The
//! solver prunes each meeting's candidate dates with node and arc
//! consistency and then searches for the first schedule that satisfies
//! every constraint.
//!
//! ## Problem files
//!
//! ```text
//! c three meetings in the first week of March
//! p meetings 3 2024-03-01 2024-03-07
//! u 0 >= 2024-03-04
//! b 0 < 1
//! b 2 != 1
//! ```
//!
//! Operators are `==`, `!=`, `<`, `<=`, `>` and `>=`.
//!
//! ## Usage
//!
//! ```sh
//! # Solve a single file, or every .cal file in a directory
//! calsched week.cal
//! calsched problems/
//!
//! # Solve a file with the reference solver and print the schedule
//! calsched file --path week.cal --solver exhaustive --print-solution
//!
//! # Solve a problem given inline
//! calsched text --input "p meetings 2 2024-03-01 2024-03-03\nb 0 < 1"
//!
//! # Debug logging of the filters and search (RUST_LOG is honoured too)
//! calsched week.cal --debug
//!
//! # Shell completions
//! calsched completions zsh
//! ```
//!
//! Common options: `--debug`, `--verify <bool>` (default `true`),
//! `--stats <bool>` (default `true`), `--print-solution`,
//! `--solver backtracking|exhaustive`, `--no-node-consistency` and
//! `--no-arc-consistency`.
//!
//! The exit status is 1 when a problem cannot be read, is invalid, or a
//! schedule fails verification. A problem without a solution is not an
//! error.

use crate::command_line::cli::{
    Cli, CliError, Commands, CommonOptions, read_text, solve_and_report, solve_path,
};
use clap::{CommandFactory, Parser};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

mod command_line {
    pub(crate) mod cli;
}

/// Global allocator using `tikv-jemallocator`, which also provides the memory
/// statistics printed after solving.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Installs the log subscriber. `--debug` forces debug output for this crate;
/// otherwise `RUST_LOG` decides, defaulting to warnings only.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("calendar_csp=debug,calsched=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Some(Commands::File { path, common }) => solve_path(&path, &common),
        Some(Commands::Text { input, common }) => {
            let time = Instant::now();
            let problem = read_text(&input)?;
            let parse_time = time.elapsed();

            solve_and_report(&problem, &common, None, parse_time)
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        None => match cli.path {
            Some(path) => solve_path(&path, &cli.common),
            None => {
                eprintln!("No command provided. Use --help for more information.");
                std::process::exit(1);
            }
        },
    }
}

fn common_options(cli: &Cli) -> &CommonOptions {
    match &cli.command {
        Some(Commands::File { common, .. } | Commands::Text { common, .. }) => common,
        _ => &cli.common,
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(common_options(&cli).debug);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
