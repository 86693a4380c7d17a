#![allow(clippy::cast_precision_loss)]

use calendar_csp::csp::format::{ParseError, parse_file, parse_str};
use calendar_csp::csp::solver::{SolutionStats, SolverConfig, SolverType};
use calendar_csp::{CspError, Problem, Schedule};
use clap::{ArgAction, Args, Parser, Subcommand};
use itertools::Itertools;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::{debug, warn};

/// Extension of problem files picked up when solving a directory.
pub(crate) const PROBLEM_EXTENSION: &str = "cal";

/// Defines the command-line interface for the calendar scheduler.
#[derive(Parser, Debug)]
#[command(
    name = "calsched",
    version,
    about = "Schedules meetings on calendar dates subject to date constraints"
)]
pub(crate) struct Cli {
    /// A problem file, or a directory of `.cal` files, to solve when no
    /// subcommand is given.
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute.
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a problem file.
    File {
        /// Path to the problem file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a problem given as text.
    Text {
        /// The problem in the `.cal` format. Lines may be separated by real
        /// newlines or by a literal `\n`,
        /// e.g. "p meetings 2 2024-03-01 2024-03-03\nb 0 < 1".
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug logging of the filters and the search.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check a found schedule against every constraint.
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) verify: bool,

    /// Print problem and search statistics after solving.
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) stats: bool,

    /// Print the schedule if one is found.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,

    /// The search strategy.
    #[arg(long, value_enum, default_value_t = SolverType::Backtracking)]
    pub(crate) solver: SolverType,

    /// Skip node consistency before searching.
    #[arg(long, default_value_t = false)]
    pub(crate) no_node_consistency: bool,

    /// Skip arc consistency before searching.
    #[arg(long, default_value_t = false)]
    pub(crate) no_arc_consistency: bool,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            debug: false,
            verify: true,
            stats: true,
            print_solution: false,
            solver: SolverType::default(),
            no_node_consistency: false,
            no_arc_consistency: false,
        }
    }
}

impl CommonOptions {
    /// The solver configuration selected by the filter flags.
    pub(crate) const fn config(&self) -> SolverConfig {
        SolverConfig {
            node_consistency: !self.no_node_consistency,
            arc_consistency: !self.no_arc_consistency,
        }
    }
}

/// Failures reported by the command-line front end.
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// A problem could not be read.
    #[error("{}: {source}", .label.display())]
    Parse {
        /// File name, or `<input>` for text input.
        label: PathBuf,
        /// The underlying error.
        #[source]
        source: ParseError,
    },

    /// The problem was read but is invalid.
    #[error(transparent)]
    Invalid(#[from] CspError),

    /// A path given for batch solving is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A schedule failed verification.
    #[error("schedule violates {} constraint(s): {}", .0.len(), .0.iter().join(", "))]
    VerificationFailed(Vec<String>),
}

/// Reads a problem file.
///
/// # Errors
///
/// [`CliError::Parse`] labelled with the path.
pub(crate) fn read_problem(path: &Path) -> Result<Problem, CliError> {
    parse_file(path).map_err(|source| CliError::Parse {
        label: path.to_path_buf(),
        source,
    })
}

/// Reads a problem from command-line text, accepting literal `\n` as a line
/// break.
///
/// # Errors
///
/// [`CliError::Parse`] labelled `<input>`.
pub(crate) fn read_text(input: &str) -> Result<Problem, CliError> {
    parse_str(&input.replace("\\n", "\n")).map_err(|source| CliError::Parse {
        label: PathBuf::from("<input>"),
        source,
    })
}

/// Solves every `.cal` file below `path`.
///
/// Files with other extensions are skipped. Stops at the first file that
/// fails to parse or verify.
///
/// # Errors
///
/// [`CliError::NotADirectory`] if `path` is not a directory, otherwise the
/// first error from [`solve_and_report`].
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), CliError> {
    if !path.is_dir() {
        return Err(CliError::NotADirectory(path.to_path_buf()));
    }

    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        if file_path
            .extension()
            .is_none_or(|ext| ext != PROBLEM_EXTENSION)
        {
            debug!(path = %file_path.display(), "skipping non-problem file");
            continue;
        }

        let time = Instant::now();
        let problem = read_problem(file_path)?;
        let parse_time = time.elapsed();

        solve_and_report(&problem, common, Some(file_path), parse_time)?;
    }

    Ok(())
}

/// Solves `path`, which may be a single file or a directory.
///
/// # Errors
///
/// See [`read_problem`], [`solve_dir`] and [`solve_and_report`].
pub(crate) fn solve_path(path: &Path, common: &CommonOptions) -> Result<(), CliError> {
    if path.is_dir() {
        return solve_dir(path, common);
    }

    let time = Instant::now();
    let problem = read_problem(path)?;
    let parse_time = time.elapsed();

    solve_and_report(&problem, common, Some(path), parse_time)
}

/// Checks `schedule` against every constraint of `problem`.
///
/// Returns `Ok(true)` for a valid schedule and `Ok(false)` when there is
/// nothing to check. Prints nothing.
///
/// # Errors
///
/// [`CliError::VerificationFailed`] listing the violated constraints.
pub(crate) fn verify_solution(problem: &Problem, schedule: Option<&Schedule>) -> Result<bool, CliError> {
    let Some(schedule) = schedule else {
        return Ok(false);
    };

    if problem.verify(schedule) {
        return Ok(true);
    }

    let violated = problem
        .violations(schedule)
        .into_iter()
        .map(ToString::to_string)
        .collect_vec();
    Err(CliError::VerificationFailed(violated))
}

/// Allocated and resident memory in MiB, if jemalloc statistics are
/// available.
pub(crate) fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::read().ok()?;
    let resident = stats::resident::read().ok()?;
    Some((to_mib(allocated), to_mib(resident)))
}

fn to_mib(bytes: usize) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Solves a problem and reports the result, with verification and
/// statistics as selected in `common`.
///
/// # Errors
///
/// [`CliError::Invalid`] if the problem fails validation, or
/// [`CliError::VerificationFailed`].
pub(crate) fn solve_and_report(
    problem: &Problem,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> Result<(), CliError> {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }
    debug!(%problem, "problem");

    let time = Instant::now();
    let (schedule, solver_stats) = problem.solve(common.solver, common.config())?;
    let elapsed = time.elapsed();

    let memory = memory_usage();
    if memory.is_none() {
        warn!("jemalloc statistics unavailable");
    }

    if common.verify && verify_solution(problem, schedule.as_ref())? {
        println!("Verified: true");
    }

    if common.stats {
        print_stats(
            parse_time,
            elapsed,
            problem,
            &solver_stats,
            memory.unwrap_or_default(),
        );
    }

    match schedule {
        Some(schedule) => {
            if common.print_solution {
                println!("{schedule}");
            }
            println!("\nSCHEDULED");
        }
        None => println!("\nNO SOLUTION"),
    }

    Ok(())
}

/// Prints a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Prints a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
///
/// The last argument is allocated and resident memory in MiB.
pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    problem: &Problem,
    s: &SolutionStats,
    (allocated, resident): (f64, f64),
) {
    let elapsed_secs = elapsed.as_secs_f64();
    let (unary, binary) = problem.arity_counts();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Meetings", problem.meetings());
    stat_line("Date range", problem.range());
    stat_line("Days in range", problem.range().days());
    stat_line("Unary constraints", unary);
    stat_line("Binary constraints", binary);

    println!("========================[ Search Statistics ]========================");
    stat_line("Pruned (node consistency)", s.node_pruned);
    stat_line("Pruned (arc consistency)", s.arc_pruned);
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line_with_rate("Backtracks", s.backtracks, elapsed_secs);
    stat_line("Max depth", s.max_depth);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}
