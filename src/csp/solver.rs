#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The solver interface shared by the search strategies.
//!
//! A [`Solver`] is built from a validated [`Problem`] and a [`SolverConfig`],
//! and reports either the first [`Schedule`] it finds or `None` when the
//! problem has no solution. [`Problem::solve`] is the usual entry point: it
//! validates the problem, picks the strategy named by a [`SolverType`] and
//! returns the result together with the [`SolutionStats`].

use crate::csp::assignment::Schedule;
use crate::csp::backtracking::Backtracking;
use crate::csp::error::CspError;
use crate::csp::exhaustive::Exhaustive;
use crate::csp::problem::Problem;
use clap::ValueEnum;
use std::fmt::{self, Display, Formatter};
use tracing::debug;

/// Counters collected while solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    /// Dates removed by node consistency.
    pub node_pruned: usize,
    /// Dates removed by arc consistency.
    pub arc_pruned: usize,
    /// Tentative assignments tried.
    pub decisions: usize,
    /// Tentative assignments rejected because a constraint failed.
    pub conflicts: usize,
    /// Tentative assignments undone.
    pub backtracks: usize,
    /// Deepest level of the search tree reached.
    pub max_depth: usize,
}

/// Switches for the preprocessing filters.
///
/// Turning a filter off never changes the schedule that is found, only how
/// much work the search has to do to find it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Run node consistency before searching.
    pub node_consistency: bool,
    /// Run arc consistency before searching.
    pub arc_consistency: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            node_consistency: true,
            arc_consistency: true,
        }
    }
}

/// A search strategy for calendar problems.
pub trait Solver {
    /// Prepares a solver for `problem`.
    ///
    /// The problem must already be validated; an out-of-range meeting index
    /// panics.
    fn new(problem: &Problem, config: SolverConfig) -> Self
    where
        Self: Sized;

    /// Runs the search from scratch.
    ///
    /// Returns the first schedule in search order, or `None` if none exists.
    /// Calling `solve` again on the same solver repeats the same search and
    /// returns the same result.
    fn solve(&mut self) -> Option<Schedule>;

    /// Statistics of the most recent [`Solver::solve`] call.
    fn stats(&self) -> SolutionStats;
}

/// The available search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum SolverType {
    /// Node and arc consistency followed by backtracking search.
    #[default]
    Backtracking,
    /// Generate-and-test over every combination of dates.
    Exhaustive,
}

impl Display for SolverType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backtracking => write!(f, "backtracking"),
            Self::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

impl SolverType {
    /// Builds the strategy for `problem`.
    #[must_use]
    pub fn to_impl(self, problem: &Problem, config: SolverConfig) -> SolverImpls {
        match self {
            Self::Backtracking => SolverImpls::Backtracking(Box::new(Backtracking::new(problem, config))),
            Self::Exhaustive => SolverImpls::Exhaustive(Box::new(Exhaustive::new(problem, config))),
        }
    }
}

/// A solver chosen at run time.
#[derive(Debug, Clone)]
pub enum SolverImpls {
    /// See [`Backtracking`].
    Backtracking(Box<Backtracking>),
    /// See [`Exhaustive`].
    Exhaustive(Box<Exhaustive>),
}

impl SolverImpls {
    /// Runs the wrapped solver.
    pub fn solve(&mut self) -> Option<Schedule> {
        match self {
            Self::Backtracking(s) => s.solve(),
            Self::Exhaustive(s) => s.solve(),
        }
    }

    /// Statistics of the wrapped solver.
    #[must_use]
    pub fn stats(&self) -> SolutionStats {
        match self {
            Self::Backtracking(s) => s.stats(),
            Self::Exhaustive(s) => s.stats(),
        }
    }
}

impl Problem {
    /// Validates the problem and solves it with `solver`.
    ///
    /// # Errors
    ///
    /// [`CspError::OutOfRangeReference`] if a constraint mentions a meeting
    /// that does not exist. "No solution" is not an error; it is `Ok` with
    /// `None` as the schedule.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(meetings = self.meetings(), constraints = self.constraints().len(), %solver)
    )]
    pub fn solve(
        &self,
        solver: SolverType,
        config: SolverConfig,
    ) -> Result<(Option<Schedule>, SolutionStats), CspError> {
        self.validate()?;

        let mut solver = solver.to_impl(self, config);
        let schedule = solver.solve();
        let stats = solver.stats();

        debug!(found = schedule.is_some(), ?stats, "search finished");
        Ok((schedule, stats))
    }
}
