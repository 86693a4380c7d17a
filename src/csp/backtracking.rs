#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Backtracking search over filtered domains.
//!
//! The search assigns meetings in ascending index order and tries each
//! meeting's candidates in ascending date order. After every tentative
//! assignment it checks the constraints that mention the new meeting and
//! whose other side is already assigned; a failing check rejects the date
//! without descending. The first complete assignment is returned unchanged,
//! so the result is the lexicographically smallest solution.
//!
//! The search is a loop over the depth, which is also the index of the
//! meeting being assigned. Each level keeps a cursor into its candidate list;
//! stepping back a level undoes that level's date and resumes from its
//! cursor. Stack use does not grow with the number of meetings.

use crate::csp::assignment::{Assignment, Schedule};
use crate::csp::consistency::{arc_consistency, node_consistency};
use crate::csp::domain::Domain;
use crate::csp::problem::Problem;
use crate::csp::solver::{SolutionStats, Solver, SolverConfig};
use crate::csp::watch::WatchList;
use chrono::NaiveDate;
use tracing::{debug, trace};

/// Node consistency, arc consistency and backtracking, in that order.
#[derive(Debug, Clone)]
pub struct Backtracking {
    /// The problem being solved.
    pub problem: Problem,
    /// Which filters run before the search.
    pub config: SolverConfig,
    /// Candidate dates per meeting, as left by the filters.
    pub domains: Vec<Domain>,
    /// Constraint indices per meeting.
    pub watches: WatchList,
    /// The partial assignment under construction.
    pub assignment: Assignment,
    stats: SolutionStats,
}

impl Solver for Backtracking {
    fn new(problem: &Problem, config: SolverConfig) -> Self {
        Self {
            problem: problem.clone(),
            config,
            domains: problem.initial_domains(),
            watches: WatchList::new(problem.meetings(), problem.constraints()),
            assignment: Assignment::new(problem.meetings()),
            stats: SolutionStats::default(),
        }
    }

    fn solve(&mut self) -> Option<Schedule> {
        self.reset();
        self.preprocess();

        if let Some(meeting) = self.domains.iter().position(Domain::is_empty) {
            debug!(meeting, "domain wiped out before search");
            return None;
        }

        if self.search() {
            self.assignment.to_schedule()
        } else {
            None
        }
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

impl Backtracking {
    fn reset(&mut self) {
        self.domains = self.problem.initial_domains();
        self.assignment = Assignment::new(self.problem.meetings());
        self.stats = SolutionStats::default();
    }

    /// Runs the enabled filters over the domains.
    pub fn preprocess(&mut self) {
        let constraints = self.problem.constraints();

        if self.config.node_consistency {
            self.stats.node_pruned = node_consistency(&mut self.domains, constraints);
            debug!(
                pruned = self.stats.node_pruned,
                sizes = ?self.domain_sizes(),
                "node consistency"
            );
        }

        if self.config.arc_consistency {
            self.stats.arc_pruned = arc_consistency(&mut self.domains, constraints);
            debug!(
                pruned = self.stats.arc_pruned,
                sizes = ?self.domain_sizes(),
                "arc consistency"
            );
        }
    }

    fn domain_sizes(&self) -> Vec<usize> {
        self.domains.iter().map(Domain::len).collect()
    }

    /// Whether every constraint on `meeting` that can be evaluated holds.
    ///
    /// Constraints whose other meeting is still unassigned are skipped.
    #[must_use]
    pub fn is_consistent(&self, meeting: usize) -> bool {
        let constraints = self.problem.constraints();
        self.watches[meeting]
            .iter()
            .all(|&i| constraints[i].evaluate(&self.assignment) != Some(false))
    }

    fn search(&mut self) -> bool {
        let meetings = self.assignment.len();
        if meetings == 0 {
            return true;
        }

        // Domains are fixed once search starts.
        let candidates: Vec<Vec<NaiveDate>> =
            self.domains.iter().map(|d| d.iter().collect()).collect();
        let mut cursors = vec![0; meetings];
        let mut depth = 0;
        self.stats.max_depth = 1;

        loop {
            let Some(&date) = candidates[depth].get(cursors[depth]) else {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
                self.assignment.unassign(depth);
                self.stats.backtracks += 1;
                continue;
            };
            cursors[depth] += 1;

            self.assignment.assign(depth, date);
            self.stats.decisions += 1;

            if self.is_consistent(depth) {
                trace!(meeting = depth, %date, "assigned");
                if depth + 1 == meetings {
                    return true;
                }
                depth += 1;
                cursors[depth] = 0;
                self.stats.max_depth = self.stats.max_depth.max(depth + 1);
            } else {
                trace!(meeting = depth, %date, "rejected");
                self.stats.conflicts += 1;
                self.assignment.unassign(depth);
                self.stats.backtracks += 1;
            }
        }
    }
}
