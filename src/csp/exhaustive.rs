#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Generate-and-test over the raw date range.
//!
//! Every combination of dates is enumerated, meeting 0 varying slowest and
//! dates ascending, and the first combination satisfying all constraints is
//! returned. No filtering is done. This visits the same order as
//! [`Backtracking`] and therefore returns the same schedule, which makes it
//! a reference for testing the faster solver on small problems.
//!
//! [`Backtracking`]: crate::csp::backtracking::Backtracking

use crate::csp::assignment::Schedule;
use crate::csp::problem::Problem;
use crate::csp::solver::{SolutionStats, Solver, SolverConfig};
use chrono::NaiveDate;
use itertools::Itertools;

/// Enumerates every complete assignment.
///
/// The work grows as `days ^ meetings`; only use it on tiny problems.
#[derive(Debug, Clone)]
pub struct Exhaustive {
    problem: Problem,
    stats: SolutionStats,
}

impl Solver for Exhaustive {
    fn new(problem: &Problem, _config: SolverConfig) -> Self {
        Self {
            problem: problem.clone(),
            stats: SolutionStats::default(),
        }
    }

    fn solve(&mut self) -> Option<Schedule> {
        self.stats = SolutionStats::default();

        let meetings = self.problem.meetings();
        if meetings == 0 {
            return self
                .problem
                .verify(&[])
                .then(Schedule::default);
        }
        self.stats.max_depth = meetings;

        let days: Vec<NaiveDate> = self.problem.range().iter().collect();
        for dates in (0..meetings)
            .map(|_| days.iter().copied())
            .multi_cartesian_product()
        {
            self.stats.decisions += 1;
            if self
                .problem
                .constraints()
                .iter()
                .all(|c| c.is_satisfied_by(&dates))
            {
                return Some(Schedule::new(dates));
            }
            self.stats.conflicts += 1;
        }

        None
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::constraint::Constraint;
    use crate::csp::operator::Operator;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_enumeration_order() {
        let problem =
            Problem::from_parts(2, day(1), day(3), [Constraint::binary(0, Operator::Gt, 1)]).unwrap();
        let mut solver = Exhaustive::new(&problem, SolverConfig::default());

        assert_eq!(
            solver.solve().map(Schedule::into_inner),
            Some(vec![day(2), day(1)])
        );
        // (1,1) (1,2) (1,3) fail, (2,1) succeeds.
        assert_eq!(solver.stats().decisions, 4);
        assert_eq!(solver.stats().conflicts, 3);
    }

    #[test]
    fn test_exhausts_all_combinations() {
        let problem = Problem::from_parts(
            3,
            day(1),
            day(2),
            [
                Constraint::binary(0, Operator::Lt, 1),
                Constraint::binary(1, Operator::Lt, 2),
            ],
        )
        .unwrap();
        let mut solver = Exhaustive::new(&problem, SolverConfig::default());

        assert_eq!(solver.solve(), None);
        assert_eq!(solver.stats().decisions, 8);
    }

    #[test]
    fn test_no_meetings() {
        let problem = Problem::from_parts(0, day(1), day(1), []).unwrap();
        let mut solver = Exhaustive::new(&problem, SolverConfig::default());
        assert_eq!(solver.solve(), Some(Schedule::default()));
    }
}
