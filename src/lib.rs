#![warn(missing_docs)]
//! This crate schedules meetings on calendar dates subject to unary and
//! binary date constraints.
//!
//! Each meeting is a variable whose domain is a range of dates. A problem is
//! solved by pruning the domains with node and arc consistency and then
//! running a backtracking search over what is left.
//!
//! ```
//! use calendar_csp::{Constraint, Operator};
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
//!
//! let schedule = calendar_csp::solve(
//!     2,
//!     start,
//!     end,
//!     [
//!         Constraint::binary(0, Operator::Lt, 1),
//!         Constraint::unary(0, Operator::Ne, start),
//!     ],
//! )
//! .unwrap()
//! .expect("satisfiable");
//!
//! assert_eq!(schedule[0], start.succ_opt().unwrap());
//! ```

/// The `csp` module implements the calendar constraint satisfaction engine:
/// domains, constraints, consistency filters and the search strategies.
pub mod csp;

pub use csp::assignment::Schedule;
pub use csp::constraint::Constraint;
pub use csp::error::CspError;
pub use csp::operator::Operator;
pub use csp::problem::Problem;
pub use csp::solver::{SolutionStats, SolverConfig, SolverType};

use chrono::NaiveDate;

/// Schedules `meetings` meetings within `[start, end]` so that every
/// constraint holds.
///
/// Uses backtracking search with both consistency filters enabled. The result
/// is the first schedule in search order: meetings are assigned by ascending
/// index and each tries its dates in ascending order.
///
/// Returns `Ok(None)` when no schedule exists.
///
/// # Errors
///
/// [`CspError::InvalidRange`] if `start > end`, or
/// [`CspError::OutOfRangeReference`] if a constraint mentions a meeting
/// outside `0..meetings`.
pub fn solve(
    meetings: usize,
    start: NaiveDate,
    end: NaiveDate,
    constraints: impl IntoIterator<Item = Constraint>,
) -> Result<Option<Schedule>, CspError> {
    let problem = Problem::from_parts(meetings, start, end, constraints)?;
    let (schedule, _) = problem.solve(SolverType::Backtracking, SolverConfig::default())?;
    Ok(schedule)
}
