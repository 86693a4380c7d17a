#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Unary and binary date constraints.
//!
//! Constraints refer to meetings by index. They never own the meetings'
//! domains; the index is only meaningful relative to a [`Problem`].
//!
//! [`Problem`]: crate::csp::problem::Problem

use crate::csp::assignment::Assignment;
use crate::csp::operator::Operator;
use chrono::NaiveDate;
use smallvec::{SmallVec, smallvec};
use std::fmt::{self, Display, Formatter};

/// Meeting indices referenced by a constraint, left first.
pub type Scope = SmallVec<[usize; 2]>;

/// A constraint on the dates of one or two meetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// `meeting OP date`.
    Unary {
        /// The constrained meeting.
        meeting: usize,
        /// The comparison.
        op: Operator,
        /// The literal date on the right-hand side.
        date: NaiveDate,
    },
    /// `left OP right`, comparing the dates of two meetings.
    Binary {
        /// The meeting on the left-hand side.
        left: usize,
        /// The comparison.
        op: Operator,
        /// The meeting on the right-hand side.
        right: usize,
    },
}

impl Constraint {
    /// Shorthand for [`Constraint::Unary`].
    #[must_use]
    pub const fn unary(meeting: usize, op: Operator, date: NaiveDate) -> Self {
        Self::Unary { meeting, op, date }
    }

    /// Shorthand for [`Constraint::Binary`].
    #[must_use]
    pub const fn binary(left: usize, op: Operator, right: usize) -> Self {
        Self::Binary { left, op, right }
    }

    /// Number of meetings the constraint references (1 or 2).
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::Unary { .. } => 1,
            Self::Binary { .. } => 2,
        }
    }

    /// Referenced meetings, left first.
    #[must_use]
    pub fn scope(&self) -> Scope {
        match *self {
            Self::Unary { meeting, .. } => smallvec![meeting],
            Self::Binary { left, right, .. } => smallvec![left, right],
        }
    }

    /// Evaluates the constraint against a partial assignment.
    ///
    /// Returns `None` while any referenced meeting is still unassigned.
    #[must_use]
    pub fn evaluate(&self, assignment: &Assignment) -> Option<bool> {
        match *self {
            Self::Unary { meeting, op, date } => {
                let value = assignment.value(meeting)?;
                Some(op.compare(&value, &date))
            }
            Self::Binary { left, op, right } => {
                let l = assignment.value(left)?;
                let r = assignment.value(right)?;
                Some(op.compare(&l, &r))
            }
        }
    }

    /// Whether a complete, index-aligned list of dates satisfies the
    /// constraint.
    ///
    /// # Panics
    ///
    /// If a referenced meeting is out of bounds for `dates`.
    #[must_use]
    pub fn is_satisfied_by(&self, dates: &[NaiveDate]) -> bool {
        match *self {
            Self::Unary { meeting, op, date } => op.compare(&dates[meeting], &date),
            Self::Binary { left, op, right } => op.compare(&dates[left], &dates[right]),
        }
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unary { meeting, op, date } => write!(f, "m{meeting} {op} {date}"),
            Self::Binary { left, op, right } => write!(f, "m{left} {op} m{right}"),
        }
    }
}
