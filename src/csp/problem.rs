#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The problem definition: how many meetings, which dates they may take and
//! which constraints they must satisfy.

use crate::csp::constraint::Constraint;
use crate::csp::domain::{DateRange, Domain};
use crate::csp::error::CspError;
use crate::csp::operator::Operator;
use chrono::NaiveDate;

/// A calendar scheduling problem.
///
/// Every meeting shares the same initial [`DateRange`]. Constraints are kept
/// in insertion order, which is also the order the consistency filters visit
/// them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    meetings: usize,
    range: DateRange,
    constraints: Vec<Constraint>,
}

impl Problem {
    /// A problem with `meetings` meetings over `range` and no constraints.
    #[must_use]
    pub const fn new(meetings: usize, range: DateRange) -> Self {
        Self {
            meetings,
            range,
            constraints: Vec::new(),
        }
    }

    /// Builds and validates a problem in one step.
    ///
    /// # Errors
    ///
    /// [`CspError::InvalidRange`] if `start > end`, or
    /// [`CspError::OutOfRangeReference`] if a constraint mentions a meeting
    /// outside `0..meetings`.
    pub fn from_parts(
        meetings: usize,
        start: NaiveDate,
        end: NaiveDate,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Result<Self, CspError> {
        let mut problem = Self::new(meetings, DateRange::new(start, end)?);
        problem.constraints.extend(constraints);
        problem.validate()?;
        Ok(problem)
    }

    /// Number of meetings.
    #[must_use]
    pub const fn meetings(&self) -> usize {
        self.meetings
    }

    /// The shared initial date range.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        self.range
    }

    /// Constraints in insertion order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Appends a constraint.
    ///
    /// The meeting indices are checked by [`Problem::validate`], not here, so
    /// constraints can be added before the meeting count is final.
    pub fn add_constraint(&mut self, constraint: Constraint) -> &mut Self {
        self.constraints.push(constraint);
        self
    }

    /// Appends `meeting OP date`.
    pub fn add_unary(&mut self, meeting: usize, op: Operator, date: NaiveDate) -> &mut Self {
        self.add_constraint(Constraint::unary(meeting, op, date))
    }

    /// Appends `left OP right`.
    pub fn add_binary(&mut self, left: usize, op: Operator, right: usize) -> &mut Self {
        self.add_constraint(Constraint::binary(left, op, right))
    }

    /// Checks that every constraint refers to an existing meeting.
    ///
    /// # Errors
    ///
    /// [`CspError::OutOfRangeReference`] for the first offending index.
    pub fn validate(&self) -> Result<(), CspError> {
        self.constraints
            .iter()
            .flat_map(Constraint::scope)
            .find(|&index| index >= self.meetings)
            .map_or(Ok(()), |index| {
                Err(CspError::OutOfRangeReference {
                    index,
                    meetings: self.meetings,
                })
            })
    }

    /// Fresh full-range domains, one per meeting.
    #[must_use]
    pub fn initial_domains(&self) -> Vec<Domain> {
        vec![Domain::new(self.range); self.meetings]
    }

    /// Constraints not satisfied by `dates`.
    ///
    /// A list of the wrong length violates nothing it cannot index; callers
    /// should use [`Problem::verify`], which also checks the length.
    #[must_use]
    pub fn violations<'a>(&'a self, dates: &'a [NaiveDate]) -> Vec<&'a Constraint> {
        self.constraints
            .iter()
            .filter(|c| c.scope().iter().all(|&m| m < dates.len()))
            .filter(|c| !c.is_satisfied_by(dates))
            .collect()
    }

    /// Whether `dates` is a valid answer: one date per meeting, every date
    /// inside the range and every constraint satisfied.
    #[must_use]
    pub fn verify(&self, dates: &[NaiveDate]) -> bool {
        dates.len() == self.meetings
            && dates.iter().all(|&d| self.range.contains(d))
            && self.violations(dates).is_empty()
    }

    /// Counts of unary and binary constraints.
    #[must_use]
    pub fn arity_counts(&self) -> (usize, usize) {
        let unary = self.constraints.iter().filter(|c| c.arity() == 1).count();
        (unary, self.constraints.len() - unary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    #[test]
    fn test_builder() {
        let mut problem = Problem::new(3, DateRange::new(day(1), day(5)).unwrap());
        problem
            .add_unary(0, Operator::Ge, day(2))
            .add_binary(0, Operator::Lt, 2)
            .add_binary(1, Operator::Ne, 2);

        assert_eq!(problem.meetings(), 3);
        assert_eq!(problem.constraints().len(), 3);
        assert_eq!(problem.arity_counts(), (1, 2));
        assert!(problem.validate().is_ok());

        let domains = problem.initial_domains();
        assert_eq!(domains.len(), 3);
        assert!(domains.iter().all(|d| d.len() == 5));
    }

    #[test]
    fn test_validate_out_of_range_reference() {
        let result = Problem::from_parts(
            2,
            day(1),
            day(2),
            [
                Constraint::binary(0, Operator::Lt, 1),
                Constraint::binary(1, Operator::Lt, 2),
            ],
        );
        assert_eq!(
            result,
            Err(CspError::OutOfRangeReference {
                index: 2,
                meetings: 2
            })
        );

        let result = Problem::from_parts(0, day(1), day(2), [Constraint::unary(0, Operator::Eq, day(1))]);
        assert_eq!(
            result,
            Err(CspError::OutOfRangeReference {
                index: 0,
                meetings: 0
            })
        );
    }

    #[test]
    fn test_from_parts_invalid_range() {
        assert_eq!(
            Problem::from_parts(1, day(3), day(2), []),
            Err(CspError::InvalidRange {
                start: day(3),
                end: day(2)
            })
        );
    }

    #[test]
    fn test_verify() {
        let problem = Problem::from_parts(
            2,
            day(1),
            day(3),
            [
                Constraint::binary(0, Operator::Lt, 1),
                Constraint::unary(1, Operator::Ne, day(3)),
            ],
        )
        .unwrap();

        assert!(problem.verify(&[day(1), day(2)]));
        assert!(!problem.verify(&[day(2), day(2)]));
        assert!(!problem.verify(&[day(1), day(3)]));
        // Outside the range.
        assert!(!problem.verify(&[day(1), day(4)]));
        // Wrong length.
        assert!(!problem.verify(&[day(1)]));

        let dates = [day(2), day(1)];
        let violated = problem.violations(&dates);
        assert_eq!(violated, vec![&Constraint::binary(0, Operator::Lt, 1)]);
    }
}
