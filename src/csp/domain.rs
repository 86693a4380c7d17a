#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Date ranges and the candidate sets (domains) derived from them.
//!
//! A [`Domain`] stores one bit per day of the problem's [`DateRange`]: bit `i`
//! is set while `start + i days` is still a candidate. This gives constant
//! time membership tests and removals, and iteration that is always in
//! ascending date order, which the search relies on for reproducible results.

use crate::csp::error::CspError;
use bit_vec::BitVec;
use chrono::{Days, NaiveDate};
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// An inclusive range of calendar dates `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates the range `[start, end]`.
    ///
    /// # Errors
    ///
    /// [`CspError::InvalidRange`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CspError> {
        if start > end {
            return Err(CspError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, both ends included.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn days(&self) -> usize {
        self.end.signed_duration_since(self.start).num_days().unsigned_abs() as usize + 1
    }

    /// Whether `date` lies inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date of the range in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        self.start.iter_days().take(self.days())
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// The set of dates still considered possible for one meeting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    start: NaiveDate,
    days: BitVec,
}

impl Domain {
    /// A domain holding every date of `range`.
    #[must_use]
    pub fn new(range: DateRange) -> Self {
        Self {
            start: range.start(),
            days: BitVec::from_elem(range.days(), true),
        }
    }

    fn offset_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = usize::try_from(date.signed_duration_since(self.start).num_days()).ok()?;
        (offset < self.days.len()).then_some(offset)
    }

    fn date_at(&self, offset: usize) -> NaiveDate {
        self.start + Days::new(offset as u64)
    }

    /// Number of remaining candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.iter().filter(|&candidate| candidate).count()
    }

    /// Whether no candidate is left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.none()
    }

    /// Whether `date` is still a candidate.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.offset_of(date)
            .is_some_and(|offset| self.days.get(offset) == Some(true))
    }

    /// Removes every candidate for which `keep` returns `false`.
    ///
    /// Returns the number of removed dates.
    pub fn prune<F: FnMut(NaiveDate) -> bool>(&mut self, mut keep: F) -> usize {
        let mut removed = 0;
        for offset in 0..self.days.len() {
            if self.days.get(offset) == Some(true) && !keep(self.date_at(offset)) {
                self.days.set(offset, false);
                removed += 1;
            }
        }
        removed
    }

    /// Candidates in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days
            .iter()
            .enumerate()
            .filter(|&(_, candidate)| candidate)
            .map(|(offset, _)| self.date_at(offset))
    }

    /// Earliest remaining candidate.
    #[must_use]
    pub fn first(&self) -> Option<NaiveDate> {
        (0..self.days.len())
            .find(|&offset| self.days.get(offset) == Some(true))
            .map(|offset| self.date_at(offset))
    }

    /// Latest remaining candidate.
    #[must_use]
    pub fn last(&self) -> Option<NaiveDate> {
        (0..self.days.len())
            .rev()
            .find(|&offset| self.days.get(offset) == Some(true))
            .map(|offset| self.date_at(offset))
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.iter().join(", "))
    }
}
