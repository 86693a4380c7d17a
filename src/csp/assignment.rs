use chrono::NaiveDate;
use core::ops::Deref;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// The state of one meeting's slot during search.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// No date chosen yet.
    #[default]
    Unassigned,
    /// The meeting is tentatively placed on this date.
    Assigned(NaiveDate),
}

impl Slot {
    /// The chosen date, if any.
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Assigned(d) => Some(*d),
            Self::Unassigned => None,
        }
    }
}

/// An index-aligned partial assignment of dates to meetings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<Slot>);

impl Assignment {
    /// `n` unassigned slots.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self(vec![Slot::Unassigned; n])
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Places `meeting` on `date`, replacing any previous value.
    pub fn assign(&mut self, meeting: usize, date: NaiveDate) {
        self.0[meeting] = Slot::Assigned(date);
    }

    /// Clears `meeting`'s slot.
    pub fn unassign(&mut self, meeting: usize) {
        self.0[meeting] = Slot::Unassigned;
    }

    /// The date of `meeting`, or `None` if unassigned or out of bounds.
    #[must_use]
    pub fn value(&self, meeting: usize) -> Option<NaiveDate> {
        self.0.get(meeting).and_then(Slot::date)
    }

    /// Converts a complete assignment into a [`Schedule`].
    ///
    /// Returns `None` if any slot is still unassigned.
    #[must_use]
    pub fn to_schedule(&self) -> Option<Schedule> {
        self.0
            .iter()
            .map(Slot::date)
            .collect::<Option<Vec<_>>>()
            .map(Schedule)
    }
}

/// A date for every meeting, indexed by meeting id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Schedule(Vec<NaiveDate>);

impl Schedule {
    /// Wraps an index-aligned list of dates.
    #[must_use]
    pub const fn new(dates: Vec<NaiveDate>) -> Self {
        Self(dates)
    }

    /// The underlying dates.
    #[must_use]
    pub fn into_inner(self) -> Vec<NaiveDate> {
        self.0
    }
}

impl Deref for Schedule {
    type Target = [NaiveDate];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .enumerate()
                .map(|(i, d)| format!("{i}: {d}"))
                .join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn test_slot_states() {
        assert_eq!(Slot::default(), Slot::Unassigned);
        assert_eq!(Slot::default().date(), None);
        assert_eq!(Slot::Assigned(day(1)).date(), Some(day(1)));
    }

    #[test]
    fn test_assign_and_undo() {
        let mut a = Assignment::new(3);
        assert_eq!(a.len(), 3);

        a.assign(0, day(4));
        a.assign(2, day(6));
        assert_eq!(a.value(2), Some(day(6)));
        assert_eq!(a.value(1), None);
        assert_eq!(a.value(7), None);
        assert_eq!(a.to_schedule(), None);

        a.assign(2, day(5));
        assert_eq!(a.value(2), Some(day(5)));
        a.unassign(2);
        assert_eq!(a.value(2), None);
        assert_eq!(a.value(0), Some(day(4)));
    }

    #[test]
    fn test_complete_to_schedule() {
        let mut a = Assignment::new(2);
        a.assign(1, day(2));
        a.assign(0, day(9));

        let schedule = a.to_schedule().unwrap();
        assert_eq!(&*schedule, &[day(9), day(2)]);
        assert_eq!(schedule.to_string(), "0: 2024-07-09\n1: 2024-07-02");
    }

    #[test]
    fn test_empty_assignment_is_complete() {
        let a = Assignment::new(0);
        assert!(a.is_empty());
        assert_eq!(a.to_schedule(), Some(Schedule::default()));
    }
}
