#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::csp::constraint::Constraint;
use smallvec::SmallVec;
use std::ops::Index;

/// For every meeting, the indices of the constraints that mention it.
///
/// Built once per solve so that checking a fresh assignment only visits the
/// constraints that can be affected by it. A binary constraint whose two
/// sides are the same meeting is listed once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchList(Vec<SmallVec<[usize; 4]>>);

impl WatchList {
    /// Indexes `constraints` for a problem with `meetings` meetings.
    ///
    /// # Panics
    ///
    /// If a constraint references a meeting `>= meetings`; problems are
    /// validated before this is called.
    #[must_use]
    pub fn new(meetings: usize, constraints: &[Constraint]) -> Self {
        let mut watches = vec![SmallVec::new(); meetings];

        for (i, constraint) in constraints.iter().enumerate() {
            let scope = constraint.scope();
            for (k, &meeting) in scope.iter().enumerate() {
                if scope[..k].contains(&meeting) {
                    continue;
                }
                watches[meeting].push(i);
            }
        }

        Self(watches)
    }

    /// Number of meetings covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list covers no meetings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for WatchList {
    type Output = SmallVec<[usize; 4]>;

    fn index(&self, meeting: usize) -> &Self::Output {
        &self.0[meeting]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::operator::Operator;
    use chrono::NaiveDate;

    #[test]
    fn test_watches_follow_scope() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let constraints = [
            Constraint::binary(0, Operator::Lt, 2),
            Constraint::unary(1, Operator::Ne, date),
            Constraint::binary(2, Operator::Ge, 1),
            Constraint::binary(1, Operator::Le, 1),
        ];
        let watches = WatchList::new(4, &constraints);

        assert_eq!(watches.len(), 4);
        assert_eq!(watches[0].as_slice(), &[0]);
        assert_eq!(watches[1].as_slice(), &[1, 2, 3]);
        assert_eq!(watches[2].as_slice(), &[0, 2]);
        assert!(watches[3].is_empty());
    }
}
