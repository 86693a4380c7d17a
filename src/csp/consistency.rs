#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Domain filters that run once, before search.
//!
//! Both filters only ever remove dates, so every domain after filtering is a
//! subset of the domain before it. Neither filter can remove a date that is
//! part of a solution, which is why search over the filtered domains finds
//! the same first solution as search over the raw date range.
//!
//! Arc consistency here is a single left-then-right sweep per binary
//! constraint in the order the constraints were given. It is not iterated to
//! a fixpoint: after the sweep a chain such as `a < b`, `b < c` can still
//! leave values in `a` that have no support through `b` and `c`, and search
//! is left to discover that.
//!
//! Support for a value is decided from the other domain's bounds for the
//! ordering operators, from membership for `==` and from the bounds again
//! for `!=`, so each sweep is linear in the number of days.

use crate::csp::constraint::Constraint;
use crate::csp::domain::Domain;
use crate::csp::operator::Operator;
use chrono::NaiveDate;
use tracing::trace;

/// Prunes domains with every unary constraint.
///
/// For `meeting OP date`, removes each candidate `v` of `meeting` for which
/// `v OP date` is false. Binary constraints are skipped.
///
/// Returns the total number of removed dates.
///
/// # Panics
///
/// If a constraint references a meeting without a domain.
pub fn node_consistency(domains: &mut [Domain], constraints: &[Constraint]) -> usize {
    let mut removed = 0;

    for constraint in constraints {
        let Constraint::Unary { meeting, op, date } = *constraint else {
            continue;
        };

        let pruned = domains[meeting].prune(|v| op.compare(&v, &date));
        trace!(%constraint, pruned, "node consistency");
        removed += pruned;
    }

    removed
}

/// Prunes domains with every binary constraint, one sweep each.
///
/// For `left OP right`, first removes each candidate `rv` of `right` that no
/// candidate `lv` of `left` supports (`lv OP rv`), then removes each `lv` of
/// `left` that no remaining `rv` supports. Unary constraints are skipped.
///
/// Returns the total number of removed dates.
///
/// # Panics
///
/// If a constraint references a meeting without a domain.
pub fn arc_consistency(domains: &mut [Domain], constraints: &[Constraint]) -> usize {
    let mut removed = 0;

    for constraint in constraints {
        let Constraint::Binary { left, op, right } = *constraint else {
            continue;
        };

        let heads = domains[left].clone();
        let bounds = heads.first().zip(heads.last());
        let pruned_right = domains[right].prune(|rv| supported(&heads, bounds, op, rv));

        let tails = domains[right].clone();
        let bounds = tails.first().zip(tails.last());
        let flipped = op.flipped();
        let pruned_left = domains[left].prune(|lv| supported(&tails, bounds, flipped, lv));

        trace!(%constraint, pruned_left, pruned_right, "arc consistency");
        removed += pruned_left + pruned_right;
    }

    removed
}

/// Whether some `w` in `other` satisfies `w OP value`.
///
/// `bounds` is `other`'s first and last date, `None` when it is empty.
fn supported(
    other: &Domain,
    bounds: Option<(NaiveDate, NaiveDate)>,
    op: Operator,
    value: NaiveDate,
) -> bool {
    let Some((lo, hi)) = bounds else {
        return false;
    };

    match op {
        Operator::Eq => other.contains(value),
        Operator::Lt | Operator::Le => op.compare(&lo, &value),
        Operator::Gt | Operator::Ge => op.compare(&hi, &value),
        Operator::Ne => lo != value || hi != value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::domain::DateRange;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn domains(n: usize, first: u32, last: u32) -> Vec<Domain> {
        vec![Domain::new(DateRange::new(day(first), day(last)).unwrap()); n]
    }

    fn dates(domain: &Domain) -> Vec<NaiveDate> {
        domain.iter().collect()
    }

    #[test]
    fn test_node_consistency_each_operator() {
        let cases = [
            (Operator::Eq, vec![day(3)]),
            (Operator::Ne, vec![day(1), day(2), day(4), day(5)]),
            (Operator::Lt, vec![day(1), day(2)]),
            (Operator::Le, vec![day(1), day(2), day(3)]),
            (Operator::Gt, vec![day(4), day(5)]),
            (Operator::Ge, vec![day(3), day(4), day(5)]),
        ];

        for (op, expected) in cases {
            let mut ds = domains(1, 1, 5);
            let removed = node_consistency(&mut ds, &[Constraint::unary(0, op, day(3))]);
            assert_eq!(dates(&ds[0]), expected, "{op}");
            assert_eq!(removed, 5 - expected.len(), "{op}");
        }
    }

    #[test]
    fn test_node_consistency_ignores_binary_and_other_meetings() {
        let mut ds = domains(2, 1, 3);
        let removed = node_consistency(
            &mut ds,
            &[
                Constraint::binary(0, Operator::Lt, 1),
                Constraint::unary(1, Operator::Gt, day(1)),
            ],
        );
        assert_eq!(removed, 1);
        assert_eq!(ds[0].len(), 3);
        assert_eq!(dates(&ds[1]), vec![day(2), day(3)]);
    }

    #[test]
    fn test_node_consistency_literal_outside_range() {
        let mut ds = domains(1, 1, 3);
        node_consistency(&mut ds, &[Constraint::unary(0, Operator::Eq, day(20))]);
        assert!(ds[0].is_empty());
    }

    #[test]
    fn test_arc_consistency_prunes_both_sides() {
        let mut ds = domains(2, 1, 3);
        let removed = arc_consistency(&mut ds, &[Constraint::binary(0, Operator::Lt, 1)]);

        assert_eq!(dates(&ds[0]), vec![day(1), day(2)]);
        assert_eq!(dates(&ds[1]), vec![day(2), day(3)]);
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_arc_consistency_left_side_uses_pruned_right() {
        let mut ds = domains(2, 1, 3);
        ds[0].prune(|d| d == day(3));
        // Nothing in 1 is after day 3, so 0 loses its only candidate; 1 is
        // then checked against the emptied domain and loses everything.
        let removed = arc_consistency(&mut ds, &[Constraint::binary(1, Operator::Gt, 0)]);
        assert!(ds[1].is_empty());
        assert!(ds[0].is_empty());
        assert_eq!(removed, 4);
    }

    #[test]
    fn test_arc_consistency_equality_intersects() {
        let mut ds = domains(2, 1, 5);
        ds[0].prune(|d| d <= day(3));
        ds[1].prune(|d| d >= day(3));
        arc_consistency(&mut ds, &[Constraint::binary(0, Operator::Eq, 1)]);
        assert_eq!(dates(&ds[0]), vec![day(3)]);
        assert_eq!(dates(&ds[1]), vec![day(3)]);
    }

    #[test]
    fn test_arc_consistency_is_a_single_sweep() {
        // With a 3 day range, a < b < c has the unique solution (1, 2, 3).
        // Sweeping `a < b` first leaves a = {1, 2}, b = {2, 3}; `b < c`
        // then narrows b to {2} and c to {3}, but `a < b` is not revisited,
        // so a keeps day 2.
        let mut ds = domains(3, 1, 3);
        arc_consistency(
            &mut ds,
            &[
                Constraint::binary(0, Operator::Lt, 1),
                Constraint::binary(1, Operator::Lt, 2),
            ],
        );
        assert_eq!(dates(&ds[0]), vec![day(1), day(2)]);
        assert_eq!(dates(&ds[1]), vec![day(2)]);
        assert_eq!(dates(&ds[2]), vec![day(3)]);
    }

    #[test]
    fn test_arc_consistency_same_meeting_on_both_sides() {
        let mut ds = domains(1, 1, 3);
        arc_consistency(&mut ds, &[Constraint::binary(0, Operator::Lt, 0)]);
        // Each value is checked against the domain as a whole, not itself:
        // day 1 loses its support on the right, day 3 on the left.
        assert_eq!(dates(&ds[0]), vec![day(2)]);

        let mut ds = domains(1, 1, 3);
        arc_consistency(&mut ds, &[Constraint::binary(0, Operator::Le, 0)]);
        assert_eq!(ds[0].len(), 3);
    }

    #[test]
    fn test_filters_never_grow_domains() {
        let constraints = [
            Constraint::unary(0, Operator::Ne, day(2)),
            Constraint::binary(0, Operator::Ge, 1),
            Constraint::binary(2, Operator::Ne, 0),
            Constraint::unary(2, Operator::Le, day(4)),
        ];
        let before = domains(3, 1, 5);
        let mut after = before.clone();
        node_consistency(&mut after, &constraints);
        arc_consistency(&mut after, &constraints);

        for (b, a) in before.iter().zip(&after) {
            assert!(a.len() <= b.len());
            assert!(a.iter().all(|d| b.contains(d)));
        }
    }

    /// Arc consistency written directly from its definition: a value stays
    /// if any value on the other side supports it.
    fn arc_by_definition(domains: &mut [Domain], constraints: &[Constraint]) -> usize {
        let mut removed = 0;
        for constraint in constraints {
            let Constraint::Binary { left, op, right } = *constraint else {
                continue;
            };
            let heads = domains[left].clone();
            removed += domains[right].prune(|rv| heads.iter().any(|lv| op.compare(&lv, &rv)));
            let tails = domains[right].clone();
            removed += domains[left].prune(|lv| tails.iter().any(|rv| op.compare(&lv, &rv)));
        }
        removed
    }

    #[test]
    fn test_arc_consistency_matches_definition() {
        let shapes: [fn(NaiveDate) -> bool; 6] = [
            |_| true,
            |_| false,
            |d| d == day(4),
            |d| d <= day(2) || d >= day(6),
            |d| d >= day(3) && d <= day(5),
            |d| d != day(1) && d != day(7),
        ];

        for op in Operator::ALL {
            for (a, keep_a) in shapes.iter().enumerate() {
                for (b, keep_b) in shapes.iter().enumerate() {
                    let mut start = domains(2, 1, 7);
                    start[0].prune(keep_a);
                    start[1].prune(keep_b);

                    for constraint in [
                        Constraint::binary(0, op, 1),
                        Constraint::binary(1, op, 0),
                        Constraint::binary(0, op, 0),
                    ] {
                        let mut fast = start.clone();
                        let mut slow = start.clone();
                        let removed = arc_consistency(&mut fast, &[constraint]);
                        let expected = arc_by_definition(&mut slow, &[constraint]);

                        assert_eq!(fast, slow, "{constraint} shapes {a} {b}");
                        assert_eq!(removed, expected, "{constraint} shapes {a} {b}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_arc_consistency_over_a_century() {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2099, 12, 31).unwrap();
        let mut ds = vec![Domain::new(DateRange::new(start, end).unwrap()); 2];
        let days = ds[0].len();

        let removed = arc_consistency(&mut ds, &[Constraint::binary(0, Operator::Gt, 1)]);

        assert_eq!(removed, 2);
        assert_eq!(ds[0].len(), days - 1);
        assert_eq!(ds[1].len(), days - 1);
        assert_eq!(ds[0].first(), start.succ_opt());
        assert_eq!(ds[1].last(), end.pred_opt());
    }
}
