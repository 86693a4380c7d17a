use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort a solve before any search takes place.
///
/// Running out of candidates is not an error: solvers report it as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CspError {
    /// An operator token is not one of `==`, `!=`, `<`, `<=`, `>` or `>=`.
    #[error("malformed constraint: unknown operator `{token}`")]
    MalformedConstraint {
        /// The offending token.
        token: String,
    },

    /// A constraint refers to a meeting outside `0..meetings`.
    #[error("constraint references meeting {index}, but only {meetings} meetings exist")]
    OutOfRangeReference {
        /// The referenced meeting index.
        index: usize,
        /// The number of meetings in the problem.
        meetings: usize,
    },

    /// The date range is empty because it starts after it ends.
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CspError::MalformedConstraint {
            token: "=<".to_string(),
        };
        assert_eq!(err.to_string(), "malformed constraint: unknown operator `=<`");

        let err = CspError::OutOfRangeReference {
            index: 3,
            meetings: 2,
        };
        assert_eq!(
            err.to_string(),
            "constraint references meeting 3, but only 2 meetings exist"
        );

        let start = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let err = CspError::InvalidRange { start, end };
        assert_eq!(
            err.to_string(),
            "invalid date range: 2024-03-02 is after 2024-03-01"
        );
    }
}
