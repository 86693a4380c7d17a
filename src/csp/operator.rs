#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Comparison operators for date constraints.
//!
//! The operator set is closed: every constraint compares two dates with one of
//! six chronological relations. Tokens are parsed with [`FromStr`], which is
//! the single place where an unknown operator is turned into
//! [`CspError::MalformedConstraint`].

use crate::csp::error::CspError;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A chronological comparison between a left and a right date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    /// `==`: the dates are the same day.
    Eq,
    /// `!=`: the dates are different days.
    Ne,
    /// `<`: the left date is strictly before the right date.
    Lt,
    /// `<=`: the left date is before or on the right date.
    Le,
    /// `>`: the left date is strictly after the right date.
    Gt,
    /// `>=`: the left date is after or on the right date.
    Ge,
}

impl Operator {
    /// All operators, in token order.
    pub const ALL: [Self; 6] = [Self::Eq, Self::Ne, Self::Lt, Self::Le, Self::Gt, Self::Ge];

    /// Evaluates `left OP right`.
    ///
    /// Generic over any totally ordered value so that dates and day offsets
    /// share one definition.
    #[must_use]
    pub fn compare<T: Ord + ?Sized>(self, left: &T, right: &T) -> bool {
        let ordering = left.cmp(right);
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }

    /// The operator that holds for `right OP' left` whenever `left OP right`
    /// holds.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Eq => Self::Eq,
            Self::Ne => Self::Ne,
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
        }
    }

    /// The textual token, e.g. `"<="`.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

impl FromStr for Operator {
    type Err = CspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            _ => Err(CspError::MalformedConstraint {
                token: s.to_string(),
            }),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
