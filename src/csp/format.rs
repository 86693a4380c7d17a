#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A line-based text format for calendar problems.
//!
//! The format follows the shape of DIMACS CNF files:
//!
//! ```text
//! c three meetings in the first week of March
//! p meetings 3 2024-03-01 2024-03-07
//! u 0 >= 2024-03-04
//! b 0 < 1
//! b 2 != 1
//! ```
//!
//! - Lines starting with `c` are comments; blank lines are skipped.
//! - The problem line `p meetings <n> <start> <end>` must appear exactly once,
//!   before any constraint. Dates are written `YYYY-MM-DD`.
//! - `u <meeting> <op> <date>` is a unary constraint.
//! - `b <left> <op> <right>` is a binary constraint.
//! - A line starting with `%` ends the data; anything after it is ignored.
//!
//! `Problem`'s [`Display`] implementation writes this format, so a parsed
//! problem can be written back out and read again unchanged.

use crate::csp::constraint::Constraint;
use crate::csp::domain::DateRange;
use crate::csp::error::CspError;
use crate::csp::operator::Operator;
use crate::csp::problem::Problem;
use chrono::NaiveDate;
use std::fmt::{self, Display, Formatter};
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

/// Errors produced while reading a problem. Line numbers start at 1.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The input could not be read.
    #[error("failed to read problem: {0}")]
    Io(#[from] io::Error),

    /// The input has no `p meetings` line.
    #[error("missing problem line `p meetings <n> <start> <end>`")]
    MissingHeader,

    /// A constraint appears before the problem line.
    #[error("line {line}: constraint before the problem line")]
    ConstraintBeforeHeader {
        /// Offending line.
        line: usize,
    },

    /// A second problem line.
    #[error("line {line}: duplicate problem line")]
    DuplicateHeader {
        /// Offending line.
        line: usize,
    },

    /// A line that starts with an unknown marker.
    #[error("line {line}: unknown line kind `{kind}`")]
    UnknownLine {
        /// Offending line.
        line: usize,
        /// The first token of the line.
        kind: String,
    },

    /// A line has the wrong shape.
    #[error("line {line}: expected `{expected}`")]
    Malformed {
        /// Offending line.
        line: usize,
        /// The expected shape of the line.
        expected: &'static str,
    },

    /// A token that should be a meeting index or count.
    #[error("line {line}: `{token}` is not a non-negative integer")]
    InvalidInteger {
        /// Offending line.
        line: usize,
        /// The token.
        token: String,
    },

    /// A token that should be a `YYYY-MM-DD` date.
    #[error("line {line}: `{token}` is not a YYYY-MM-DD date")]
    InvalidDate {
        /// Offending line.
        line: usize,
        /// The token.
        token: String,
    },

    /// The line is well formed but describes an invalid problem or
    /// constraint, e.g. an unknown operator or a meeting index out of range.
    #[error("line {line}: {source}")]
    Invalid {
        /// Offending line.
        line: usize,
        /// The underlying problem error.
        #[source]
        source: CspError,
    },
}

const HEADER_SHAPE: &str = "p meetings <n> <start> <end>";
const UNARY_SHAPE: &str = "u <meeting> <op> <date>";
const BINARY_SHAPE: &str = "b <left> <op> <right>";

fn integer(line: usize, token: &str) -> Result<usize, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidInteger {
        line,
        token: token.to_string(),
    })
}

fn date(line: usize, token: &str) -> Result<NaiveDate, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidDate {
        line,
        token: token.to_string(),
    })
}

fn operator(line: usize, token: &str) -> Result<Operator, ParseError> {
    token
        .parse()
        .map_err(|source| ParseError::Invalid { line, source })
}

fn meeting(line: usize, token: &str, meetings: usize) -> Result<usize, ParseError> {
    let index = integer(line, token)?;
    if index >= meetings {
        return Err(ParseError::Invalid {
            line,
            source: CspError::OutOfRangeReference { index, meetings },
        });
    }
    Ok(index)
}

fn parse_header(line: usize, tokens: &[&str]) -> Result<Problem, ParseError> {
    let [_, "meetings", n, start, end] = tokens else {
        return Err(ParseError::Malformed {
            line,
            expected: HEADER_SHAPE,
        });
    };

    let meetings = integer(line, n)?;
    let range = DateRange::new(date(line, start)?, date(line, end)?)
        .map_err(|source| ParseError::Invalid { line, source })?;

    Ok(Problem::new(meetings, range))
}

fn parse_constraint(line: usize, tokens: &[&str], meetings: usize) -> Result<Constraint, ParseError> {
    match tokens {
        ["u", m, op, d] => Ok(Constraint::unary(
            meeting(line, m, meetings)?,
            operator(line, op)?,
            date(line, d)?,
        )),
        ["b", l, op, r] => Ok(Constraint::binary(
            meeting(line, l, meetings)?,
            operator(line, op)?,
            meeting(line, r, meetings)?,
        )),
        ["u", ..] => Err(ParseError::Malformed {
            line,
            expected: UNARY_SHAPE,
        }),
        _ => Err(ParseError::Malformed {
            line,
            expected: BINARY_SHAPE,
        }),
    }
}

/// Reads a problem from `reader`.
///
/// # Errors
///
/// A [`ParseError`] for the first offending line, or for I/O failures.
pub fn parse_problem<R: BufRead>(reader: R) -> Result<Problem, ParseError> {
    let mut problem: Option<Problem> = None;

    for (i, line_result) in reader.lines().enumerate() {
        let line_str = line_result?;
        let line = i + 1;
        let tokens: Vec<&str> = line_str.split_whitespace().collect();

        match tokens.first().copied() {
            Some("%") => break,
            None | Some("c") => {}
            Some("p") => {
                if problem.is_some() {
                    return Err(ParseError::DuplicateHeader { line });
                }
                problem = Some(parse_header(line, &tokens)?);
            }
            Some("u" | "b") => {
                let Some(problem) = problem.as_mut() else {
                    return Err(ParseError::ConstraintBeforeHeader { line });
                };
                let constraint = parse_constraint(line, &tokens, problem.meetings())?;
                problem.add_constraint(constraint);
            }
            Some(kind) => {
                return Err(ParseError::UnknownLine {
                    line,
                    kind: kind.to_string(),
                });
            }
        }
    }

    problem.ok_or(ParseError::MissingHeader)
}

/// Reads a problem from a string.
///
/// # Errors
///
/// See [`parse_problem`].
pub fn parse_str(input: &str) -> Result<Problem, ParseError> {
    parse_problem(input.as_bytes())
}

/// Reads a problem from the file at `path`.
///
/// # Errors
///
/// [`ParseError::Io`] if the file cannot be opened, otherwise see
/// [`parse_problem`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Problem, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_problem(io::BufReader::new(file))
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let range = self.range();
        writeln!(f, "p meetings {} {} {}", self.meetings(), range.start(), range.end())?;
        for constraint in self.constraints() {
            match constraint {
                Constraint::Unary { meeting, op, date } => writeln!(f, "u {meeting} {op} {date}")?,
                Constraint::Binary { left, op, right } => writeln!(f, "b {left} {op} {right}")?,
            }
        }
        Ok(())
    }
}
