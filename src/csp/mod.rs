#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The calendar constraint satisfaction engine.
//!
//! Meetings are variables whose domains are sets of calendar dates. A problem
//! is solved in three stages: node consistency prunes domains with unary
//! constraints, a single arc consistency sweep prunes them with binary
//! constraints, and backtracking search assigns the remaining candidates in
//! a fixed order, rejecting partial assignments as soon as a fully assigned
//! constraint fails.

/// Partial assignments of dates to meetings.
pub mod assignment;
/// Depth-first search with incremental consistency checks.
pub mod backtracking;
/// Node and arc consistency filters.
pub mod consistency;
/// Unary and binary date constraints.
pub mod constraint;
/// Date ranges and per-meeting candidate sets.
pub mod domain;
/// Errors raised for malformed problems.
pub mod error;
/// Generate-and-test enumeration, used as a reference solver.
pub mod exhaustive;
/// Reading and writing the line-based problem format.
pub mod format;
/// Comparison operators.
pub mod operator;
/// Problem definition and validation.
pub mod problem;
/// The solver interface, configuration and statistics.
pub mod solver;
/// Per-meeting constraint watch lists.
pub mod watch;
