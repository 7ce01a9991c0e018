//! Reporting computations.
//!
//! The reporting routines separate gathering (SQL sums, in [`crate::db`])
//! from arithmetic (pure functions here) so the bookkeeping rules are
//! testable without a database.

pub mod profit_and_loss;
pub mod rentability;
