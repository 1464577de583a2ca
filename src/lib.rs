//! Integer production planning with the tableau simplex method and Gomory
//! fractional cuts.
//!
//! [`simplex::Problem`] turns supplies, per-unit consumption and per-unit
//! profits into the initial [`simplex::SimplexTable`], and
//! [`simplex::solve_integer`] drives it to an integer optimum, recording a
//! [`simplex::Snapshot`] after every pivot and every inserted cut.

pub mod command;
pub mod helpers;
pub mod simplex;
