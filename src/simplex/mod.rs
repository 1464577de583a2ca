mod background;
mod gomory;
mod primal;
mod problem;
mod solution;
mod solver;
mod table;
mod trace;

pub use background::{spawn_solve, spawn_solve_with, SolveError, SolveHandle};
pub use gomory::{add_cut, most_fractional, CutError};
pub use primal::{
    entering_column, leaving_row, optimize, pivot, restore_feasibility, Feasibility, Search,
};
pub use problem::*;
pub use solution::{Outcome, Solution};
pub use solver::{solve_integer, solve_integer_with, CancellationToken, SolverOptions};
pub use table::{SimplexTable, TableError, OBJECTIVE_LABEL, RHS_LABEL};
pub use trace::{NoTrace, Snapshot, TraceSink};

/// Default tolerance used when comparing tableau entries against zero.
pub const EPSILON: f64 = 1e-6;

/// Default cap on the number of Gomory cuts a single solve may insert.
pub const MAX_CUTS: usize = 20;

/// Pivots a simplex pass may make per tableau row and column when no explicit
/// limit is set.
pub const PIVOTS_PER_LINE: usize = 10;
