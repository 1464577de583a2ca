use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{
    add_cut, most_fractional, optimize, Outcome, Search, SimplexTable, Snapshot, Solution,
    TraceSink, EPSILON, MAX_CUTS, PIVOTS_PER_LINE,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, new)]
#[serde(default)]
pub struct SolverOptions {
    /// Tolerance for comparisons against zero and for integrality
    pub epsilon: f64,
    /// A solve fails as non-convergent once it needs more cuts than this
    pub max_cuts: usize,
    /// Pivots allowed per simplex pass; derived from the tableau size when unset
    pub max_pivots: Option<usize>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            max_cuts: MAX_CUTS,
            max_pivots: None,
        }
    }
}

impl SolverOptions {
    /// Pivot budget of one simplex pass over `table`.
    pub fn pivot_limit(&self, table: &SimplexTable) -> usize {
        self.max_pivots
            .unwrap_or(PIVOTS_PER_LINE * (table.nrows() + table.ncols()))
    }
}

/// Rounds `value` to the nearest integer when it is within `epsilon` of it.
fn snap(value: f64, epsilon: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() <= epsilon {
        nearest
    } else {
        value
    }
}

/// Shared flag asking a running solve to stop.
///
/// The solver looks at it once per cutting-plane iteration, so a cancelled
/// solve never stops in the middle of a pivot.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Solves `table` for integers with default options, collecting the trace.
pub fn solve_integer(table: SimplexTable) -> Solution {
    let mut trace: Vec<Snapshot> = Vec::new();
    let mut solution = solve_integer_with(
        table,
        &SolverOptions::default(),
        &mut trace,
        &CancellationToken::new(),
    );
    solution.trace = trace;
    solution
}

/// Cutting-plane loop: optimize, check integrality, cut, repeat.
///
/// Snapshots go to `sink`; the returned [`Solution::trace`] is left empty.
pub fn solve_integer_with<S: TraceSink + ?Sized>(
    mut table: SimplexTable,
    options: &SolverOptions,
    sink: &mut S,
    cancel: &CancellationToken,
) -> Solution {
    let SolverOptions {
        epsilon, max_cuts, ..
    } = *options;
    let mut cuts = 0usize;

    loop {
        if cancel.is_cancelled() {
            log::info!("Solve cancelled after {cuts} cuts");
            return Solution::failed(Outcome::Cancelled, cuts);
        }

        log::info!("Iteration: {}", cuts + 1);
        let max_pivots = options.pivot_limit(&table);
        match optimize(&mut table, epsilon, max_pivots, sink) {
            Search::Optimal => {}
            Search::Unbounded { .. } => return Solution::failed(Outcome::Unbounded, cuts),
            Search::Infeasible { .. } => return Solution::failed(Outcome::Infeasible, cuts),
            Search::Stalled => {
                log::warn!("Simplex pass stalled after {cuts} cuts");
                return Solution::failed(Outcome::NonConvergent, cuts);
            }
        }

        let Some((label, frac)) = most_fractional(&table, epsilon) else {
            log::info!("Integer solution found after {cuts} cuts");
            return Solution {
                outcome: Outcome::Optimal,
                values: table
                    .solution()
                    .into_iter()
                    .map(|(name, value)| (name, snap(value, epsilon)))
                    .collect(),
                objective: Some(snap(table.objective_value(), epsilon)),
                cuts,
                trace: Vec::new(),
            };
        };
        let label = label.to_owned();
        log::info!("{label} is fractional ({frac}), adding a cut");

        if let Err(err) = add_cut(&mut table, &label, epsilon, sink) {
            log::info!("{err}");
            return Solution::failed(Outcome::Infeasible, cuts);
        }

        cuts += 1;
        if cuts > max_cuts {
            log::warn!("No integer solution within {max_cuts} cuts");
            return Solution::failed(Outcome::NonConvergent, cuts);
        }
    }
}
