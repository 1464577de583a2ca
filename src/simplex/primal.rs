use derive_more::IsVariant;

use super::{trace, SimplexTable, TraceSink};

/// State of the right-hand side after a repair pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum Feasibility {
    Feasible,
    /// Row `row` still has a negative right-hand side and no negative
    /// coefficient to pivot on.
    Stuck { row: usize },
    /// The pivot budget ran out before every row was feasible.
    Stalled,
}

/// Verdict of a primal simplex pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum Search {
    Optimal,
    /// Column `column` improves the objective but no row limits it.
    Unbounded { column: usize },
    /// No improving column is left, yet row `row` could not be made feasible.
    Infeasible { row: usize },
    /// The pivot budget ran out, most likely on a degenerate cycle.
    Stalled,
}

/// Pivots `table` on `(r, s)` and reports the step to `sink`.
pub fn pivot<S: TraceSink + ?Sized>(table: &mut SimplexTable, r: usize, s: usize, sink: &mut S) {
    let entering = table.nonbasic_vars()[s].to_owned();
    let leaving = table.basic_vars()[r].to_owned();
    log::debug!(
        "Pivot on ({r}, {s}) = {}: {entering} enters, {leaving} leaves",
        table.matrix()[(r, s)]
    );
    if table.matrix()[(r, s)] == 0. {
        log::error!("Zero pivot element at ({r}, {s})");
    }

    table.pivot(r, s);
    log::trace!("Tableau after pivot:\n{table}");

    trace::record(sink, table, || {
        format!("Pivot on row {r}, column {s}: {entering} enters the basis, {leaving} leaves")
    });
}

/// Pivots away negative right-hand sides, first offending row and first
/// negative coefficient in it each time.
///
/// Every pivot takes one from `pivots_left`; an empty budget stalls the pass.
pub fn restore_feasibility<S: TraceSink + ?Sized>(
    table: &mut SimplexTable,
    epsilon: f64,
    pivots_left: &mut usize,
    sink: &mut S,
) -> Feasibility {
    loop {
        let Some(r) = (0..table.objective_row()).find(|&i| table.rhs(i) < -epsilon) else {
            return Feasibility::Feasible;
        };
        let Some(s) = (1..table.ncols()).find(|&j| table.matrix()[(r, j)] < -epsilon) else {
            log::debug!(
                "Row {r} ({}) has negative right-hand side {} and no negative coefficient",
                table.basic_vars()[r],
                table.rhs(r)
            );
            return Feasibility::Stuck { row: r };
        };
        let Some(left) = pivots_left.checked_sub(1) else {
            log::warn!("Pivot budget exhausted while restoring row {r}");
            return Feasibility::Stalled;
        };
        *pivots_left = left;
        log::debug!("Restoring feasibility of row {r}");
        pivot(table, r, s, sink);
    }
}

/// Leftmost column with a negative entry in the objective row.
/// Entries within `epsilon` of zero count as non-improving.
pub fn entering_column(table: &SimplexTable, epsilon: f64) -> Option<usize> {
    let objective = table.objective_row();
    (1..table.ncols()).find(|&j| table.matrix()[(objective, j)] < -epsilon)
}

/// Minimum ratio test over the rows with a positive entry in column `s`.
/// The first of several equal ratios wins.
pub fn leaving_row(table: &SimplexTable, s: usize, epsilon: f64) -> Option<usize> {
    (0..table.objective_row())
        .filter_map(|i| {
            let coefficient = table.matrix()[(i, s)];
            (coefficient > epsilon).then(|| (i, table.rhs(i) / coefficient))
        })
        .inspect(|(i, ratio)| log::trace!("Ratio of row {i}: {ratio}"))
        .fold(None, |best: Option<(usize, f64)>, (i, ratio)| match best {
            Some((_, best_ratio)) if best_ratio <= ratio => best,
            _ => Some((i, ratio)),
        })
        .map(|(i, _)| i)
}

/// Primal simplex: restores feasibility and pivots until the objective row
/// has no improving column.
///
/// At most `max_pivots` pivots are made, repairs included. Degenerate
/// tableaus can cycle under the leftmost-column rule, and the budget turns
/// such a cycle into [`Search::Stalled`].
pub fn optimize<S: TraceSink + ?Sized>(
    table: &mut SimplexTable,
    epsilon: f64,
    max_pivots: usize,
    sink: &mut S,
) -> Search {
    let mut pivots_left = max_pivots;
    loop {
        let feasibility = restore_feasibility(table, epsilon, &mut pivots_left, sink);
        let Some(s) = entering_column(table, epsilon).filter(|_| !feasibility.is_stalled()) else {
            return match feasibility {
                Feasibility::Feasible => {
                    log::debug!("Optimal tableau:\n{table}");
                    Search::Optimal
                }
                Feasibility::Stuck { row } => Search::Infeasible { row },
                Feasibility::Stalled => Search::Stalled,
            };
        };
        let Some(r) = leaving_row(table, s, epsilon) else {
            log::info!("Column {s} ({}) is unbounded", table.nonbasic_vars()[s]);
            return Search::Unbounded { column: s };
        };
        let Some(left) = pivots_left.checked_sub(1) else {
            log::warn!("No optimum within {max_pivots} pivots");
            return Search::Stalled;
        };
        pivots_left = left;
        pivot(table, r, s, sink);
    }
}
