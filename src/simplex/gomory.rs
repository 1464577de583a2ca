use derive_more::{Display, Error, IsVariant};
use nalgebra::RowDVector;

use super::{trace, SimplexTable, TraceSink};

#[derive(Debug, Clone, PartialEq, Eq, Display, Error, IsVariant)]
pub enum CutError {
    #[display(fmt = "No row is labelled {}", label)]
    NoSuchRow { label: String },
    /// Every coefficient of the source row is integral, so the cut would not
    /// remove anything.
    #[display(fmt = "Cut derived from {} is degenerate", label)]
    Degenerate { label: String },
}

/// Fractional part in `[0, 1)`.
fn fract(value: f64) -> f64 {
    value - value.floor()
}

/// Basic variable whose value has the largest fractional part, if any value
/// is farther than `epsilon` from an integer. The first row wins ties.
pub fn most_fractional(table: &SimplexTable, epsilon: f64) -> Option<(&str, f64)> {
    (0..table.objective_row())
        .map(|i| (i, fract(table.rhs(i))))
        .filter(|&(_, frac)| frac > epsilon && frac < 1. - epsilon)
        .fold(None, |best: Option<(usize, f64)>, (i, frac)| match best {
            Some((_, best_frac)) if best_frac >= frac => best,
            _ => Some((i, frac)),
        })
        .map(|(i, frac)| (table.basic_vars()[i].as_str(), frac))
}

/// Adds the Gomory fractional cut generated by the row of `label` right above
/// the objective row and returns the name of its slack variable.
pub fn add_cut<S: TraceSink + ?Sized>(
    table: &mut SimplexTable,
    label: &str,
    epsilon: f64,
    sink: &mut S,
) -> Result<String, CutError> {
    let row = table.row_of(label).ok_or_else(|| CutError::NoSuchRow {
        label: label.to_owned(),
    })?;

    let cut: RowDVector<f64> = table.matrix().row(row).map(|a| -fract(a));
    if cut.iter().all(|a| a.abs() < epsilon) {
        log::debug!("Row of {label} is integral, no cut");
        return Err(CutError::Degenerate {
            label: label.to_owned(),
        });
    }

    let name = format!("cut{}", table.nrows() + table.ncols());
    let at = table.objective_row();
    table.insert_row(at, &cut, name.clone());
    log::debug!("Added cut {name} from {label}: {cut}");

    trace::record(sink, table, || {
        format!("Gomory cut from {label}: new constraint {name}")
    });
    Ok(name)
}
