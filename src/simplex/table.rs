use std::{collections::BTreeMap, fmt};

use derive_more::{Display, Error};
use nalgebra::{DMatrix, RowDVector};

use crate::helpers::f64_rounded_string;

/// Label of column 0, the right-hand side pseudo-variable.
pub const RHS_LABEL: &str = "RHS";
/// Label of the last row, the objective function.
pub const OBJECTIVE_LABEL: &str = "F";

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TableError {
    #[display(fmt = "Tableau must have an objective row and a right-hand side column")]
    Empty,
    #[display(fmt = "Matrix has {} rows but {} basic labels", rows, labels)]
    RowLabels { rows: usize, labels: usize },
    #[display(fmt = "Matrix has {} columns but {} nonbasic labels", columns, labels)]
    ColumnLabels { columns: usize, labels: usize },
    #[display(fmt = "Last row must be labelled {}, found {}", OBJECTIVE_LABEL, label)]
    ObjectiveRow { label: String },
    #[display(fmt = "Label {} is used more than once", label)]
    DuplicateLabel { label: String },
    #[display(
        fmt = "Consumption row {} has {} entries, expected one per product ({})",
        row,
        found,
        expected
    )]
    RaggedConsumption {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Simplex tableau in the "swap rows and columns" form.
///
/// Row `i` belongs to the basic variable `basic_vars[i]`, column `j` to the
/// nonbasic variable `nonbasic_vars[j]`. Column 0 holds the right-hand side
/// and the last row is the objective row.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexTable {
    matrix: DMatrix<f64>,
    basic_vars: Vec<String>,
    nonbasic_vars: Vec<String>,
    /// Labels of the structural columns at construction time
    decision_vars: Vec<String>,
}

impl SimplexTable {
    pub fn new(
        matrix: DMatrix<f64>,
        basic_vars: Vec<String>,
        nonbasic_vars: Vec<String>,
    ) -> Result<Self, TableError> {
        if matrix.nrows() == 0 || matrix.ncols() == 0 {
            return Err(TableError::Empty);
        }
        if matrix.nrows() != basic_vars.len() {
            return Err(TableError::RowLabels {
                rows: matrix.nrows(),
                labels: basic_vars.len(),
            });
        }
        if matrix.ncols() != nonbasic_vars.len() {
            return Err(TableError::ColumnLabels {
                columns: matrix.ncols(),
                labels: nonbasic_vars.len(),
            });
        }
        match basic_vars.last() {
            Some(label) if label == OBJECTIVE_LABEL => {}
            Some(label) => {
                return Err(TableError::ObjectiveRow {
                    label: label.to_owned(),
                })
            }
            None => return Err(TableError::Empty),
        }

        let mut seen = std::collections::HashSet::new();
        if let Some(label) = basic_vars
            .iter()
            .chain(&nonbasic_vars)
            .find(|&label| !seen.insert(label.as_str()))
        {
            return Err(TableError::DuplicateLabel {
                label: label.to_owned(),
            });
        }

        let decision_vars = nonbasic_vars.iter().skip(1).cloned().collect();
        Ok(Self {
            matrix,
            basic_vars,
            nonbasic_vars,
            decision_vars,
        })
    }

    /// Builds the canonical starting tableau of a production problem.
    ///
    /// `consumption[i][j]` is how much of resource `i` one unit of product `j`
    /// uses. Products become `x1..xk`, slack variables `x{k+1}..x{k+m}`.
    pub fn build(
        supply: &[f64],
        consumption: &[Vec<f64>],
        profit: &[f64],
    ) -> Result<Self, TableError> {
        let n_products = profit.len();
        let n_resources = supply.len();
        if consumption.len() != n_resources {
            return Err(TableError::RowLabels {
                rows: consumption.len(),
                labels: n_resources,
            });
        }
        if let Some((row, found)) = consumption
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != n_products)
        {
            return Err(TableError::RaggedConsumption {
                row,
                found,
                expected: n_products,
            });
        }

        let matrix = DMatrix::from_fn(n_resources + 1, n_products + 1, |i, j| {
            match (i == n_resources, j) {
                (false, 0) => supply[i],
                (false, j) => consumption[i][j - 1],
                (true, 0) => 0.,
                (true, j) => -profit[j - 1],
            }
        });
        let basic_vars = (0..n_resources)
            .map(|i| format!("x{}", n_products + i + 1))
            .chain([OBJECTIVE_LABEL.to_owned()])
            .collect();
        let nonbasic_vars = [RHS_LABEL.to_owned()]
            .into_iter()
            .chain((1..=n_products).map(|j| format!("x{j}")))
            .collect();

        Self::new(matrix, basic_vars, nonbasic_vars)
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn basic_vars(&self) -> &[String] {
        &self.basic_vars
    }

    pub fn nonbasic_vars(&self) -> &[String] {
        &self.nonbasic_vars
    }

    pub fn decision_vars(&self) -> &[String] {
        &self.decision_vars
    }

    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Index of the objective row, always the last one.
    pub fn objective_row(&self) -> usize {
        self.matrix.nrows() - 1
    }

    /// Current right-hand side of row `i`.
    pub fn rhs(&self, i: usize) -> f64 {
        self.matrix[(i, 0)]
    }

    pub fn row_of(&self, label: &str) -> Option<usize> {
        self.basic_vars.iter().position(|var| var == label)
    }

    /// Gauss–Jordan step with the rectangle rule around `(r, s)`, followed by
    /// the swap of `basic_vars[r]` and `nonbasic_vars[s]`.
    pub fn pivot(&mut self, r: usize, s: usize) {
        debug_assert!(r < self.nrows() && s < self.ncols());
        let old = &self.matrix;
        let pivot_el = old[(r, s)];
        debug_assert!(pivot_el != 0., "zero pivot element at ({r}, {s})");

        let new = DMatrix::from_fn(old.nrows(), old.ncols(), |i, j| {
            match (i == r, j == s) {
                (true, true) => 1. / pivot_el,
                (true, false) => old[(i, j)] / pivot_el,
                (false, true) => -old[(i, j)] / pivot_el,
                (false, false) => (old[(i, j)] * pivot_el - old[(i, s)] * old[(r, j)]) / pivot_el,
            }
        });
        self.matrix = new;

        std::mem::swap(&mut self.basic_vars[r], &mut self.nonbasic_vars[s]);
    }

    /// Inserts `row` at index `at` with basic label `label`, growing the
    /// matrix by one row.
    pub(crate) fn insert_row(&mut self, at: usize, row: &RowDVector<f64>, label: String) {
        debug_assert_eq!(row.ncols(), self.ncols());
        let matrix = std::mem::replace(&mut self.matrix, DMatrix::zeros(0, 0));
        self.matrix = matrix.insert_row(at, 0.);
        self.matrix.set_row(at, row);
        self.basic_vars.insert(at, label);
    }

    /// Value of every name in `names`: the right-hand side of the row the
    /// name is basic in, zero when it is nonbasic.
    pub fn values_of<'a, I>(&self, names: I) -> BTreeMap<String, f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| {
                let value = self.row_of(name).map_or(0., |i| self.rhs(i));
                (name.to_owned(), value)
            })
            .collect()
    }

    /// Values of the decision variables the tableau was built with.
    pub fn solution(&self) -> BTreeMap<String, f64> {
        self.values_of(self.decision_vars.iter().map(String::as_str))
    }

    pub fn objective_value(&self) -> f64 {
        self.rhs(self.objective_row())
    }
}

/// Renders a labelled tableau as a fixed-width text table.
pub(crate) fn write_table(
    f: &mut fmt::Formatter<'_>,
    matrix: &DMatrix<f64>,
    basic_vars: &[String],
    nonbasic_vars: &[String],
) -> fmt::Result {
    write!(f, "{:>6} |", "")?;
    for label in nonbasic_vars {
        write!(f, " {label:>8}")?;
    }
    writeln!(f)?;
    writeln!(f, "{}", "-".repeat(8 + 9 * nonbasic_vars.len()))?;
    for (label, row) in basic_vars.iter().zip(matrix.row_iter()) {
        write!(f, "{label:>6} |")?;
        for value in row.iter() {
            write!(f, " {:>8}", f64_rounded_string(value, 2))?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for SimplexTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_table(f, &self.matrix, &self.basic_vars, &self.nonbasic_vars)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_str_eq;

    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn build_lays_out_plush_toy_problem() {
        let table = SimplexTable::build(
            &[150., 130., 120.],
            &[vec![5., 2.], vec![2., 3.], vec![1., 7.]],
            &[10., 20.],
        )
        .unwrap();

        assert_eq!(
            table.matrix(),
            &DMatrix::from_row_slice(
                4,
                3,
                &[
                    150., 5., 2., //
                    130., 2., 3., //
                    120., 1., 7., //
                    0., -10., -20., //
                ]
            )
        );
        assert_eq!(table.basic_vars(), labels(&["x3", "x4", "x5", "F"]));
        assert_eq!(table.nonbasic_vars(), labels(&["RHS", "x1", "x2"]));
        assert_eq!(table.decision_vars(), labels(&["x1", "x2"]));
    }

    #[test]
    fn build_rejects_ragged_consumption() {
        let err = SimplexTable::build(&[1., 2.], &[vec![1., 1.], vec![1.]], &[1., 1.]).unwrap_err();
        assert_eq!(
            err,
            TableError::RaggedConsumption {
                row: 1,
                found: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn new_checks_shape_and_labels() {
        let matrix = DMatrix::from_row_slice(2, 2, &[1., 1., 0., -1.]);
        assert_eq!(
            SimplexTable::new(matrix.clone(), labels(&["x2"]), labels(&["RHS", "x1"])).unwrap_err(),
            TableError::RowLabels { rows: 2, labels: 1 }
        );
        assert_eq!(
            SimplexTable::new(matrix.clone(), labels(&["x2", "G"]), labels(&["RHS", "x1"]))
                .unwrap_err(),
            TableError::ObjectiveRow {
                label: "G".to_owned()
            }
        );
        assert_eq!(
            SimplexTable::new(matrix.clone(), labels(&["x1", "F"]), labels(&["RHS", "x1"]))
                .unwrap_err(),
            TableError::DuplicateLabel {
                label: "x1".to_owned()
            }
        );
        assert!(SimplexTable::new(matrix, labels(&["x2", "F"]), labels(&["RHS", "x1"])).is_ok());
    }

    #[test]
    fn pivot_applies_rectangle_rule_and_swaps_labels() {
        let mut table = SimplexTable::new(
            DMatrix::from_row_slice(2, 3, &[4., 2., 1., 0., -3., -1.]),
            labels(&["x3", "F"]),
            labels(&["RHS", "x1", "x2"]),
        )
        .unwrap();

        table.pivot(0, 1);

        assert_eq!(
            table.matrix(),
            &DMatrix::from_row_slice(2, 3, &[2., 0.5, 0.5, 6., 1.5, 0.5])
        );
        assert_eq!(table.basic_vars(), labels(&["x1", "F"]));
        assert_eq!(table.nonbasic_vars(), labels(&["RHS", "x3", "x2"]));
        assert_eq!(table.solution().get("x1"), Some(&2.));
        assert_eq!(table.solution().get("x2"), Some(&0.));
        assert_eq!(table.objective_value(), 6.);
    }

    #[test]
    fn insert_row_grows_matrix_above_objective() {
        let mut table = SimplexTable::build(&[4.], &[vec![2.]], &[3.]).unwrap();
        table.insert_row(1, &RowDVector::from_row_slice(&[-0.5, -0.25]), "cut4".to_owned());

        assert_eq!(table.nrows(), 3);
        assert_eq!(table.basic_vars(), labels(&["x2", "cut4", "F"]));
        assert_eq!(table.rhs(1), -0.5);
        assert_eq!(table.matrix()[(2, 1)], -3.);
    }

    #[test]
    fn display_renders_labels_and_values() {
        let table = SimplexTable::build(&[4.], &[vec![2.5]], &[3.]).unwrap();
        assert_str_eq!(
            table.to_string(),
            "       |      RHS       x1\n\
             --------------------------\n\
             \x20   x2 |        4      2.5\n\
             \x20    F |        0       -3\n"
        );
    }
}
