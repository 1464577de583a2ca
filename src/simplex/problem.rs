use derive_more::Display;
use derive_new::new;
use nalgebra::{DMatrix, DVector, RowDVector};
use serde::{Deserialize, Serialize};

use crate::dbg_display;

use super::{solve_integer, SimplexTable, Solution, TableError};

/// Production problem: maximize `profit · x` subject to
/// `consumption · x <= supply`, `x >= 0`.
#[derive(Debug, Clone, PartialEq, Display, Serialize, Deserialize, new)]
#[display(
    fmt = "Problem: {{\n    supply:\n{}\n    consumption:\n{}\n    profit:\n{}\n}}",
    r#"indent(&DVector::from_column_slice(supply).to_string())"#,
    r#"indent(&consumption_matrix(consumption).to_string())"#,
    r#"indent(&RowDVector::from_row_slice(profit).to_string())"#
)]
pub struct Problem {
    /// Available amount of every resource
    pub supply: Vec<f64>,
    /// `consumption[i][j]`: amount of resource `i` used by one unit of product `j`
    pub consumption: Vec<Vec<f64>>,
    /// Income per unit of every product
    pub profit: Vec<f64>,
}

fn indent(block: &str) -> String {
    block
        .trim()
        .lines()
        .map(|l| format!("    {}\n", l.trim()))
        .collect()
}

fn consumption_matrix(consumption: &[Vec<f64>]) -> DMatrix<f64> {
    let ncols = consumption.first().map_or(0, Vec::len);
    DMatrix::from_fn(consumption.len(), ncols, |i, j| {
        consumption[i].get(j).copied().unwrap_or_default()
    })
}

impl Problem {
    pub fn n_products(&self) -> usize {
        self.profit.len()
    }

    pub fn n_resources(&self) -> usize {
        self.supply.len()
    }

    pub fn build_tableau(&self) -> Result<SimplexTable, TableError> {
        build_tableau(&self.supply, &self.consumption, &self.profit)
    }

    /// Solves the problem in whole numbers.
    pub fn solve_with_whole(&self) -> Result<Solution, TableError> {
        let table = dbg_display!(self.build_tableau()?);
        Ok(solve_integer(table))
    }

    /// Income of the production plan `quantities`.
    pub fn income(&self, quantities: &[f64]) -> f64 {
        self.profit.iter().zip(quantities).map(|(p, x)| p * x).sum()
    }
}

/// Canonical starting tableau: one row per resource, then the objective row.
pub fn build_tableau(
    supply: &[f64],
    consumption: &[Vec<f64>],
    profit: &[f64],
) -> Result<SimplexTable, TableError> {
    SimplexTable::build(supply, consumption, profit)
}

#[cfg(test)]
mod tests;
