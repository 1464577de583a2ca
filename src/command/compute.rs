use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{
    ensure_eq,
    simplex::{self, CancellationToken, Outcome, Snapshot, SolverOptions},
};

/// Raw production problem as entered by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionInput {
    pub supply: Vec<f64>,
    pub consumption: Vec<Vec<f64>>,
    pub profit: Vec<f64>,
    #[serde(default)]
    pub options: SolverOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPlan {
    /// Units of every product, in input order
    pub quantities: Vec<f64>,
    pub max_income: f64,
    pub cuts: usize,
    pub message: Cow<'static, str>,
    pub trace: Vec<Snapshot>,
}

pub fn compute(input: ProductionInput) -> Result<ProductionPlan, Cow<'static, str>> {
    compute_with(input, &CancellationToken::new())
}

/// Validates `input`, solves it in whole numbers and turns the solution into a
/// production plan. Every failed outcome becomes an error message.
pub fn compute_with(
    input: ProductionInput,
    cancel: &CancellationToken,
) -> Result<ProductionPlan, Cow<'static, str>> {
    log::info!(
        "Received input:\n\
        supply: {:?}\n\
        consumption: {:?}\n\
        profit: {:?}",
        input.supply,
        input.consumption,
        input.profit
    );

    ensure_eq!(input.consumption.len(), input.supply.len());
    for row in &input.consumption {
        ensure_eq!(row.len(), input.profit.len());
    }
    if input.profit.is_empty() {
        return Err("There must be at least one product".into());
    }
    log::info!("Shape assertions passed");

    let errors = validate(&input);
    if !errors.is_empty() {
        return Err(errors.join("\n").into());
    }

    let problem = simplex::Problem::new(input.supply, input.consumption, input.profit);
    log::info!("{problem}");
    log::info!(
        "Planning {} products over {} resources",
        problem.n_products(),
        problem.n_resources()
    );

    let table = problem.build_tableau().map_err(|err| err.to_string())?;
    let mut trace: Vec<Snapshot> = Vec::new();
    let solution = simplex::solve_integer_with(table, &input.options, &mut trace, cancel);
    log::info!("Solution:\n{solution}");

    if solution.outcome != Outcome::Optimal {
        return Err(format!("No solution found: {}", solution.message()).into());
    }

    let quantities = (1..=problem.n_products())
        .map(|j| solution.values.get(&format!("x{j}")).copied().unwrap_or_default())
        .collect::<Vec<_>>();
    Ok(ProductionPlan {
        max_income: problem.income(&quantities),
        quantities,
        cuts: solution.cuts,
        message: solution.message(),
        trace,
    })
}

/// Every entry must be a finite, non-negative number.
fn validate(input: &ProductionInput) -> Vec<String> {
    let mut errors = Vec::new();
    let mut check = |value: f64, field: String| {
        if !value.is_finite() || value < 0. {
            errors.push(format!("{field} must be a non-negative number, got {value}"));
        }
    };

    for (i, supply) in input.supply.iter().enumerate() {
        check(*supply, format!("Supply of resource {}", i + 1));
    }
    for (i, row) in input.consumption.iter().enumerate() {
        for (j, consumption) in row.iter().enumerate() {
            check(
                *consumption,
                format!("Consumption of resource {} by product {}", i + 1, j + 1),
            );
        }
    }
    for (j, profit) in input.profit.iter().enumerate() {
        check(*profit, format!("Profit of product {}", j + 1));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plush_toys() -> ProductionInput {
        ProductionInput {
            supply: vec![150., 130., 120.],
            consumption: vec![vec![5., 2.], vec![2., 3.], vec![1., 7.]],
            profit: vec![10., 20.],
            options: SolverOptions::default(),
        }
    }

    #[test]
    fn compute_plans_plush_toys() {
        let plan = compute(plush_toys()).unwrap();

        assert_eq!(plan.quantities, vec![24., 13.]);
        assert_eq!(plan.max_income, 500.);
        assert_eq!(plan.message, "Optimal integer solution found");
        assert!(!plan.trace.is_empty());
    }

    #[test]
    fn compute_rejects_shape_mismatch() {
        let mut input = plush_toys();
        input.consumption.pop();

        let err = compute(input).unwrap_err();
        assert!(err.starts_with("input.consumption.len() != input.supply.len()"));
    }

    #[test]
    fn compute_rejects_negative_entries() {
        let mut input = plush_toys();
        input.supply[1] = -1.;
        input.profit[0] = f64::NAN;

        let err = compute(input).unwrap_err();
        assert_eq!(
            err,
            "Supply of resource 2 must be a non-negative number, got -1\n\
             Profit of product 1 must be a non-negative number, got NaN"
        );
    }

    #[test]
    fn compute_reports_failed_outcome() {
        let mut input = plush_toys();
        input.options.max_cuts = 1;

        let err = compute(input).unwrap_err();
        assert_eq!(
            err,
            "No solution found: Too many iterations (2 cuts), no solution found"
        );
    }

    #[test]
    fn input_reads_camel_case_json_with_default_options() {
        let input: ProductionInput = serde_json::from_str(
            r#"{"supply": [4, 6], "consumption": [[1, 0], [0, 1]], "profit": [3, 2]}"#,
        )
        .unwrap();
        assert_eq!(input.options, SolverOptions::default());

        let plan = compute(input).unwrap();
        assert_eq!(plan.quantities, vec![4., 6.]);
        assert_eq!(plan.max_income, 24.);
        assert_eq!(plan.cuts, 0);
        assert_eq!(plan.trace.len(), 2);
    }
}
