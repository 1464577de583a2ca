use pretty_assertions::assert_str_eq;

use super::*;
use crate::simplex::Outcome;

fn prepare_problem() -> Problem {
    Problem::new(
        vec![150., 130., 120.],
        vec![vec![5., 2.], vec![2., 3.], vec![1., 7.]],
        vec![10., 20.],
    )
}

#[test]
fn problem_build_tableau_works_with_plush_toys() {
    let table = prepare_problem().build_tableau().unwrap();

    assert_str_eq!(
        table.matrix().to_string(),
        DMatrix::from_row_slice(
            4,
            3,
            &[
                150., 5., 2., //
                130., 2., 3., //
                120., 1., 7., //
                0., -10., -20., //
            ]
        )
        .to_string()
    );
    assert_eq!(table.basic_vars().join(" "), "x3 x4 x5 F");
    assert_eq!(table.nonbasic_vars().join(" "), "RHS x1 x2");
}

#[test]
fn problem_build_tableau_works_with_three_products() {
    let problem = Problem::new(
        vec![10., 20.],
        vec![vec![1., 2., 3.], vec![4., 5., 6.]],
        vec![7., 8., 9.],
    );
    let table = problem.build_tableau().unwrap();

    assert_str_eq!(
        table.matrix().to_string(),
        DMatrix::from_row_slice(
            3,
            4,
            &[
                10., 1., 2., 3., //
                20., 4., 5., 6., //
                0., -7., -8., -9., //
            ]
        )
        .to_string()
    );
    assert_eq!(table.basic_vars().join(" "), "x4 x5 F");
    assert_eq!(table.decision_vars().join(" "), "x1 x2 x3");
    assert_eq!((problem.n_products(), problem.n_resources()), (3, 2));
}

#[test]
fn problem_build_tableau_rejects_missing_consumption_row() {
    let problem = Problem::new(vec![10., 20.], vec![vec![1., 2.]], vec![7., 8.]);
    assert_eq!(
        problem.build_tableau().unwrap_err(),
        TableError::RowLabels { rows: 1, labels: 2 }
    );
}

#[test]
fn problem_solve_with_whole_finds_income_500() {
    let problem = prepare_problem();
    let solution = problem.solve_with_whole().unwrap();

    assert_eq!(solution.outcome, Outcome::Optimal);
    let quantities = [solution.values["x1"], solution.values["x2"]];
    assert!((problem.income(&quantities) - 500.).abs() < 1e-6);
    for (constraint, supply) in problem.consumption.iter().zip(&problem.supply) {
        let used: f64 = constraint.iter().zip(quantities).map(|(a, x)| a * x).sum();
        assert!(used <= supply + 1e-6);
    }
}

#[test]
fn problem_solve_with_whole_reports_unbounded_product() {
    let problem = Problem::new(vec![10.], vec![vec![1., 0.]], vec![1., 1.]);
    let solution = problem.solve_with_whole().unwrap();

    assert_eq!(solution.outcome, Outcome::Unbounded);
    assert_eq!(solution.message(), "The objective function is unbounded");
}

#[test]
fn problem_display_lists_all_parts() {
    let problem = Problem::new(vec![4.], vec![vec![2., 1.]], vec![3., 1.]);
    let shown = problem.to_string();

    assert!(shown.starts_with("Problem: {\n    supply:\n"));
    assert!(shown.contains("consumption:"));
    assert!(shown.contains("profit:"));
    assert!(shown.ends_with("}"));
}
