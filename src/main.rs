use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use simplex_gomory::{
    command::{self, ProductionInput},
    helpers::f64_rounded_string,
    simplex::SolverOptions,
};

/// Plans integer production quantities with the simplex method and Gomory cuts.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// JSON file with `supply`, `consumption` and `profit`; the plush toy
    /// example is solved when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print every recorded tableau
    #[arg(short, long)]
    trace: bool,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,

    #[arg(long)]
    max_cuts: Option<usize>,

    #[arg(long)]
    epsilon: Option<f64>,

    /// Pivots allowed per simplex pass
    #[arg(long)]
    max_pivots: Option<usize>,

    /// More output per occurrence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn plush_toys() -> ProductionInput {
    ProductionInput {
        supply: vec![150., 130., 120.],
        consumption: vec![vec![5., 2.], vec![2., 3.], vec![1., 7.]],
        profit: vec![10., 20.],
        options: SolverOptions::default(),
    }
}

pub fn main() -> Result<()> {
    let args = Args::parse();

    Builder::new()
        .filter_level(match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let mut input = match &args.input {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Reading {}", path.display()))?;
            serde_json::from_str::<ProductionInput>(&json)
                .with_context(|| format!("Parsing {}", path.display()))?
        }
        None => plush_toys(),
    };
    if let Some(max_cuts) = args.max_cuts {
        input.options.max_cuts = max_cuts;
    }
    if let Some(epsilon) = args.epsilon {
        input.options.epsilon = epsilon;
    }
    if args.max_pivots.is_some() {
        input.options.max_pivots = args.max_pivots;
    }

    let plan = command::compute(input).map_err(|message| anyhow::anyhow!(message))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if args.trace {
        for (i, snapshot) in plan.trace.iter().enumerate() {
            println!("Step {}: {snapshot}", i + 1);
        }
    }
    println!("{}", plan.message);
    for (j, quantity) in plan.quantities.iter().enumerate() {
        println!("x{} = {}", j + 1, f64_rounded_string(quantity, 6));
    }
    println!("Maximal income: {}", f64_rounded_string(&plan.max_income, 6));
    println!("Cuts: {}", plan.cuts);

    Ok(())
}
