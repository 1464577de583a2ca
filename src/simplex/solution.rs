use std::{borrow::Cow, collections::BTreeMap, fmt};

use derive_more::{Display, IsVariant};
use serde::{Deserialize, Serialize};

use super::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IsVariant, Serialize, Deserialize)]
pub enum Outcome {
    /// An integer optimum was reached.
    Optimal,
    Unbounded,
    /// No integer point could be reached with fractional cuts.
    Infeasible,
    /// The cut limit ran out first.
    NonConvergent,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub outcome: Outcome,
    /// Decision variable values, filled only for [`Outcome::Optimal`]
    pub values: BTreeMap<String, f64>,
    pub objective: Option<f64>,
    /// Number of Gomory cuts inserted
    pub cuts: usize,
    pub trace: Vec<Snapshot>,
}

impl Solution {
    pub(crate) fn failed(outcome: Outcome, cuts: usize) -> Self {
        Self {
            outcome,
            values: BTreeMap::new(),
            objective: None,
            cuts,
            trace: Vec::new(),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.outcome.is_optimal()
    }

    pub fn message(&self) -> Cow<'static, str> {
        match self.outcome {
            Outcome::Optimal => "Optimal integer solution found".into(),
            Outcome::Unbounded => "The objective function is unbounded".into(),
            Outcome::Infeasible => "No integer solution (no further cut is possible)".into(),
            Outcome::NonConvergent => format!(
                "Too many iterations ({} cuts), no solution found",
                self.cuts
            )
            .into(),
            Outcome::Cancelled => "The solve was cancelled".into(),
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message())?;
        for (name, value) in &self.values {
            writeln!(f, "{name} = {value}")?;
        }
        if let Some(objective) = self.objective {
            writeln!(f, "F = {objective}")?;
        }
        Ok(())
    }
}
