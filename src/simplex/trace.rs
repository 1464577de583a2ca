use std::fmt;

use derive_new::new;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::{table::write_table, SimplexTable};

/// Frozen copy of a tableau taken after a pivot or a cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, new)]
pub struct Snapshot {
    pub step_title: String,
    pub matrix: DMatrix<f64>,
    pub basic_vars: Vec<String>,
    pub nonbasic_vars: Vec<String>,
}

impl Snapshot {
    pub fn of(step_title: impl Into<String>, table: &SimplexTable) -> Self {
        Self::new(
            step_title.into(),
            table.matrix().clone(),
            table.basic_vars().to_vec(),
            table.nonbasic_vars().to_vec(),
        )
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.step_title)?;
        write_table(f, &self.matrix, &self.basic_vars, &self.nonbasic_vars)
    }
}

/// Receiver of the step-by-step trace of a solve.
pub trait TraceSink {
    /// Whether snapshots should be produced at all.
    ///
    /// Copying the tableau is skipped entirely when this returns `false`.
    fn enabled(&self) -> bool {
        true
    }

    fn record(&mut self, snapshot: Snapshot);
}

impl TraceSink for Vec<Snapshot> {
    fn record(&mut self, snapshot: Snapshot) {
        self.push(snapshot);
    }
}

/// Sink that drops every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _snapshot: Snapshot) {}
}

/// Records a snapshot of `table` if the sink wants one.
pub(crate) fn record<S: TraceSink + ?Sized>(
    sink: &mut S,
    table: &SimplexTable,
    step_title: impl FnOnce() -> String,
) {
    if sink.enabled() {
        sink.record(Snapshot::of(step_title(), table));
    }
}
