use std::{
    panic::{self, AssertUnwindSafe},
    sync::mpsc::{self, Receiver},
};

use derive_more::{Display, Error};

use super::{
    solver::{solve_integer_with, CancellationToken, SolverOptions},
    SimplexTable, Snapshot, Solution,
};

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SolveError {
    #[display(fmt = "The solver panicked: {}", message)]
    Panicked { message: String },
    #[display(fmt = "The solver went away without a result")]
    Disconnected,
}

/// A solve running on the rayon thread pool.
#[derive(Debug)]
pub struct SolveHandle {
    cancel: CancellationToken,
    receiver: Receiver<Result<Solution, SolveError>>,
}

impl SolveHandle {
    /// Asks the solve to stop at its next iteration.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Blocks until the solve finishes.
    pub fn join(self) -> Result<Solution, SolveError> {
        self.receiver
            .recv()
            .map_err(|_| SolveError::Disconnected)?
    }
}

/// Starts an integer solve of `table` in the background, trace included.
pub fn spawn_solve(table: SimplexTable, options: SolverOptions) -> SolveHandle {
    spawn_solve_with(table, options, CancellationToken::new())
}

/// Like [`spawn_solve`], but stopped through an existing `cancel` token.
pub fn spawn_solve_with(
    table: SimplexTable,
    options: SolverOptions,
    cancel: CancellationToken,
) -> SolveHandle {
    let (sender, receiver) = mpsc::channel();

    let token = cancel.clone();
    rayon::spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut trace: Vec<Snapshot> = Vec::new();
            let mut solution = solve_integer_with(table, &options, &mut trace, &token);
            solution.trace = trace;
            solution
        }))
        .map_err(|payload| SolveError::Panicked {
            message: payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_default(),
        });
        if sender.send(result).is_err() {
            log::debug!("Solve result dropped, the handle is gone");
        }
    });

    SolveHandle { cancel, receiver }
}
