use std::fmt::Display;
use std::process;

use crate::{Evaluation, ServiceState};

/// Wraps a fallible check so that any driver error still ends in exactly one
/// status line and exit code.
///
/// Collection and argument failures default to [`ServiceState::Unknown`]:
/// absence of data is not saturation. Use [`Runner::on_error`] when a
/// particular check wants a different state, e.g. a connection probe that
/// should go CRITICAL when the listener is unreachable.
pub struct Runner<E> {
    error_state: ServiceState,
    on_error: Option<Box<dyn FnOnce(&E) -> ServiceState>>,
}

impl<E: Display> Runner<E> {
    pub fn new() -> Self {
        Self {
            error_state: ServiceState::Unknown,
            on_error: None,
        }
    }

    pub fn on_error(mut self, f: impl FnOnce(&E) -> ServiceState + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn safe_run(self, f: impl FnOnce() -> Result<Evaluation, E>) -> RunnerResult<E> {
        match f() {
            Ok(evaluation) => RunnerResult::Ok(evaluation),
            Err(err) => {
                let state = match self.on_error {
                    Some(f) => f(&err),
                    None => self.error_state,
                };
                RunnerResult::Err(state, err)
            }
        }
    }
}

impl<E: Display> Default for Runner<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the given closure and maps an error to the given state.
pub fn safe_run<E: Display>(
    f: impl FnOnce() -> Result<Evaluation, E>,
    error_state: ServiceState,
) -> RunnerResult<E> {
    Runner::new().on_error(move |_| error_state).safe_run(f)
}

pub enum RunnerResult<E> {
    Ok(Evaluation),
    Err(ServiceState, E),
}

impl<E: Display> RunnerResult<E> {
    pub fn state(&self) -> ServiceState {
        match self {
            RunnerResult::Ok(evaluation) => evaluation.state(),
            RunnerResult::Err(state, _) => *state,
        }
    }

    /// Prints the single status line and terminates with the mapped exit
    /// code. This is the only place the process ends on a regular run.
    pub fn print_and_exit(self) -> ! {
        match self {
            RunnerResult::Ok(evaluation) => evaluation.print_and_exit(),
            RunnerResult::Err(state, err) => {
                println!("{} - {}", state, err);
                process::exit(state.exit_code());
            }
        }
    }
}
