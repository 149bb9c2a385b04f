//! Independent runs on worker threads.
//!
//! [`run_batch`] gives every named [`RunConfig`] its own scoped thread.
//! Runs share nothing; each worker sends its finished history back over a
//! channel and the results are re-keyed in submission order.

use std::error::Error;
use std::fmt;
use std::thread;

use indexmap::IndexMap;

use crate::config::RunConfig;
use crate::history::HistoryBuffer;
use crate::simulation::{self, RunError};

/// A batch run that failed, annotated with the failing scenario.
#[derive(Debug)]
pub struct BatchError {
    /// Name of the scenario, as submitted.
    pub name: String,
    /// What went wrong.
    pub error: RunError,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scenario {:?}: {}", self.name, self.error)
    }
}

impl Error for BatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Run every scenario concurrently and collect the histories.
///
/// Results keep the submission order of `configs`. Every run goes to
/// completion even if another fails.
///
/// # Errors
///
/// The first failure in submission order.
pub fn run_batch(
    configs: IndexMap<String, RunConfig>,
) -> Result<IndexMap<String, HistoryBuffer>, BatchError> {
    let n = configs.len();
    let (tx, rx) = crossbeam_channel::bounded(n.max(1));

    thread::scope(|s| {
        for (index, (name, config)) in configs.iter().enumerate() {
            let tx = tx.clone();
            s.spawn(move || {
                log::debug!("scenario {name:?} starting");
                let result = simulation::run(config);
                // The receiver outlives the scope.
                let _ = tx.send((index, result));
            });
        }
    });
    drop(tx);

    let mut results: Vec<(usize, Result<HistoryBuffer, RunError>)> = rx.iter().collect();
    results.sort_by_key(|(index, _)| *index);

    let mut out = IndexMap::with_capacity(n);
    for (name, (_, result)) in configs.into_keys().zip(results) {
        match result {
            Ok(history) => {
                out.insert(name, history);
            }
            Err(error) => return Err(BatchError { name, error }),
        }
    }
    Ok(out)
}
