//! Application layer: form state and prediction sequencing.
//!
//! This module sits between the terminal UI and the `Predictor` port. The UI
//! drives a [`FormSession`] and a [`TaskRunner`]; neither knows how the
//! predictor is implemented.

mod runner;
mod session;
mod worker;

pub use runner::{
    BusyIndicator, Completion, RunnerState, Submit, TaskRunner, LOADING_LABEL, PREDICTING_LABEL,
};
pub use session::{FieldId, FieldKind, FormSession, ResultDisplay};
pub use worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};
