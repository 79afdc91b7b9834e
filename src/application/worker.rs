//! Background worker for the blocking predictor call.
//!
//! The UI thread never calls the predictor directly: it hands the record to
//! a worker thread and polls the returned handle once per frame.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::domain::FeatureRecord;
use crate::ports::{Predictor, PredictorError};

/// Progress updates from the prediction worker.
#[derive(Debug, Clone)]
pub enum PredictionProgress {
    /// Dispatch delay elapsed, predictor invoked
    Scoring,
    /// Predictor returned a category label
    Complete(String),
    /// Predictor rejected the record
    Failed(PredictorError),
}

/// Handle to a running prediction worker.
pub struct PredictionWorkerHandle {
    progress_rx: Receiver<PredictionProgress>,
    _handle: JoinHandle<()>,
}

impl PredictionWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    ///
    /// A worker that exits without reporting (for example because the
    /// predictor panicked) is reported as a failure.
    #[must_use]
    pub fn try_recv(&self) -> Option<PredictionProgress> {
        match self.progress_rx.try_recv() {
            Ok(progress) => Some(progress),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(PredictionProgress::Failed(
                PredictorError::Scoring("prediction worker terminated unexpectedly".to_string()),
            )),
        }
    }
}

/// Worker that runs one prediction in the background.
pub struct PredictionWorker;

impl PredictionWorker {
    /// Spawn a background prediction for `record`, invoking the predictor
    /// after `delay`.
    pub fn spawn(
        predictor: Arc<dyn Predictor>,
        record: FeatureRecord,
        delay: Duration,
    ) -> PredictionWorkerHandle {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_prediction(predictor.as_ref(), &record, delay, &tx);
        });

        PredictionWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_prediction(
        predictor: &dyn Predictor,
        record: &FeatureRecord,
        delay: Duration,
        tx: &Sender<PredictionProgress>,
    ) {
        // Give the UI a frame to show the busy indicator first.
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        let _ = tx.send(PredictionProgress::Scoring);

        let progress = match predictor.predict(record) {
            Ok(category) => PredictionProgress::Complete(category),
            Err(e) => PredictionProgress::Failed(e),
        };
        let _ = tx.send(progress);
    }
}
