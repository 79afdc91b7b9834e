//! Predictor port: Trait for the external risk model.
//!
//! The application only needs a category label for a feature record; how the
//! label is produced (which runtime, which artifact) stays behind this trait.

use crate::domain::FeatureRecord;

/// Error raised by a predictor for a single request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictorError {
    /// A column value could not be interpreted by the model.
    #[error("column '{column}': {reason}")]
    InvalidValue { column: String, reason: String },

    /// The model itself failed while scoring.
    #[error("{0}")]
    Scoring(String),
}

/// Trait for category prediction.
///
/// Implementations are loaded once at startup and shared read-only, so they
/// must be safe to call from the prediction worker thread.
pub trait Predictor: Send + Sync {
    /// Score one record and return its predicted category label.
    ///
    /// # Errors
    /// Returns `PredictorError` if the record cannot be scored.
    fn predict(&self, record: &FeatureRecord) -> Result<String, PredictorError>;

    /// Short identifier of the loaded model, for logs and the About dialog.
    fn describe(&self) -> String {
        String::from("unnamed predictor")
    }
}
