//! Ports layer: Trait definitions for external operations.
//!
//! The predictor is the only external collaborator; the application layer
//! depends on this trait, never on a concrete model runtime.

mod predictor;

pub use predictor::{Predictor, PredictorError};
