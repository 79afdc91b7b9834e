//! # Patient Risk Predictor
//!
//! Terminal form that collects patient attributes, scores them with a
//! pre-trained gradient-boosted model and shows a color-coded risk category.
//!
//! This crate provides:
//! - A typed feature record and the category-to-danger-level mapping
//! - A single-flight prediction task runner with a cosmetic busy indicator
//! - A JSON tree-ensemble predictor loaded once at startup
//! - Terminal UI for the form, result panel and dialogs
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (FeatureRecord, PredictionResult)
//! - `ports`: The `Predictor` trait
//! - `adapters`: Model loading, hospital list, log sanitization
//! - `application`: Form session and prediction task runner
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::AppConfig;
pub use domain::{DangerLevel, FeatureRecord, PredictionResult};

/// Main error type
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// The predictor failed to initialize at startup.
    #[error("Model could not be loaded. Please check the model path.")]
    ModelUnavailable,

    /// The loaded predictor failed for one request.
    #[error("An error occurred during prediction: {0}")]
    PredictionFailed(String),
}

impl RiskError {
    /// Title of the dialog reporting this error.
    #[must_use]
    pub fn dialog_title(&self) -> &'static str {
        match self {
            Self::PredictionFailed(_) => "Prediction Error",
            Self::ModelUnavailable => "Error",
        }
    }
}
