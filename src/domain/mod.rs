//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O: the feature record handed to the predictor and
//! the result derived from its answer.

mod prediction;
mod record;

pub use prediction::{DangerLevel, PredictionResult, Rgb};
pub use record::{
    AdmissionType, BloodType, Choice, Doctor, FeatureRecord, Gender, InsuranceProvider,
    MedicalCondition, Medication, UnknownChoice, COLUMN_NAMES, DATE_FORMAT,
};
