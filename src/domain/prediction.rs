//! Prediction result types.
//!
//! Maps the predictor's category label onto a danger level and the color
//! used to highlight the result.

use serde::{Deserialize, Serialize};

/// Danger level shown for a predicted category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DangerLevel {
    /// Category "Normal"
    Low,
    /// Category "Moderate"
    Moderate,
    /// Any other category, including labels the model was never expected to emit
    High,
}

impl DangerLevel {
    /// Map a model category onto a danger level.
    ///
    /// Only the exact labels `Normal` and `Moderate` lower the level; every
    /// other label is treated as high risk.
    #[must_use]
    pub fn from_category(category: &str) -> Self {
        match category {
            "Normal" => Self::Low,
            "Moderate" => Self::Moderate,
            _ => Self::High,
        }
    }

    /// Background color of the result panel.
    #[must_use]
    pub fn color(&self) -> Rgb {
        match self {
            Self::Low => Rgb::new(0, 255, 0),
            Self::Moderate => Rgb::new(255, 255, 0),
            Self::High => Rgb::new(255, 0, 0),
        }
    }
}

impl std::fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
        }
    }
}

/// An RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form.
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Outcome of one successful predictor invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Category label exactly as returned by the model
    pub category: String,

    /// Danger level derived from the category
    pub danger_level: DangerLevel,

    /// Display color derived from the danger level
    pub color: Rgb,
}

impl PredictionResult {
    /// Build a result from a raw category label.
    #[must_use]
    pub fn from_category(category: impl Into<String>) -> Self {
        let category = category.into();
        let danger_level = DangerLevel::from_category(&category);
        Self {
            category,
            danger_level,
            color: danger_level.color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories() {
        let normal = PredictionResult::from_category("Normal");
        assert_eq!(normal.danger_level, DangerLevel::Low);
        assert_eq!(normal.color.hex(), "#00ff00");

        let moderate = PredictionResult::from_category("Moderate");
        assert_eq!(moderate.danger_level, DangerLevel::Moderate);
        assert_eq!(moderate.color.hex(), "#ffff00");

        let high = PredictionResult::from_category("High");
        assert_eq!(high.danger_level, DangerLevel::High);
        assert_eq!(high.color.hex(), "#ff0000");
    }

    #[test]
    fn test_unknown_categories_fall_back_to_high() {
        for label in ["", "normal", "Normal ", "MODERATE", "Critical", "42", "Nörmal"] {
            let result = PredictionResult::from_category(label);
            assert_eq!(result.danger_level, DangerLevel::High, "label {label:?}");
            assert_eq!(result.color, Rgb::new(255, 0, 0));
            assert_eq!(result.category, label);
        }
    }

    #[test]
    fn test_mapping_is_deterministic() {
        for label in ["Normal", "Moderate", "Abnormal"] {
            assert_eq!(
                PredictionResult::from_category(label),
                PredictionResult::from_category(label)
            );
        }
    }
}
