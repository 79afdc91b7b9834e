//! Tree ensemble adapter: Implementation of Predictor over an exported
//! gradient-boosted model.
//!
//! The training pipeline exports a multinomial GBM as JSON
//! (`<model_dir>/<model_id>.json`). Each boosting round holds one regression
//! tree per class; a record's class scores are the class priors plus the
//! leaf values it reaches, turned into probabilities with a softmax.
//!
//! # Missing values
//!
//! Empty text and categorical levels the model never saw during training are
//! treated as missing. Every split carries a `missing_left` flag deciding
//! where those rows go, so a missing value never aborts scoring. Text that
//! is present but cannot be parsed for a numeric or time column is rejected.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureRecord, COLUMN_NAMES, DATE_FORMAT};
use crate::ports::{Predictor, PredictorError};

/// Error type for model loading.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read model artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid model: {0}")]
    Invalid(String),
}

/// How a model column is read from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Numeric,
    Categorical,
    /// `yyyy-MM-dd`, scored as milliseconds since the Unix epoch
    Time,
}

/// A model input column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    /// Training levels of a categorical column; other values score as missing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<String>,
}

/// One node of a regression tree. Node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// `value < threshold` goes left.
    Numeric {
        column: String,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default)]
        missing_left: bool,
        #[serde(skip)]
        column_index: usize,
    },
    /// A level in `left_levels` goes left.
    Categorical {
        column: String,
        left_levels: Vec<String>,
        left: usize,
        right: usize,
        #[serde(default)]
        missing_left: bool,
        #[serde(skip)]
        column_index: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A regression tree as a flat node array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbmModel {
    pub model_id: String,
    /// Class labels, in score order
    pub response_domain: Vec<String>,
    pub columns: Vec<ColumnSpec>,
    /// Prior score per class
    pub init_f: Vec<f64>,
    /// Boosting rounds, each with one tree per class
    pub trees: Vec<Vec<Tree>>,
}

/// A record value encoded for tree traversal.
#[derive(Debug, Clone, PartialEq)]
enum Cell<'a> {
    Number(f64),
    Level(&'a str),
    Missing,
}

impl GbmModel {
    /// Parse and validate a model from its JSON text.
    ///
    /// # Errors
    /// Returns `ModelError::Parse` for malformed JSON and
    /// `ModelError::Invalid` for structural problems.
    pub fn from_json(content: &str) -> Result<Self, ModelError> {
        let mut model: GbmModel = serde_json::from_str(content)?;
        model.validate()?;
        Ok(model)
    }

    /// Check the ensemble shape and resolve split columns to indices.
    fn validate(&mut self) -> Result<(), ModelError> {
        let n_classes = self.response_domain.len();
        if n_classes < 2 {
            return Err(ModelError::Invalid(format!(
                "response_domain needs at least 2 classes, got {n_classes}"
            )));
        }
        if self.init_f.len() != n_classes {
            return Err(ModelError::Invalid(format!(
                "init_f has {} entries for {n_classes} classes",
                self.init_f.len()
            )));
        }
        if self.columns.is_empty() {
            return Err(ModelError::Invalid("model declares no columns".into()));
        }

        for (i, column) in self.columns.iter().enumerate() {
            if !COLUMN_NAMES.contains(&column.name.as_str()) {
                return Err(ModelError::Invalid(format!(
                    "unknown column '{}'",
                    column.name
                )));
            }
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(ModelError::Invalid(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }
        }

        let columns = &self.columns;
        for (round, trees) in self.trees.iter_mut().enumerate() {
            if trees.len() != n_classes {
                return Err(ModelError::Invalid(format!(
                    "round {round} has {} trees for {n_classes} classes",
                    trees.len()
                )));
            }
            for tree in trees.iter_mut() {
                validate_tree(tree, columns)
                    .map_err(|e| ModelError::Invalid(format!("round {round}: {e}")))?;
            }
        }

        Ok(())
    }

    /// Class probabilities for one record, in `response_domain` order.
    ///
    /// # Errors
    /// Returns `PredictorError::InvalidValue` if a present value cannot be
    /// read for its column type.
    pub fn class_probabilities(
        &self,
        record: &FeatureRecord,
    ) -> Result<Vec<(String, f64)>, PredictorError> {
        let cells = self.encode(record)?;

        let mut scores = self.init_f.clone();
        for round in &self.trees {
            for (class, tree) in round.iter().enumerate() {
                scores[class] += score_tree(tree, &cells)?;
            }
        }

        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exps.iter().sum();

        Ok(self
            .response_domain
            .iter()
            .cloned()
            .zip(exps.into_iter().map(|e| e / total))
            .collect())
    }

    fn encode<'a>(&self, record: &'a FeatureRecord) -> Result<Vec<Cell<'a>>, PredictorError> {
        self.columns
            .iter()
            .map(|column| {
                let raw = record.value(&column.name).unwrap_or("").trim();
                if raw.is_empty() {
                    return Ok(Cell::Missing);
                }
                match column.kind {
                    ColumnType::Numeric => raw.parse::<f64>().map(Cell::Number).map_err(|_| {
                        PredictorError::InvalidValue {
                            column: column.name.clone(),
                            reason: format!("cannot parse {raw:?} as a number"),
                        }
                    }),
                    ColumnType::Time => parse_time_millis(raw).map(Cell::Number).ok_or_else(|| {
                        PredictorError::InvalidValue {
                            column: column.name.clone(),
                            reason: format!("cannot parse {raw:?} as a yyyy-MM-dd date"),
                        }
                    }),
                    ColumnType::Categorical => {
                        if column.levels.iter().any(|level| level == raw) {
                            Ok(Cell::Level(raw))
                        } else {
                            Ok(Cell::Missing)
                        }
                    }
                }
            })
            .collect()
    }
}

fn parse_time_millis(raw: &str) -> Option<f64> {
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().timestamp_millis() as f64)
}

fn validate_tree(tree: &mut Tree, columns: &[ColumnSpec]) -> Result<(), String> {
    let len = tree.nodes.len();
    if len == 0 {
        return Err("empty tree".into());
    }

    for (index, node) in tree.nodes.iter_mut().enumerate() {
        let (column, left, right, numeric_split, column_index) = match node {
            TreeNode::Leaf { value } => {
                if !value.is_finite() {
                    return Err(format!("node {index}: non-finite leaf value"));
                }
                continue;
            }
            TreeNode::Numeric {
                column,
                threshold,
                left,
                right,
                column_index,
                ..
            } => {
                if threshold.is_nan() {
                    return Err(format!("node {index}: NaN threshold"));
                }
                (column, *left, *right, true, column_index)
            }
            TreeNode::Categorical {
                column,
                left,
                right,
                column_index,
                ..
            } => (column, *left, *right, false, column_index),
        };

        // Children must come after their parent so traversal always terminates.
        for child in [left, right] {
            if child <= index || child >= len {
                return Err(format!("node {index}: child index {child} out of range"));
            }
        }

        let position = columns
            .iter()
            .position(|c| c.name == *column)
            .ok_or_else(|| format!("node {index}: split on undeclared column '{column}'"))?;
        let kind = columns[position].kind;
        let matches = match kind {
            ColumnType::Numeric | ColumnType::Time => numeric_split,
            ColumnType::Categorical => !numeric_split,
        };
        if !matches {
            return Err(format!(
                "node {index}: split type does not match {kind:?} column '{column}'"
            ));
        }
        *column_index = position;
    }

    Ok(())
}

fn score_tree(tree: &Tree, cells: &[Cell<'_>]) -> Result<f64, PredictorError> {
    let mut index = 0;
    loop {
        let node = tree
            .nodes
            .get(index)
            .ok_or_else(|| PredictorError::Scoring(format!("dangling tree node {index}")))?;

        index = match node {
            TreeNode::Leaf { value } => return Ok(*value),
            TreeNode::Numeric {
                threshold,
                left,
                right,
                missing_left,
                column_index,
                ..
            } => {
                let go_left = match cells.get(*column_index) {
                    Some(Cell::Number(v)) => *v < *threshold,
                    _ => *missing_left,
                };
                if go_left {
                    *left
                } else {
                    *right
                }
            }
            TreeNode::Categorical {
                left_levels,
                left,
                right,
                missing_left,
                column_index,
                ..
            } => {
                let go_left = match cells.get(*column_index) {
                    Some(Cell::Level(level)) => left_levels.iter().any(|l| l == level),
                    _ => *missing_left,
                };
                if go_left {
                    *left
                } else {
                    *right
                }
            }
        };
    }
}

fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Predictor backed by a GBM artifact loaded from disk.
#[derive(Debug)]
pub struct GbmPredictor {
    model: GbmModel,
    fingerprint: String,
}

impl GbmPredictor {
    /// Load the artifact `<model_dir>/<model_id>.json`.
    ///
    /// # Errors
    /// Returns error if the artifact is missing, unreadable or invalid.
    pub fn load(model_dir: &Path, model_id: &str) -> Result<Self, ModelError> {
        if model_id.is_empty()
            || model_id.contains(['/', '\\'])
            || model_id.starts_with('.')
        {
            return Err(ModelError::Invalid(format!(
                "model identifier {model_id:?} is not a plain artifact name"
            )));
        }

        let path = model_dir.join(format!("{model_id}.json"));
        let bytes = std::fs::read(&path).map_err(|source| ModelError::Io {
            path: path.clone(),
            source,
        })?;
        let fingerprint = sha256_hex_bytes(&bytes);

        let content = String::from_utf8(bytes)
            .map_err(|_| ModelError::Invalid("artifact is not valid UTF-8".into()))?;
        let model = GbmModel::from_json(&content)?;

        if model.model_id != model_id {
            tracing::warn!(
                "Artifact {:?} declares model_id {:?}, expected {:?}",
                path,
                model.model_id,
                model_id
            );
        }

        tracing::info!(
            "Loaded model from {:?} (classes={}, columns={}, rounds={}, sha256={})",
            path,
            model.response_domain.len(),
            model.columns.len(),
            model.trees.len(),
            fingerprint
        );

        Ok(Self { model, fingerprint })
    }

    /// SHA-256 of the artifact bytes, lowercase hex.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }


    #[must_use]
    pub fn model(&self) -> &GbmModel {
        &self.model
    }
}

impl Predictor for GbmPredictor {
    fn predict(&self, record: &FeatureRecord) -> Result<String, PredictorError> {
        let probabilities = self.model.class_probabilities(record)?;

        // Ties resolve to the earliest class in response_domain order.
        let (label, probability) = probabilities
            .iter()
            .fold(None::<&(String, f64)>, |best, candidate| match best {
                Some(b) if b.1 >= candidate.1 => Some(b),
                _ => Some(candidate),
            })
            .ok_or_else(|| PredictorError::Scoring("model produced no classes".into()))?;

        tracing::debug!(
            "Scored record: category={}, probability={:.3}",
            label,
            probability
        );

        Ok(label.clone())
    }

    fn describe(&self) -> String {
        format!("{} (sha256 {})", self.model.model_id, &self.fingerprint[..12])
    }
}
