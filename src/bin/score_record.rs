//! Offline scoring utility.
//!
//! Scores one feature record with the configured model, without the TUI.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin score_record -- <record.json> [--model-dir <dir>] [--model-id <id>]
//! ```
//!
//! The record uses the model column names as keys, for example
//! `{"Age": "54", "Gender": "Female", "Blood Type": "A+", ...}`. Missing keys
//! take the form's initial values.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use patient_risk_predictor::adapters::gbm::GbmPredictor;
use patient_risk_predictor::ports::Predictor;
use patient_risk_predictor::{AppConfig, FeatureRecord, PredictionResult};

const USAGE: &str = "Usage: score_record <record.json> [--model-dir <dir>] [--model-id <id>]";

struct Args {
    record_path: PathBuf,
    model_dir: Option<PathBuf>,
    model_id: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut record_path = None;
    let mut model_dir = None;
    let mut model_id = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--model-dir" => {
                model_dir = Some(PathBuf::from(args.next().context(USAGE)?));
            }
            "--model-id" => {
                model_id = Some(args.next().context(USAGE)?);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other if record_path.is_none() && !other.starts_with("--") => {
                record_path = Some(PathBuf::from(other));
            }
            other => bail!("Unexpected argument {other:?}\n{USAGE}"),
        }
    }

    Ok(Args {
        record_path: record_path.context(USAGE)?,
        model_dir,
        model_id,
    })
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let mut config = AppConfig::from_env();
    if let Some(dir) = args.model_dir {
        config.model_dir = dir;
    }
    if let Some(id) = args.model_id {
        config.model_id = id;
    }

    let content = std::fs::read_to_string(&args.record_path)
        .with_context(|| format!("Failed to read {:?}", args.record_path))?;
    let record: FeatureRecord = serde_json::from_str(&content)
        .with_context(|| format!("Invalid feature record in {:?}", args.record_path))?;

    let predictor = GbmPredictor::load(&config.model_dir, &config.model_id)
        .with_context(|| format!("Failed to load model {:?}", config.model_id))?;

    let category = predictor
        .predict(&record)
        .context("An error occurred during prediction")?;
    let result = PredictionResult::from_category(category);

    println!("Model:              {}", predictor.describe());
    println!("Predicted Category: {}", result.category);
    println!("Danger Level:       {}", result.danger_level);
    println!("Color:              {}", result.color.hex());

    let probabilities = predictor.model().class_probabilities(&record)?;
    println!("Class probabilities:");
    for (label, probability) in probabilities {
        println!("  {label:<12} {probability:.4}");
    }

    Ok(())
}
