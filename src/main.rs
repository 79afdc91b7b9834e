//! Patient Risk Predictor
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use patient_risk_predictor::adapters::sanitize::SanitizingMakeWriter;
use patient_risk_predictor::tui::App;
use patient_risk_predictor::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Logs must not reach the terminal while the TUI owns it:
    // - interactive TTY: log to a file
    // - non-interactive: log to stdout
    let interactive = std::io::stdout().is_terminal();

    let (writer, _guard) = if config.log_mode.uses_file(interactive) {
        if let Some(parent) = config.log_file.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting Patient Risk Predictor...");

    let mut app = App::new(config);
    app.run()?;

    tracing::info!("Patient Risk Predictor shutdown complete.");
    Ok(())
}
