use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod exchange;
pub mod form;
pub mod list;
pub mod shell;
pub mod state;
pub mod upload;

pub use client::{Classifier, HttpClassifier, TextRequest};
pub use config::AppConfig;
pub use error::{ClientError, ConfigError, SubmissionError, UploadError};
pub use exchange::{Exchange, ExchangeLog};
pub use state::AppState;

pub async fn run() -> Result<()> {
    info!("Emailer starting...");
    config::log_environment_status();

    let config = AppConfig::load().context("classifier endpoint is not configured")?;
    let classifier = HttpClassifier::new(config.endpoint.clone())
        .context("failed to build HTTP client")?;
    info!("Classifier endpoint: {}", classifier.endpoint());

    let state = AppState::new(Arc::new(classifier));
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    shell::run(&state, stdin).await
}
