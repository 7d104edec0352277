//! Entry point for the sentence splitter.
//!
//! Responsibilities here are intentionally minimal:
//! - Set up logging, then load configuration from `conf/config.toml` (or
//!   `SENTENCE_SPLITTER_CONFIG`) and apply its logging settings.
//! - Resolve input/output paths from config and command-line arguments.
//! - Load the language model and run the pipeline once.

mod completeness;
mod config;
mod document_loader;
mod error;
mod logging;
mod nlp;
mod output;
mod pipeline;

use crate::config::{AppConfig, load_config, serialize_config};
use crate::logging::{apply_config, init_tracing};
use crate::nlp::NlpruleAnnotator;
use crate::nlp::model::ModelSource;
use crate::pipeline::Pipeline;
use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const CONFIG_ENV_VAR: &str = "SENTENCE_SPLITTER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "conf/config.toml";

fn main() {
    let log_handles = init_tracing();
    let config = load_config(&config_path());
    let log_guard = apply_config(&log_handles, &config);
    if let Err(err) = run(config) {
        error!("{err:?}");
        drop(log_guard);
        std::process::exit(1);
    }
}

fn run(mut config: AppConfig) -> Result<()> {
    match serialize_config(&config) {
        Ok(rendered) => debug!(config = %rendered, "Effective configuration"),
        Err(err) => warn!("Failed to render effective configuration: {err}"),
    }

    let args = parse_args(env::args().skip(1))?;
    if let Some(input) = args.input {
        config.input_path = input.to_string_lossy().into_owned();
    }
    if let Some(output) = args.output {
        config.output_path = Some(output.to_string_lossy().into_owned());
    }

    let input = PathBuf::from(&config.input_path);
    let output = PathBuf::from(config.resolved_output_path());
    let format = config.resolved_output_format();
    info!(
        input = %input.display(),
        output = %output.display(),
        mode = %config.mode,
        %format,
        "Starting sentence splitter"
    );

    let source = ModelSource::from_config(&config);
    info!(
        path = %source.path.display(),
        auto_download = source.auto_download,
        "Active model configuration"
    );
    let annotator = NlpruleAnnotator::load(&source).context("Failed to load the language model")?;

    let pipeline = Pipeline::new(annotator, config.mode, format);
    let summary = pipeline
        .process_file(&input, &output)
        .with_context(|| format!("Failed to process {}", input.display()))?;
    info!(
        mode = %summary.mode,
        sentences = summary.sentences,
        output = %summary.output.display(),
        "Processing complete"
    );
    Ok(())
}

fn config_path() -> PathBuf {
    env::var_os(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH).to_path_buf())
}

/// Positional path overrides from the command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut args = args.into_iter();
    let parsed = CliArgs {
        input: args.next().map(PathBuf::from),
        output: args.next().map(PathBuf::from),
    };
    if let Some(extra) = args.next() {
        return Err(anyhow!(
            "Unexpected argument {extra:?}. Usage: sentence-splitter [INPUT [OUTPUT]]"
        ));
    }
    Ok(parsed)
}
