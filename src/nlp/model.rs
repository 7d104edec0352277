//! Pretrained model loading with a one-shot download fallback.

use crate::config::AppConfig;
use crate::error::{Result, SplitterError};
use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// Where the tokenizer binary lives and how to fetch it when it does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    pub path: PathBuf,
    pub download_url: String,
    pub auto_download: bool,
    pub timeout: Duration,
    pub sha256: Option<String>,
}

impl ModelSource {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            path: PathBuf::from(&config.model_path),
            download_url: config.model_download_url.clone(),
            auto_download: config.model_auto_download,
            timeout: Duration::from_secs(config.model_download_timeout_secs.max(1)),
            sha256: config
                .model_sha256
                .clone()
                .map(|hash| hash.trim().to_ascii_lowercase())
                .filter(|hash| !hash.is_empty()),
        }
    }
}

/// Load the `nlprule` tokenizer described by `source`.
pub fn load_tokenizer(source: &ModelSource) -> Result<nlprule::Tokenizer> {
    load_with_retry(
        source,
        |path| nlprule::Tokenizer::new(path).map_err(|err| err.to_string()),
        download_model,
    )
}

/// Try `load`; on failure download once and try again.
///
/// A second failure, a disabled download, or a failed download all end in
/// [`SplitterError::ModelUnavailable`] / [`SplitterError::ModelDownload`].
pub fn load_with_retry<T, L, D>(source: &ModelSource, mut load: L, download: D) -> Result<T>
where
    L: FnMut(&Path) -> std::result::Result<T, String>,
    D: FnOnce(&ModelSource) -> Result<()>,
{
    match load(&source.path) {
        Ok(model) => {
            info!(path = %source.path.display(), "Loaded language model");
            return Ok(model);
        }
        Err(reason) if !source.auto_download => {
            error!(path = %source.path.display(), "Language model not found: {reason}");
            return Err(SplitterError::ModelUnavailable {
                path: source.path.clone(),
                reason,
            });
        }
        Err(reason) => {
            error!(
                path = %source.path.display(),
                url = %source.download_url,
                "Language model not found, downloading: {reason}"
            );
        }
    }

    download(source)?;

    match load(&source.path) {
        Ok(model) => {
            info!(path = %source.path.display(), "Language model download complete");
            Ok(model)
        }
        Err(reason) => {
            error!(path = %source.path.display(), "Downloaded language model failed to load: {reason}");
            Err(SplitterError::ModelUnavailable {
                path: source.path.clone(),
                reason,
            })
        }
    }
}

/// Fetch the model binary and store it at `source.path`.
pub fn download_model(source: &ModelSource) -> Result<()> {
    let download_err = |reason: String| SplitterError::ModelDownload {
        url: source.download_url.clone(),
        reason,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(source.timeout)
        .build()
        .map_err(|err| download_err(err.to_string()))?;
    let response = client
        .get(&source.download_url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .map_err(|err| download_err(err.to_string()))?;
    let payload = response
        .bytes()
        .map_err(|err| download_err(err.to_string()))?;
    info!(
        url = %source.download_url,
        bytes = payload.len(),
        "Fetched language model payload"
    );

    let model = decode_payload(&source.download_url, &payload).map_err(download_err)?;
    if let Some(expected) = &source.sha256 {
        verify_checksum(&model, expected).map_err(download_err)?;
    }
    store_model(&source.path, &model)
}

/// Gunzip `.gz` downloads; anything else is stored as fetched.
fn decode_payload(url: &str, payload: &[u8]) -> std::result::Result<Vec<u8>, String> {
    if !url.to_ascii_lowercase().ends_with(".gz") {
        return Ok(payload.to_vec());
    }
    let mut decoded = Vec::new();
    GzDecoder::new(payload)
        .read_to_end(&mut decoded)
        .map_err(|err| format!("gzip decode failed: {err}"))?;
    Ok(decoded)
}

fn verify_checksum(bytes: &[u8], expected: &str) -> std::result::Result<(), String> {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let actual = format!("{:x}", hasher.finalize());
    if actual != expected {
        warn!(%expected, %actual, "Language model checksum mismatch");
        return Err(format!("sha256 mismatch: expected {expected}, got {actual}"));
    }
    Ok(())
}

/// Written through a sibling `.partial` file; `path` only ever holds a
/// complete model.
fn store_model(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| SplitterError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let partial = path.with_extension("partial");
    fs::write(&partial, bytes).map_err(write_err)?;
    fs::rename(&partial, path).map_err(write_err)?;
    info!(path = %path.display(), bytes = bytes.len(), "Stored language model");
    Ok(())
}
