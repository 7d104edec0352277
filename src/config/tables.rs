use super::defaults;
use super::models::{AppConfig, LogLevel, OutputFormat, SplitMode};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    input: InputConfig,
    #[serde(default)]
    splitting: SplittingConfig,
    #[serde(default)]
    output: OutputConfig,
    #[serde(default)]
    model: ModelConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            input_path: tables.input.path,
            mode: tables.splitting.mode,
            output_path: tables.output.path,
            output_format: tables.output.format,
            model_path: tables.model.path,
            model_download_url: tables.model.download_url,
            model_auto_download: tables.model.auto_download,
            model_download_timeout_secs: tables.model.download_timeout_secs,
            model_sha256: tables.model.sha256,
            log_level: tables.logging.log_level,
            log_file: tables.logging.file,
            log_max_file_bytes: tables.logging.max_file_bytes,
            log_keep_files: tables.logging.keep_files,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            input: InputConfig {
                path: config.input_path.clone(),
            },
            splitting: SplittingConfig { mode: config.mode },
            output: OutputConfig {
                path: config.output_path.clone(),
                format: config.output_format,
            },
            model: ModelConfig {
                path: config.model_path.clone(),
                download_url: config.model_download_url.clone(),
                auto_download: config.model_auto_download,
                download_timeout_secs: config.model_download_timeout_secs,
                sha256: config.model_sha256.clone(),
            },
            logging: LoggingConfig {
                log_level: config.log_level,
                file: config.log_file.clone(),
                max_file_bytes: config.log_max_file_bytes,
                keep_files: config.log_keep_files,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct InputConfig {
    #[serde(default = "defaults::default_input_path")]
    path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            path: defaults::default_input_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct SplittingConfig {
    #[serde(default = "defaults::default_split_mode")]
    mode: SplitMode,
}

impl Default for SplittingConfig {
    fn default() -> Self {
        SplittingConfig {
            mode: defaults::default_split_mode(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
struct OutputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ModelConfig {
    #[serde(default = "defaults::default_model_path")]
    path: String,
    #[serde(default = "defaults::default_model_download_url")]
    download_url: String,
    #[serde(default = "defaults::default_model_auto_download")]
    auto_download: bool,
    #[serde(default = "defaults::default_model_download_timeout_secs")]
    download_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sha256: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            path: defaults::default_model_path(),
            download_url: defaults::default_model_download_url(),
            auto_download: defaults::default_model_auto_download(),
            download_timeout_secs: defaults::default_model_download_timeout_secs(),
            sha256: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
    #[serde(default = "defaults::default_log_file")]
    file: String,
    #[serde(default = "defaults::default_log_max_file_bytes")]
    max_file_bytes: u64,
    #[serde(default = "defaults::default_log_keep_files")]
    keep_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
            file: defaults::default_log_file(),
            max_file_bytes: defaults::default_log_max_file_bytes(),
            keep_files: defaults::default_log_keep_files(),
        }
    }
}
