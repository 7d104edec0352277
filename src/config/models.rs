use serde::Deserialize;

/// Flattened run configuration; read from and written to the sectioned TOML
/// through [`super::tables`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub input_path: String,
    pub mode: SplitMode,
    pub output_path: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub model_path: String,
    pub model_download_url: String,
    pub model_auto_download: bool,
    pub model_download_timeout_secs: u64,
    pub model_sha256: Option<String>,
    pub log_level: LogLevel,
    pub log_file: String,
    pub log_max_file_bytes: u64,
    pub log_keep_files: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            input_path: crate::config::defaults::default_input_path(),
            mode: crate::config::defaults::default_split_mode(),
            output_path: None,
            output_format: None,
            model_path: crate::config::defaults::default_model_path(),
            model_download_url: crate::config::defaults::default_model_download_url(),
            model_auto_download: crate::config::defaults::default_model_auto_download(),
            model_download_timeout_secs:
                crate::config::defaults::default_model_download_timeout_secs(),
            model_sha256: None,
            log_level: crate::config::defaults::default_log_level(),
            log_file: crate::config::defaults::default_log_file(),
            log_max_file_bytes: crate::config::defaults::default_log_max_file_bytes(),
            log_keep_files: crate::config::defaults::default_log_keep_files(),
        }
    }
}

impl AppConfig {
    /// Output path from config, or the fixed default for the active mode.
    pub fn resolved_output_path(&self) -> String {
        self.output_path
            .clone()
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| crate::config::defaults::default_output_path(self.mode))
    }

    /// Explicit format, or JSON for `all` and labeled text for `complete`.
    pub fn resolved_output_format(&self) -> OutputFormat {
        self.output_format.unwrap_or(match self.mode {
            SplitMode::All => OutputFormat::Json,
            SplitMode::Complete => OutputFormat::Labeled,
        })
    }
}

/// Which sentences make it into the output.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SplitMode {
    /// Every detected sentence, unfiltered.
    All,
    /// Only sentences passing the completeness heuristic, with sequential ids.
    Complete,
}

impl Default for SplitMode {
    fn default() -> Self {
        SplitMode::Complete
    }
}

impl std::fmt::Display for SplitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SplitMode::All => "all",
            SplitMode::Complete => "complete",
        };
        write!(f, "{}", label)
    }
}

/// On-disk representation of the result.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Json,
    Labeled,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OutputFormat::Json => "json",
            OutputFormat::Labeled => "labeled",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
