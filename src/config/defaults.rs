pub(crate) fn default_input_path() -> String {
    "test_1.txt".to_string()
}

pub(crate) fn default_split_mode() -> crate::config::SplitMode {
    crate::config::SplitMode::Complete
}

/// Output file used when neither the config nor the command line names one.
pub(crate) fn default_output_path(mode: crate::config::SplitMode) -> String {
    match mode {
        crate::config::SplitMode::All => "test_1_output.json".to_string(),
        crate::config::SplitMode::Complete => "sentences_v2.txt".to_string(),
    }
}

pub(crate) fn default_model_path() -> String {
    "models/en_tokenizer.bin".to_string()
}

pub(crate) fn default_model_download_url() -> String {
    "https://github.com/bminixhofer/nlprule/releases/download/0.6.4/en_tokenizer.bin.gz"
        .to_string()
}

pub(crate) fn default_model_auto_download() -> bool {
    true
}

pub(crate) fn default_model_download_timeout_secs() -> u64 {
    120
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}

pub(crate) fn default_log_file() -> String {
    "sentence_splitter.log".to_string()
}

pub(crate) fn default_log_max_file_bytes() -> u64 {
    500 * 1024 * 1024
}

pub(crate) fn default_log_keep_files() -> usize {
    5
}
