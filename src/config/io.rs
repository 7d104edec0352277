use super::models::AppConfig;
use super::tables::ConfigTables;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str::<ConfigTables>(contents).map(AppConfig::from)
}

pub fn serialize_config(config: &AppConfig) -> Result<String, toml::ser::Error> {
    toml::to_string(&ConfigTables::from(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LogLevel, OutputFormat, SplitMode};
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer lock")).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn empty_config_matches_defaults() {
        let cfg = parse_config("").expect("empty TOML is valid");
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.resolved_output_path(), "sentences_v2.txt");
        assert_eq!(cfg.resolved_output_format(), OutputFormat::Labeled);
    }

    #[test]
    fn partial_tables_fill_missing_keys_from_defaults() {
        let cfg = parse_config(
            r#"
            [splitting]
            mode = "all"

            [logging]
            log_level = "warn"
            "#,
        )
        .expect("partial TOML should parse");

        assert_eq!(cfg.mode, SplitMode::All);
        assert_eq!(cfg.log_level, LogLevel::Warn);
        assert_eq!(cfg.input_path, "test_1.txt");
        assert_eq!(cfg.log_file, "sentence_splitter.log");
        assert_eq!(cfg.log_max_file_bytes, 500 * 1024 * 1024);
        assert_eq!(cfg.resolved_output_path(), "test_1_output.json");
        assert_eq!(cfg.resolved_output_format(), OutputFormat::Json);
    }

    #[test]
    fn explicit_output_overrides_mode_defaults() {
        let cfg = parse_config(
            r#"
            [output]
            path = "out/result.json"
            format = "json"
            "#,
        )
        .expect("output table should parse");

        assert_eq!(cfg.mode, SplitMode::Complete);
        assert_eq!(cfg.resolved_output_path(), "out/result.json");
        assert_eq!(cfg.resolved_output_format(), OutputFormat::Json);
    }

    #[test]
    fn blank_output_path_uses_mode_default() {
        let cfg = parse_config("[output]\npath = \"  \"\n").expect("should parse");
        assert_eq!(cfg.resolved_output_path(), "sentences_v2.txt");
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let cfg = parse_config(include_str!("../../conf/config.toml"))
            .expect("shipped config should parse");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(parse_config("[splitting]\nmode = \"fragments\"\n").is_err());
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut cfg = AppConfig::default();
        cfg.mode = SplitMode::All;
        cfg.output_format = Some(OutputFormat::Labeled);
        cfg.model_sha256 = Some("abc123".to_string());

        let serialized = serialize_config(&cfg).expect("config should serialize");
        assert!(serialized.contains("[splitting]"));
        let parsed = parse_config(&serialized).expect("serialized config should parse");
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn load_config_falls_back_on_missing_or_invalid_file() {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        let missing = std::env::temp_dir().join(format!("sentence-splitter-missing-{nonce}.toml"));
        assert_eq!(load_config(&missing), AppConfig::default());

        let invalid = std::env::temp_dir().join(format!("sentence-splitter-invalid-{nonce}.toml"));
        fs::write(&invalid, "[splitting\nmode = ").expect("write invalid config");
        assert_eq!(load_config(&invalid), AppConfig::default());
        let _ = fs::remove_file(invalid);
    }

    #[test]
    fn invalid_config_is_reported_through_active_subscriber() {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        let invalid =
            std::env::temp_dir().join(format!("sentence-splitter-reported-{nonce}.toml"));
        fs::write(&invalid, "[logging]\nlog_level = \"loud\"\n").expect("write invalid config");

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let cfg = tracing::subscriber::with_default(subscriber, || load_config(&invalid));
        let _ = fs::remove_file(invalid);

        assert_eq!(cfg, AppConfig::default());
        let output = logs.contents();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("Invalid config TOML"), "{output}");
    }
}
