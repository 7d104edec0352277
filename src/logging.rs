//! Tracing setup: a stderr layer plus an optional size-rotated log file.
//!
//! Logging comes up before the config is read so config problems are
//! reported; [`apply_config`] then swaps in the configured level and attaches
//! the file layer through reload handles. `tracing-appender` only rolls by
//! time, so the file layer writes through [`SizeRotatingFile`] behind
//! `tracing_appender::non_blocking`.

use crate::config::AppConfig;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{Subscriber, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::Layered;
use tracing_subscriber::{EnvFilter, Layer, Registry, prelude::*, reload};

type FilteredRegistry = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type FileLayer = Option<Box<dyn Layer<FilteredRegistry> + Send + Sync>>;

/// Handles for adjusting the installed subscriber once the config is known.
pub struct LogHandles {
    filter: reload::Handle<EnvFilter, Registry>,
    file: reload::Handle<FileLayer, FilteredRegistry>,
    env_override: bool,
}

/// Install the global subscriber: `RUST_LOG` or `debug`, stderr only.
pub fn init_tracing() -> LogHandles {
    let (subscriber, handles) = build_subscriber();
    subscriber.init();
    warn!("Logging initialized; override level with config log_level or RUST_LOG");
    handles
}

fn build_subscriber() -> (impl Subscriber + Send + Sync + 'static, LogHandles) {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let env_override = env_filter.is_some();
    let (filter_layer, filter) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("debug")));
    let (file_layer, file) = reload::Layer::new(FileLayer::None);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let subscriber = tracing_subscriber::registry()
        .with(filter_layer)
        .with(file_layer)
        .with(stderr_layer);
    (
        subscriber,
        LogHandles {
            filter,
            file,
            env_override,
        },
    )
}

/// Apply the configured level (unless `RUST_LOG` is set) and attach the log
/// file. The returned guard must outlive all logging or buffered file
/// records are lost.
pub fn apply_config(handles: &LogHandles, config: &AppConfig) -> Option<WorkerGuard> {
    set_log_level(handles, config.log_level.as_filter_str());

    let log_file = config.log_file.trim();
    if log_file.is_empty() {
        info!("Log file disabled");
        return None;
    }
    let appender = match SizeRotatingFile::open(
        log_file,
        config.log_max_file_bytes,
        config.log_keep_files,
    ) {
        Ok(appender) => appender,
        Err(err) => {
            warn!(path = %log_file, "Failed to open log file, logging to stderr only: {err}");
            return None;
        }
    };
    let (file_writer, guard) = tracing_appender::non_blocking(appender);
    let layer: Box<dyn Layer<FilteredRegistry> + Send + Sync> = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(file_writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .boxed();
    if let Err(err) = handles.file.reload(Some(layer)) {
        warn!(path = %log_file, "Failed to attach log file: {err}");
        return None;
    }
    info!(
        path = %log_file,
        max_bytes = config.log_max_file_bytes,
        keep_files = config.log_keep_files,
        "Attached log file"
    );
    Some(guard)
}

fn set_log_level(handles: &LogHandles, level: &str) {
    if handles.env_override {
        info!(%level, "RUST_LOG is set; ignoring configured log level");
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handles.filter.reload(parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}

/// Append-mode log file that rolls over once it reaches `max_bytes`.
///
/// On rollover `<file>` becomes `<file>.1`, `<file>.1` becomes `<file>.2`,
/// and so on; at most `keep` rolled files are retained.
#[derive(Debug)]
pub struct SizeRotatingFile {
    path: PathBuf,
    max_bytes: u64,
    keep: usize,
    file: File,
    written: u64,
}

impl SizeRotatingFile {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, keep: usize) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes: max_bytes.max(1),
            keep,
            file,
            written,
        })
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.keep == 0 {
            self.file = File::create(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        let oldest = rolled_path(&self.path, self.keep);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.keep).rev() {
            let from = rolled_path(&self.path, index);
            if from.exists() {
                fs::rename(&from, rolled_path(&self.path, index + 1))?;
            }
        }
        fs::rename(&self.path, rolled_path(&self.path, 1))?;
        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for SizeRotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let count = self.file.write(buf)?;
        self.written += count as u64;
        Ok(count)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn rolled_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}
