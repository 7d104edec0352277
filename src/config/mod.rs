//! Configuration loading for the sentence splitter.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! the fixed defaults so a bare checkout still processes `test_1.txt`.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, serialize_config};
pub use models::{AppConfig, LogLevel, OutputFormat, SplitMode};
