//! Output records and writers.
//!
//! Two on-disk shapes exist: a pretty-printed JSON object
//! `{"total_sentences": n, "sentences": [...]}` and a labeled text listing of
//! `ID:` / `Text:` / separator blocks.

use crate::error::{Result, SplitterError};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{error, info};

pub const SEPARATOR_WIDTH: usize = 80;

/// An accepted sentence with its 1-based position among accepted sentences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceRecord {
    pub id: u64,
    pub text: String,
}

/// The serialized result. `total_sentences` always equals `sentences.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord<T> {
    total_sentences: usize,
    sentences: Vec<T>,
}

impl<T> OutputRecord<T> {
    pub fn new(sentences: Vec<T>) -> Self {
        Self {
            total_sentences: sentences.len(),
            sentences,
        }
    }

    pub fn total_sentences(&self) -> usize {
        self.total_sentences
    }
}

/// Assign ids 1..=n to plain sentences in order.
pub fn number_sentences(sentences: Vec<String>) -> Vec<SentenceRecord> {
    sentences
        .into_iter()
        .zip(1u64..)
        .map(|(text, id)| SentenceRecord { id, text })
        .collect()
}

pub fn write_json<T: Serialize>(path: &Path, record: &OutputRecord<T>) -> Result<()> {
    write_with(path, |writer| {
        serde_json::to_writer_pretty(writer, record).map_err(std::io::Error::from)
    })?;
    info!(
        path = %path.display(),
        total_sentences = record.total_sentences(),
        "Wrote JSON output"
    );
    Ok(())
}

pub fn write_labeled(path: &Path, sentences: &[SentenceRecord]) -> Result<()> {
    write_with(path, |writer| write_labeled_to(writer, sentences))?;
    info!(
        path = %path.display(),
        total_sentences = sentences.len(),
        "Wrote labeled text output"
    );
    Ok(())
}

pub fn write_labeled_to<W: Write>(
    writer: &mut W,
    sentences: &[SentenceRecord],
) -> std::io::Result<()> {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    for sentence in sentences {
        writeln!(writer, "ID: {}", sentence.id)?;
        writeln!(writer, "Text: {}", sentence.text)?;
        writeln!(writer, "{separator}")?;
    }
    Ok(())
}

fn write_with<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let result = File::create(path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        body(&mut writer)?;
        writer.flush()
    });
    result.map_err(|source| {
        error!(path = %path.display(), "Failed to write output: {source}");
        SplitterError::FileWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}
