use crate::completeness;
use crate::config::{OutputFormat, SplitMode};
use crate::document_loader::load_document;
use crate::error::{Result, SplitterError};
use crate::nlp::{Annotator, SentenceSpan};
use crate::output::{OutputRecord, SentenceRecord, number_sentences, write_json, write_labeled};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Load → annotate → (filter) → write, for one file.
pub struct Pipeline<A: Annotator> {
    annotator: A,
    mode: SplitMode,
    format: OutputFormat,
}

/// What one `process_file` run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSummary {
    pub mode: SplitMode,
    pub sentences: usize,
    pub output: PathBuf,
}

impl<A: Annotator> Pipeline<A> {
    pub fn new(annotator: A, mode: SplitMode, format: OutputFormat) -> Self {
        Self {
            annotator,
            mode,
            format,
        }
    }

    /// Every detected sentence, trimmed, unfiltered.
    pub fn split_sentences(&self, text: &str) -> Result<Vec<String>> {
        let spans = self.annotate(text)?;
        let sentences: Vec<String> = spans
            .iter()
            .map(|span| span.text.trim().to_string())
            .collect();
        info!(count = sentences.len(), "Split text into sentences");
        Ok(sentences)
    }

    /// Only complete sentences, numbered from 1. Rejected candidates do not
    /// consume an id.
    pub fn split_complete_sentences(&self, text: &str) -> Result<Vec<SentenceRecord>> {
        let spans = self.annotate(text)?;
        let mut sentences = Vec::new();
        let mut next_id = 1u64;
        for span in &spans {
            let text = span.text.trim();
            match completeness::check(text, &span.tokens) {
                Ok(()) => {
                    sentences.push(SentenceRecord {
                        id: next_id,
                        text: text.to_string(),
                    });
                    next_id += 1;
                }
                Err(reason) => {
                    warn!(sentence = %text, %reason, "Skipping incomplete sentence");
                }
            }
        }
        info!(
            count = sentences.len(),
            rejected = spans.len() - sentences.len(),
            "Split text into complete sentences"
        );
        Ok(sentences)
    }

    pub fn process_file(&self, input: &Path, output: &Path) -> Result<ProcessSummary> {
        info!(
            input = %input.display(),
            output = %output.display(),
            mode = %self.mode,
            format = %self.format,
            "Processing file"
        );
        let result = self.process_file_inner(input, output);
        if let Err(err) = &result {
            error!(input = %input.display(), "Failed to process file: {err}");
        }
        result
    }

    fn process_file_inner(&self, input: &Path, output: &Path) -> Result<ProcessSummary> {
        let text = load_document(input)?;

        let count = match (self.mode, self.format) {
            (SplitMode::All, OutputFormat::Json) => {
                let record = OutputRecord::new(self.split_sentences(&text)?);
                write_json(output, &record)?;
                record.total_sentences()
            }
            (SplitMode::All, OutputFormat::Labeled) => {
                let sentences = number_sentences(self.split_sentences(&text)?);
                write_labeled(output, &sentences)?;
                sentences.len()
            }
            (SplitMode::Complete, OutputFormat::Json) => {
                let record = OutputRecord::new(self.split_complete_sentences(&text)?);
                write_json(output, &record)?;
                record.total_sentences()
            }
            (SplitMode::Complete, OutputFormat::Labeled) => {
                let sentences = self.split_complete_sentences(&text)?;
                write_labeled(output, &sentences)?;
                sentences.len()
            }
        };
        info!(path = %output.display(), sentences = count, "Saved results");

        Ok(ProcessSummary {
            mode: self.mode,
            sentences: count,
            output: output.to_path_buf(),
        })
    }

    fn annotate(&self, text: &str) -> Result<Vec<SentenceSpan>> {
        let spans = self
            .annotator
            .annotate(text)
            .and_then(|spans| validate_spans(text, &spans).map(|()| spans));
        spans.inspect_err(|err| {
            error!("Sentence annotation failed: {err}");
        })
    }
}

/// Spans must be in order, non-overlapping, on char boundaries of `text`,
/// and hold only tokens inside themselves.
fn validate_spans(text: &str, spans: &[SentenceSpan]) -> Result<()> {
    let mut previous_end = 0;
    for (index, span) in spans.iter().enumerate() {
        let range = &span.span;
        if range.start < previous_end || range.start > range.end || range.end > text.len() {
            return Err(SplitterError::SentenceProcessing(format!(
                "sentence {index} has span {range:?}, out of order or outside the text (length {})",
                text.len()
            )));
        }
        if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
            return Err(SplitterError::SentenceProcessing(format!(
                "sentence {index} span {range:?} splits a character"
            )));
        }
        if let Some(token) = span
            .tokens
            .iter()
            .find(|token| token.span.start < range.start || token.span.end > range.end)
        {
            return Err(SplitterError::SentenceProcessing(format!(
                "token {:?} at {:?} lies outside sentence {index} span {range:?}",
                token.text, token.span
            )));
        }
        previous_end = range.end;
    }
    Ok(())
}
