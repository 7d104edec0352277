//! Document loading utilities.
//!
//! Knows how to turn an input file into one `String`: plain files are read as
//! UTF-8 verbatim, `.docx` files are unpacked and their body paragraphs joined
//! with newlines.

use crate::error::{Result, SplitterError};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{debug, error, info};

const DOCUMENT_PART: &str = "word/document.xml";

/// Load the textual content of `path`, picking the reader by extension.
pub fn load_document(path: &Path) -> Result<String> {
    let result = if is_docx(path) {
        load_docx_text(path)
    } else {
        load_plain_text(path)
    };
    if let Err(err) = &result {
        error!(path = %path.display(), "Failed to load document: {err}");
    }
    result
}

pub fn load_plain_text(path: &Path) -> Result<String> {
    info!(path = %path.display(), "Loading plain text content");
    let text = fs::read_to_string(path).map_err(|source| SplitterError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    info!(total_chars = text.len(), "Finished loading plain text content");
    Ok(text)
}

pub fn load_docx_text(path: &Path) -> Result<String> {
    info!(path = %path.display(), "Loading word document content");
    let file = File::open(path).map_err(|source| SplitterError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|err| SplitterError::document_parse(path, err))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|err| SplitterError::document_parse(path, format!("{DOCUMENT_PART}: {err}")))?
        .read_to_string(&mut xml)
        .map_err(|err| SplitterError::document_parse(path, format!("{DOCUMENT_PART}: {err}")))?;

    let paragraphs =
        body_paragraphs(&xml).map_err(|reason| SplitterError::document_parse(path, reason))?;
    info!(
        paragraphs = paragraphs.len(),
        "Finished loading word document content"
    );
    Ok(paragraphs.join("\n"))
}

/// Extract the text of every paragraph that sits directly under `w:body`.
///
/// Run text (`w:t`) is concatenated; `w:tab` becomes a tab and `w:br`/`w:cr`
/// a newline. Paragraphs nested in tables or text boxes are skipped.
fn body_paragraphs(xml: &str) -> std::result::Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| format!("malformed XML at byte {}: {err}", reader.buffer_position()))?;
        match event {
            Event::Start(start) => {
                let name = start.local_name().as_ref().to_vec();
                if name == b"p" && parent_is_body(&stack) {
                    current = Some(String::new());
                }
                stack.push(name);
            }
            Event::Empty(empty) => {
                let name = empty.local_name();
                match name.as_ref() {
                    b"p" if parent_is_body(&stack) => paragraphs.push(String::new()),
                    b"tab" if in_run(&stack) => push_text(&mut current, "\t"),
                    b"br" | b"cr" if in_run(&stack) => push_text(&mut current, "\n"),
                    _ => {}
                }
            }
            Event::Text(text) => {
                if in_run_text(&stack) {
                    let unescaped = text.unescape().map_err(|err| err.to_string())?;
                    push_text(&mut current, &unescaped);
                }
            }
            Event::CData(data) => {
                if in_run_text(&stack) {
                    push_text(&mut current, &String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                let closed = stack.pop();
                if closed.as_deref() == Some(b"p".as_slice()) && parent_is_body(&stack) {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(paragraphs = paragraphs.len(), "Parsed document body");
    Ok(paragraphs)
}

fn parent_is_body(stack: &[Vec<u8>]) -> bool {
    stack.last().is_some_and(|name| name.as_slice() == b"body")
}

/// Inside a run of the outer paragraph, not one nested in a text box.
fn in_run(stack: &[Vec<u8>]) -> bool {
    stack.last().is_some_and(|name| name.as_slice() == b"r") && paragraph_depth(stack) == 1
}

fn in_run_text(stack: &[Vec<u8>]) -> bool {
    match stack.split_last() {
        Some((last, rest)) => last.as_slice() == b"t" && in_run(rest),
        None => false,
    }
}

fn paragraph_depth(stack: &[Vec<u8>]) -> usize {
    stack.iter().filter(|name| name.as_slice() == b"p").count()
}

fn push_text(current: &mut Option<String>, text: &str) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push_str(text);
    }
}

fn is_docx(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase()),
        Some(ext) if ext == "docx"
    )
}
