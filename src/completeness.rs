//! Sentence completeness heuristic.
//!
//! A candidate is complete when it starts with an uppercase letter, ends with
//! `.`, `!` or `?`, and its tokens contain both a subject-role token and a
//! verb-tagged token. The subject and verb need not be linked to each other.

use crate::nlp::{AnnotatedToken, has_subject, has_verb};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_TERMINAL_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]$").unwrap());

/// Why a candidate was rejected; checks run in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    NotCapitalized,
    MissingTerminalPunctuation,
    MissingSubject,
    MissingVerb,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Rejection::Empty => "empty",
            Rejection::NotCapitalized => "does not start with an uppercase letter",
            Rejection::MissingTerminalPunctuation => "does not end with . ! or ?",
            Rejection::MissingSubject => "no subject token",
            Rejection::MissingVerb => "no verb token",
        };
        write!(f, "{}", label)
    }
}

/// Evaluate the heuristic, short-circuiting on the first failed check.
pub fn check(sentence: &str, tokens: &[AnnotatedToken]) -> Result<(), Rejection> {
    let trimmed = sentence.trim();
    let Some(first) = trimmed.chars().next() else {
        return Err(Rejection::Empty);
    };
    if !first.is_uppercase() {
        return Err(Rejection::NotCapitalized);
    }
    if !RE_TERMINAL_PUNCT.is_match(trimmed) {
        return Err(Rejection::MissingTerminalPunctuation);
    }

    if !has_subject(tokens) {
        return Err(Rejection::MissingSubject);
    }
    if !has_verb(tokens) {
        return Err(Rejection::MissingVerb);
    }
    Ok(())
}
