//! [`Annotator`] backed by a pretrained `nlprule` tokenizer.
//!
//! The tokenizer's disambiguator can leave several `(lemma, tag)` readings on
//! a word, in no particular order. [`choose_reading`] settles on one: the
//! phrase chunk the word sits in decides first, then the reading chosen for
//! the previous word.

use super::model::{ModelSource, load_tokenizer};
use super::roles::label_roles;
use super::tagset::resolve_auxiliaries;
use super::{AnnotatedToken, Annotator, SentenceSpan};
use crate::error::Result;
use nlprule::Tokenizer;
use std::ops::Range;
use tracing::debug;

/// Pseudo-tags the tokenizer attaches to sentence edges.
const BOUNDARY_TAGS: &[&str] = &["SENT_START", "SENT_END"];

pub struct NlpruleAnnotator {
    tokenizer: Tokenizer,
}

impl NlpruleAnnotator {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Load (downloading once if needed) and wrap the tokenizer.
    pub fn load(source: &ModelSource) -> Result<Self> {
        load_tokenizer(source).map(Self::new)
    }
}

impl Annotator for NlpruleAnnotator {
    fn annotate(&self, text: &str) -> Result<Vec<SentenceSpan>> {
        let spans: Vec<SentenceSpan> = self
            .tokenizer
            .pipe(text)
            .map(|sentence| {
                let tokens = sentence
                    .tokens()
                    .iter()
                    .filter_map(|token| {
                        let word = token.word();
                        let surface = word.text().as_str();
                        if surface.trim().is_empty() {
                            return None;
                        }
                        let readings = word
                            .tags()
                            .iter()
                            .filter(|data| {
                                let pos = data.pos().as_str();
                                !pos.is_empty() && !BOUNDARY_TAGS.contains(&pos)
                            })
                            .map(|data| Reading::new(data.pos().as_str(), data.lemma().as_str()))
                            .collect();
                        Some(RawToken {
                            text: surface.to_string(),
                            readings,
                            chunk: Phrase::from_chunks(token.chunks()),
                            span: token.span().byte().clone(),
                        })
                    })
                    .collect();
                build_span(
                    sentence.text().to_string(),
                    sentence.span().byte().clone(),
                    tokens,
                )
            })
            .collect();
        debug!(sentences = spans.len(), "Annotated text");
        Ok(spans)
    }
}

/// One `(tag, lemma)` reading of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Reading {
    tag: String,
    lemma: String,
}

impl Reading {
    fn new(tag: &str, lemma: &str) -> Self {
        Self {
            tag: tag.to_string(),
            lemma: lemma.to_string(),
        }
    }

    fn class(&self) -> TagClass {
        TagClass::of(&self.tag)
    }
}

/// Token data as read from the model, before coarse tagging.
#[derive(Debug, Clone)]
struct RawToken {
    text: String,
    readings: Vec<Reading>,
    chunk: Option<Phrase>,
    span: Range<usize>,
}

/// Phrase type of the chunk a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phrase {
    Noun,
    Verb,
    Adverb,
    Adjective,
}

impl Phrase {
    /// Chunk tags look like `B-NP-singular`, `I-VP` or `O`.
    fn from_chunks(chunks: &[String]) -> Option<Self> {
        chunks.iter().find_map(|chunk| {
            let phrase = chunk.split('-').nth(1)?;
            match phrase {
                "NP" => Some(Phrase::Noun),
                "VP" => Some(Phrase::Verb),
                "ADVP" => Some(Phrase::Adverb),
                "ADJP" => Some(Phrase::Adjective),
                _ => None,
            }
        })
    }

    fn preferred(self) -> &'static [TagClass] {
        match self {
            Phrase::Noun => &[TagClass::Nominal, TagClass::Adjective],
            Phrase::Verb => &[TagClass::Verbal, TagClass::Participle],
            Phrase::Adverb => &[TagClass::Adverb],
            Phrase::Adjective => &[TagClass::Adjective],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagClass {
    Verbal,
    Participle,
    Modal,
    Nominal,
    Adjective,
    Adverb,
    Determiner,
    Other,
}

impl TagClass {
    fn of(tag: &str) -> Self {
        match tag {
            "VBG" | "VBN" => TagClass::Participle,
            "MD" => TagClass::Modal,
            "DT" | "PDT" | "PRP$" | "WP$" | "POS" | "CD" => TagClass::Determiner,
            "PRP" => TagClass::Nominal,
            t if t.starts_with("VB") => TagClass::Verbal,
            t if t.starts_with("NN") => TagClass::Nominal,
            t if t.starts_with("JJ") => TagClass::Adjective,
            t if t.starts_with("RB") => TagClass::Adverb,
            _ => TagClass::Other,
        }
    }

    fn is_verb(self) -> bool {
        matches!(self, TagClass::Verbal | TagClass::Participle)
    }
}

/// Pick the reading to tag a word with, or `None` when it has no readings.
///
/// A preference list names tag classes in order; the first class that some
/// reading has wins, and within a class the tokenizer's order is kept. With
/// no applicable preference the first reading is used.
fn choose_reading<'a>(
    readings: &'a [Reading],
    chunk: Option<Phrase>,
    previous: Option<&Reading>,
) -> Option<&'a Reading> {
    if readings.len() <= 1 {
        return readings.first();
    }
    let by_chunk = chunk.map(Phrase::preferred).unwrap_or(&[]);
    first_in_classes(readings, by_chunk)
        .or_else(|| first_in_classes(readings, context_preference(previous)))
        .or_else(|| readings.first())
}

fn context_preference(previous: Option<&Reading>) -> &'static [TagClass] {
    let Some(previous) = previous else {
        return &[TagClass::Participle, TagClass::Nominal];
    };
    let lemma = previous.lemma.to_lowercase();
    match previous.class() {
        TagClass::Modal => &[TagClass::Verbal],
        _ if previous.tag == "TO" => &[TagClass::Verbal],
        _ if lemma == "do" => &[TagClass::Verbal],
        _ if lemma == "be" || lemma == "have" => &[TagClass::Participle],
        TagClass::Determiner | TagClass::Adjective => &[TagClass::Nominal, TagClass::Adjective],
        TagClass::Nominal => &[TagClass::Verbal, TagClass::Participle],
        class if class.is_verb() => &[TagClass::Adverb, TagClass::Nominal, TagClass::Adjective],
        _ => &[],
    }
}

fn first_in_classes<'a>(readings: &'a [Reading], classes: &[TagClass]) -> Option<&'a Reading> {
    classes
        .iter()
        .find_map(|class| readings.iter().find(|reading| reading.class() == *class))
}

fn build_span(text: String, span: Range<usize>, raw: Vec<RawToken>) -> SentenceSpan {
    let mut previous: Option<Reading> = None;
    let mut tokens = Vec::with_capacity(raw.len());
    for token in raw {
        let chosen = choose_reading(&token.readings, token.chunk, previous.as_ref()).cloned();
        let is_word = token.text.chars().any(char::is_alphanumeric);
        let (tag, lemma) = match &chosen {
            Some(reading) if !reading.lemma.is_empty() => {
                (reading.tag.clone(), reading.lemma.clone())
            }
            Some(reading) => (reading.tag.clone(), token.text.to_lowercase()),
            None => (String::new(), token.text.to_lowercase()),
        };
        if is_word && chosen.is_some() {
            previous = chosen;
        }
        tokens.push(AnnotatedToken::new(token.text, lemma, tag, token.span));
    }
    resolve_auxiliaries(&mut tokens);
    label_roles(&mut tokens);
    SentenceSpan { span, text, tokens }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{DependencyRole, PartOfSpeech, has_subject, has_verb};

    fn raw(words: &[(&str, &str, &str)]) -> Vec<RawToken> {
        let mut offset = 0;
        words
            .iter()
            .map(|(text, lemma, tag)| {
                let start = offset;
                offset += text.len() + 1;
                let readings = if tag.is_empty() {
                    Vec::new()
                } else {
                    vec![Reading::new(tag, lemma)]
                };
                RawToken {
                    text: text.to_string(),
                    readings,
                    chunk: None,
                    span: start..start + text.len(),
                }
            })
            .collect()
    }

    fn readings(pairs: &[(&str, &str)]) -> Vec<Reading> {
        pairs
            .iter()
            .map(|(tag, lemma)| Reading::new(tag, lemma))
            .collect()
    }

    #[test]
    fn build_span_tags_and_labels_tokens() {
        let span = build_span(
            "The cat sat. ".to_string(),
            0..13,
            raw(&[
                ("The", "the", "DT"),
                ("cat", "cat", "NN"),
                ("sat", "sit", "VBD"),
                (".", ".", "PCT"),
            ]),
        );

        assert_eq!(span.text, "The cat sat. ");
        assert_eq!(span.span, 0..13);
        assert_eq!(span.tokens[1].dep, DependencyRole::NominalSubject);
        assert_eq!(span.tokens[2].pos, PartOfSpeech::Verb);
        assert_eq!(span.tokens[3].pos, PartOfSpeech::Punct);
        assert!(has_subject(&span.tokens));
        assert!(has_verb(&span.tokens));
    }

    #[test]
    fn missing_lemma_falls_back_to_lowercased_text() {
        let span = build_span(
            "Was it?".to_string(),
            0..7,
            raw(&[("Was", "", "VBD"), ("it", "it", "PRP"), ("?", "", "")]),
        );
        assert_eq!(span.tokens[0].lemma, "was");
        assert_eq!(span.tokens[0].pos, PartOfSpeech::Aux);
        assert_eq!(span.tokens[2].pos, PartOfSpeech::Punct);
    }

    #[test]
    fn chunk_decides_between_readings() {
        let options = readings(&[("VBZ", "walk"), ("NNS", "walk")]);
        assert_eq!(
            choose_reading(&options, Some(Phrase::Noun), None).map(|r| r.tag.as_str()),
            Some("NNS")
        );
        let options = readings(&[("NN", "sleep"), ("VBP", "sleep")]);
        assert_eq!(
            choose_reading(&options, Some(Phrase::Verb), None).map(|r| r.tag.as_str()),
            Some("VBP")
        );
    }

    #[test]
    fn chunk_without_matching_reading_falls_back_to_context() {
        let options = readings(&[("VB", "fish"), ("NN", "fish")]);
        let determiner = Reading::new("DT", "the");
        assert_eq!(
            choose_reading(&options, Some(Phrase::Adverb), Some(&determiner))
                .map(|r| r.tag.as_str()),
            Some("NN")
        );
    }

    #[test]
    fn previous_word_decides_without_chunk() {
        let options = readings(&[("NN", "run"), ("VB", "run")]);
        let modal = Reading::new("MD", "can");
        let noun = Reading::new("NNS", "dog");
        let article = Reading::new("DT", "a");
        let tag = |previous: &Reading| {
            choose_reading(&options, None, Some(previous)).map(|r| r.tag.clone())
        };
        assert_eq!(tag(&modal).as_deref(), Some("VB"));
        assert_eq!(tag(&noun).as_deref(), Some("VB"));
        assert_eq!(tag(&article).as_deref(), Some("NN"));
    }

    #[test]
    fn auxiliary_be_prefers_participle() {
        let options = readings(&[("NN", "sleeping"), ("VBG", "sleep")]);
        let be = Reading::new("VBZ", "be");
        assert_eq!(
            choose_reading(&options, None, Some(&be)).map(|r| r.tag.as_str()),
            Some("VBG")
        );
    }

    #[test]
    fn sentence_start_prefers_gerund_then_noun() {
        let gerund = readings(&[("NN", "running"), ("VBG", "run")]);
        assert_eq!(
            choose_reading(&gerund, None, None).map(|r| r.tag.as_str()),
            Some("VBG")
        );
        let plural = readings(&[("VBZ", "cat"), ("NNS", "cat")]);
        assert_eq!(
            choose_reading(&plural, None, None).map(|r| r.tag.as_str()),
            Some("NNS")
        );
    }

    #[test]
    fn unmatched_preferences_keep_model_order() {
        let options = readings(&[("UH", "oh"), ("RB", "oh")]);
        let pronoun = Reading::new("PRP", "it");
        assert_eq!(
            choose_reading(&options, None, Some(&pronoun)).map(|r| r.tag.as_str()),
            Some("UH")
        );
        assert_eq!(choose_reading(&[], None, None), None);
    }

    #[test]
    fn phrase_is_read_from_chunk_tags() {
        let chunks = |tags: &[&str]| tags.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        assert_eq!(
            Phrase::from_chunks(&chunks(&["B-NP-singular", "E-NP-singular"])),
            Some(Phrase::Noun)
        );
        assert_eq!(Phrase::from_chunks(&chunks(&["I-VP"])), Some(Phrase::Verb));
        assert_eq!(Phrase::from_chunks(&chunks(&["O"])), None);
        assert_eq!(Phrase::from_chunks(&[]), None);
    }

    #[test]
    fn ambiguous_words_are_resolved_in_sequence() {
        let mut tokens = raw(&[
            ("The", "the", "DT"),
            ("dogs", "", ""),
            ("run", "", ""),
            (".", ".", "PCT"),
        ]);
        tokens[1].readings = readings(&[("VBZ", "dog"), ("NNS", "dog")]);
        tokens[2].readings = readings(&[("NN", "run"), ("VBP", "run")]);
        let span = build_span("The dogs run.".to_string(), 0..13, tokens);

        assert_eq!(span.tokens[1].tag, "NNS");
        assert_eq!(span.tokens[2].tag, "VBP");
        assert_eq!(span.tokens[1].dep, DependencyRole::NominalSubject);
        assert!(has_verb(&span.tokens));
    }

    #[test]
    #[ignore = "requires the en_tokenizer model at models/en_tokenizer.bin"]
    fn pretrained_tokenizer_keeps_only_complete_sentences() {
        use crate::config::{OutputFormat, SplitMode};
        use crate::output::SentenceRecord;
        use crate::pipeline::Pipeline;

        let model =
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("models/en_tokenizer.bin");
        let tokenizer = Tokenizer::new(&model).expect("load en_tokenizer model");
        let pipeline = Pipeline::new(
            NlpruleAnnotator::new(tokenizer),
            SplitMode::Complete,
            OutputFormat::Json,
        );

        let all = pipeline
            .split_sentences("The cat sat. Running fast!")
            .expect("split all");
        assert_eq!(all, vec!["The cat sat.", "Running fast!"]);

        let complete = pipeline
            .split_complete_sentences("The cat sat. Running fast!")
            .expect("split complete");
        assert_eq!(
            complete,
            vec![SentenceRecord {
                id: 1,
                text: "The cat sat.".to_string(),
            }]
        );
    }
}
