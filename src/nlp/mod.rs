//! Natural language processing components.
//!
//! The [`Annotator`] trait is the seam between the splitter and whatever
//! produces sentence boundaries and token annotations. The production
//! implementation wraps a pretrained `nlprule` tokenizer.

pub mod model;
pub mod nlprule_annotator;
pub mod roles;
pub mod tagset;

use crate::error::Result;
use std::ops::Range;

pub use nlprule_annotator::NlpruleAnnotator;

/// Coarse part-of-speech categories (universal tag set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
    Space,
}

impl PartOfSpeech {
    pub fn as_str(self) -> &'static str {
        match self {
            PartOfSpeech::Adj => "ADJ",
            PartOfSpeech::Adp => "ADP",
            PartOfSpeech::Adv => "ADV",
            PartOfSpeech::Aux => "AUX",
            PartOfSpeech::Cconj => "CCONJ",
            PartOfSpeech::Det => "DET",
            PartOfSpeech::Intj => "INTJ",
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::Num => "NUM",
            PartOfSpeech::Part => "PART",
            PartOfSpeech::Pron => "PRON",
            PartOfSpeech::Propn => "PROPN",
            PartOfSpeech::Punct => "PUNCT",
            PartOfSpeech::Sconj => "SCONJ",
            PartOfSpeech::Sym => "SYM",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::X => "X",
            PartOfSpeech::Space => "SPACE",
        }
    }

    /// Tokens that can head a subject noun phrase.
    pub fn is_nominal(self) -> bool {
        matches!(
            self,
            PartOfSpeech::Noun | PartOfSpeech::Propn | PartOfSpeech::Pron | PartOfSpeech::Num
        )
    }

    pub fn is_verbal(self) -> bool {
        matches!(self, PartOfSpeech::Verb | PartOfSpeech::Aux)
    }
}

impl std::fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dependency relation of a token to its governor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DependencyRole {
    /// Nominal subject of an active clause.
    NominalSubject,
    /// Nominal subject of a passive clause.
    PassiveSubject,
    Auxiliary,
    PassiveAuxiliary,
    Root,
    /// Any relation the labeler does not distinguish.
    #[default]
    Unspecified,
}

impl DependencyRole {
    pub fn label(self) -> &'static str {
        match self {
            DependencyRole::NominalSubject => "nsubj",
            DependencyRole::PassiveSubject => "nsubjpass",
            DependencyRole::Auxiliary => "aux",
            DependencyRole::PassiveAuxiliary => "auxpass",
            DependencyRole::Root => "ROOT",
            DependencyRole::Unspecified => "dep",
        }
    }

    pub fn is_subject(self) -> bool {
        matches!(
            self,
            DependencyRole::NominalSubject | DependencyRole::PassiveSubject
        )
    }
}

impl std::fmt::Display for DependencyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One token with its linguistic annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedToken {
    pub text: String,
    pub lemma: String,
    /// Byte range in the annotated text.
    pub span: Range<usize>,
    /// Fine-grained (Penn Treebank) tag.
    pub tag: String,
    pub pos: PartOfSpeech,
    pub dep: DependencyRole,
}

impl AnnotatedToken {
    pub fn new(
        text: impl Into<String>,
        lemma: impl Into<String>,
        tag: impl Into<String>,
        span: Range<usize>,
    ) -> Self {
        let text = text.into();
        let tag = tag.into();
        let pos = tagset::coarse_pos(&tag, &text);
        Self {
            text,
            lemma: lemma.into(),
            span,
            tag,
            pos,
            dep: DependencyRole::Unspecified,
        }
    }
}

/// A candidate sentence as produced by an [`Annotator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceSpan {
    /// Byte range in the annotated text.
    pub span: Range<usize>,
    /// Surface text, untrimmed.
    pub text: String,
    pub tokens: Vec<AnnotatedToken>,
}

/// Whether any token carries a subject role.
pub fn has_subject(tokens: &[AnnotatedToken]) -> bool {
    tokens.iter().any(|token| token.dep.is_subject())
}

/// Whether any token is a main verb; auxiliaries do not count.
pub fn has_verb(tokens: &[AnnotatedToken]) -> bool {
    tokens.iter().any(|token| token.pos == PartOfSpeech::Verb)
}

/// Sentence segmentation plus per-token annotation.
///
/// # Contract
///
/// - Spans are returned in document order and do not overlap.
/// - Every token carries a coarse POS and a dependency role.
/// - Annotating the same text twice yields identical spans.
pub trait Annotator {
    fn annotate(&self, text: &str) -> Result<Vec<SentenceSpan>>;
}

impl<A: Annotator + ?Sized> Annotator for &A {
    fn annotate(&self, text: &str) -> Result<Vec<SentenceSpan>> {
        (**self).annotate(text)
    }
}

impl<A: Annotator + ?Sized> Annotator for Box<A> {
    fn annotate(&self, text: &str) -> Result<Vec<SentenceSpan>> {
        (**self).annotate(text)
    }
}
