//! Mapping from Penn Treebank tags to the coarse universal tag set.

use super::{AnnotatedToken, PartOfSpeech};

const BE_FORMS: &[&str] = &[
    "be", "am", "is", "are", "was", "were", "been", "being", "'s", "'re", "'m", "’s", "’re", "’m",
];
const HAVE_FORMS: &[&str] = &["have", "has", "had", "having", "'ve", "'d", "’ve", "’d"];
const DO_FORMS: &[&str] = &["do", "does", "did"];

/// Coarse category for one fine tag; `text` decides the fallback for tags
/// the table does not know.
pub fn coarse_pos(tag: &str, text: &str) -> PartOfSpeech {
    match tag {
        "CC" => PartOfSpeech::Cconj,
        "CD" => PartOfSpeech::Num,
        "DT" | "PDT" => PartOfSpeech::Det,
        "EX" | "PRP" | "PRP$" | "WP" | "WP$" | "WDT" => PartOfSpeech::Pron,
        "FW" | "LS" => PartOfSpeech::X,
        "IN" => {
            if is_subordinator(text) {
                PartOfSpeech::Sconj
            } else {
                PartOfSpeech::Adp
            }
        }
        "JJ" | "JJR" | "JJS" | "AFX" => PartOfSpeech::Adj,
        "MD" => PartOfSpeech::Aux,
        "NN" | "NNS" => PartOfSpeech::Noun,
        "NNP" | "NNPS" => PartOfSpeech::Propn,
        "POS" | "TO" => PartOfSpeech::Part,
        "RB" | "RBR" | "RBS" | "WRB" => PartOfSpeech::Adv,
        "RP" => PartOfSpeech::Adp,
        "UH" => PartOfSpeech::Intj,
        "VB" | "VBD" | "VBG" | "VBN" | "VBP" | "VBZ" => PartOfSpeech::Verb,
        "SYM" | "$" | "#" => PartOfSpeech::Sym,
        "." | "," | ":" | "``" | "''" | "-LRB-" | "-RRB-" | "HYPH" | "NFP" | "PCT" => {
            PartOfSpeech::Punct
        }
        "_SP" => PartOfSpeech::Space,
        _ => fallback_pos(text),
    }
}

fn fallback_pos(text: &str) -> PartOfSpeech {
    if text.trim().is_empty() {
        PartOfSpeech::Space
    } else if text.chars().all(|c| c.is_ascii_punctuation() || is_unicode_punct(c)) {
        PartOfSpeech::Punct
    } else {
        PartOfSpeech::X
    }
}

fn is_unicode_punct(c: char) -> bool {
    matches!(
        c,
        '“' | '”' | '‘' | '’' | '…' | '—' | '–' | '«' | '»' | '¡' | '¿'
    )
}

fn is_subordinator(text: &str) -> bool {
    matches!(
        text.to_lowercase().as_str(),
        "because" | "although" | "though" | "if" | "unless" | "whether" | "while" | "since"
    )
}

pub fn is_be(token: &AnnotatedToken) -> bool {
    token.lemma.eq_ignore_ascii_case("be") || BE_FORMS.contains(&token.text.to_lowercase().as_str())
}

fn is_have_or_do(token: &AnnotatedToken) -> bool {
    let lemma = token.lemma.to_lowercase();
    let text = token.text.to_lowercase();
    lemma == "have"
        || lemma == "do"
        || HAVE_FORMS.contains(&text.as_str())
        || DO_FORMS.contains(&text.as_str())
}

/// Re-tag auxiliary verbs.
///
/// Forms of *be* are always AUX. Forms of *have* and *do* are AUX only when
/// another verb follows before the clause ends at punctuation or a
/// coordinating conjunction.
pub fn resolve_auxiliaries(tokens: &mut [AnnotatedToken]) {
    for idx in 0..tokens.len() {
        if tokens[idx].pos != PartOfSpeech::Verb {
            continue;
        }
        if is_be(&tokens[idx]) {
            tokens[idx].pos = PartOfSpeech::Aux;
            continue;
        }
        if is_have_or_do(&tokens[idx]) && verb_follows_in_clause(&tokens[idx + 1..]) {
            tokens[idx].pos = PartOfSpeech::Aux;
        }
    }
}

fn verb_follows_in_clause(rest: &[AnnotatedToken]) -> bool {
    for token in rest {
        match token.pos {
            PartOfSpeech::Punct | PartOfSpeech::Cconj => return false,
            PartOfSpeech::Verb => return true,
            _ => {}
        }
    }
    false
}
