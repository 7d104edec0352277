//! Coarse dependency-role labeling.
//!
//! The tokenizer model gives us tags but no parse tree, so subject and
//! predicate roles are read off the tag sequence of one sentence:
//!
//! - the predicate is the first VERB/AUX token;
//! - its verb chain continues through AUX/VERB tokens (adverbs and particles
//!   in between are skipped) and the last VERB of the chain is the root;
//! - the subject is the last nominal before the predicate that is not inside
//!   a prepositional phrase;
//! - when a fronted auxiliary has no nominal before it ("Did you eat?"), the
//!   subject is the noun phrase right after the auxiliary and the chain
//!   resumes past it.
//!
//! Only the roles the completeness check consumes are distinguished; every
//! other token is labeled `dep`.

use super::tagset::is_be;
use super::{AnnotatedToken, DependencyRole, PartOfSpeech};

const GET_FORMS: &[&str] = &["get", "gets", "got", "gotten", "getting"];

/// Assign dependency roles to the tokens of a single sentence in place.
pub fn label_roles(tokens: &mut [AnnotatedToken]) {
    for token in tokens.iter_mut() {
        token.dep = DependencyRole::Unspecified;
    }

    let Some(predicate) = tokens.iter().position(|token| token.pos.is_verbal()) else {
        return;
    };

    let inverted_subject = if tokens[predicate].pos == PartOfSpeech::Aux
        && find_subject(&tokens[..predicate]).is_none()
    {
        find_inverted_subject(tokens, predicate)
    } else {
        None
    };

    let chain = verb_chain(tokens, predicate, inverted_subject);
    let root = chain
        .iter()
        .rev()
        .copied()
        .find(|&idx| tokens[idx].pos == PartOfSpeech::Verb)
        .unwrap_or(chain[chain.len() - 1]);

    let passive = tokens[root].pos == PartOfSpeech::Verb
        && tokens[root].tag == "VBN"
        && chain
            .iter()
            .any(|&idx| idx < root && is_passive_auxiliary(&tokens[idx]));

    for &idx in &chain {
        tokens[idx].dep = if idx == root {
            DependencyRole::Root
        } else if passive && idx < root && is_passive_auxiliary(&tokens[idx]) {
            DependencyRole::PassiveAuxiliary
        } else {
            DependencyRole::Auxiliary
        };
    }

    if let Some(subject) = find_subject(&tokens[..predicate]).or(inverted_subject) {
        tokens[subject].dep = if passive {
            DependencyRole::PassiveSubject
        } else {
            DependencyRole::NominalSubject
        };
    }
}

/// Indices of the verbal tokens forming the predicate's chain. Tokens up to
/// and including `inverted_subject` are stepped over.
fn verb_chain(
    tokens: &[AnnotatedToken],
    predicate: usize,
    inverted_subject: Option<usize>,
) -> Vec<usize> {
    let mut chain = vec![predicate];
    let resume = inverted_subject.map_or(predicate + 1, |subject| subject + 1);
    for (idx, token) in tokens.iter().enumerate().skip(resume) {
        match token.pos {
            PartOfSpeech::Verb | PartOfSpeech::Aux => {
                // A main verb closes the chain; anything after it is a new
                // clause or a complement.
                if tokens[chain[chain.len() - 1]].pos == PartOfSpeech::Verb {
                    break;
                }
                chain.push(idx);
            }
            PartOfSpeech::Adv | PartOfSpeech::Part => {}
            _ => break,
        }
    }
    chain
}

/// Head of the noun phrase following a fronted auxiliary, if one sits
/// between it and the next verb.
fn find_inverted_subject(tokens: &[AnnotatedToken], auxiliary: usize) -> Option<usize> {
    let mut head = None;
    for (idx, token) in tokens.iter().enumerate().skip(auxiliary + 1) {
        match token.pos {
            PartOfSpeech::Noun | PartOfSpeech::Propn => head = Some(idx),
            PartOfSpeech::Pron | PartOfSpeech::Num if head.is_none() => return Some(idx),
            _ if head.is_some() => return head,
            PartOfSpeech::Verb
            | PartOfSpeech::Aux
            | PartOfSpeech::Punct
            | PartOfSpeech::Adp
            | PartOfSpeech::Cconj
            | PartOfSpeech::Sconj => return None,
            _ => {}
        }
    }
    head
}

fn is_passive_auxiliary(token: &AnnotatedToken) -> bool {
    token.pos == PartOfSpeech::Aux
        && (is_be(token)
            || token.lemma.eq_ignore_ascii_case("get")
            || GET_FORMS.contains(&token.text.to_lowercase().as_str()))
}

fn find_subject(prefix: &[AnnotatedToken]) -> Option<usize> {
    let mut in_prepositional_phrase = false;
    let mut candidate = None;

    for (idx, token) in prefix.iter().enumerate() {
        match token.pos {
            PartOfSpeech::Adp => in_prepositional_phrase = true,
            PartOfSpeech::Punct => in_prepositional_phrase = false,
            PartOfSpeech::Sconj => {
                in_prepositional_phrase = false;
                candidate = None;
            }
            pos if pos.is_nominal() && !in_prepositional_phrase => candidate = Some(idx),
            _ => {}
        }
    }

    candidate.or_else(|| prefix.iter().rposition(|token| token.pos.is_nominal()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::tagset::resolve_auxiliaries;

    fn sentence(words: &[(&str, &str, &str)]) -> Vec<AnnotatedToken> {
        let mut offset = 0;
        let mut tokens: Vec<AnnotatedToken> = words
            .iter()
            .map(|(text, lemma, tag)| {
                let start = offset;
                offset += text.len() + 1;
                AnnotatedToken::new(*text, *lemma, *tag, start..start + text.len())
            })
            .collect();
        resolve_auxiliaries(&mut tokens);
        label_roles(&mut tokens);
        tokens
    }

    fn labels(tokens: &[AnnotatedToken]) -> Vec<&'static str> {
        tokens.iter().map(|token| token.dep.label()).collect()
    }

    #[test]
    fn simple_active_clause() {
        let tokens = sentence(&[
            ("The", "the", "DT"),
            ("cat", "cat", "NN"),
            ("sat", "sit", "VBD"),
            (".", ".", "."),
        ]);
        assert_eq!(labels(&tokens), vec!["dep", "nsubj", "ROOT", "dep"]);
    }

    #[test]
    fn passive_clause_marks_passive_subject_and_auxiliary() {
        let tokens = sentence(&[
            ("The", "the", "DT"),
            ("letter", "letter", "NN"),
            ("was", "be", "VBD"),
            ("written", "write", "VBN"),
            (".", ".", "."),
        ]);
        assert_eq!(
            labels(&tokens),
            vec!["dep", "nsubjpass", "auxpass", "ROOT", "dep"]
        );
    }

    #[test]
    fn perfect_tense_is_active() {
        let tokens = sentence(&[
            ("She", "she", "PRP"),
            ("has", "have", "VBZ"),
            ("already", "already", "RB"),
            ("eaten", "eat", "VBN"),
            (".", ".", "."),
        ]);
        assert_eq!(labels(&tokens), vec!["nsubj", "aux", "dep", "ROOT", "dep"]);
    }

    #[test]
    fn fragment_without_nominal_has_no_subject() {
        let tokens = sentence(&[("Running", "run", "VBG"), ("fast", "fast", "RB"), ("!", "!", ".")]);
        assert!(tokens.iter().all(|token| !token.dep.is_subject()));
        assert_eq!(tokens[0].dep, DependencyRole::Root);
    }

    #[test]
    fn prepositional_object_is_not_the_subject() {
        let tokens = sentence(&[
            ("The", "the", "DT"),
            ("end", "end", "NN"),
            ("of", "of", "IN"),
            ("the", "the", "DT"),
            ("story", "story", "NN"),
            ("came", "come", "VBD"),
            (".", ".", "."),
        ]);
        assert_eq!(tokens[1].dep, DependencyRole::NominalSubject);
        assert_eq!(tokens[4].dep, DependencyRole::Unspecified);
    }

    #[test]
    fn fronted_prepositional_phrase_is_skipped() {
        let tokens = sentence(&[
            ("In", "in", "IN"),
            ("the", "the", "DT"),
            ("morning", "morning", "NN"),
            (",", ",", ","),
            ("the", "the", "DT"),
            ("dog", "dog", "NN"),
            ("barked", "bark", "VBD"),
            (".", ".", "."),
        ]);
        assert_eq!(tokens[2].dep, DependencyRole::Unspecified);
        assert_eq!(tokens[5].dep, DependencyRole::NominalSubject);
    }

    #[test]
    fn falls_back_to_nearest_nominal_inside_phrase() {
        let tokens = sentence(&[
            ("In", "in", "IN"),
            ("spring", "spring", "NN"),
            ("bloomed", "bloom", "VBD"),
            ("flowers", "flower", "NNS"),
            (".", ".", "."),
        ]);
        assert_eq!(tokens[1].dep, DependencyRole::NominalSubject);
    }

    #[test]
    fn copular_clause_roots_on_auxiliary() {
        let tokens = sentence(&[
            ("It", "it", "PRP"),
            ("is", "be", "VBZ"),
            ("cold", "cold", "JJ"),
            (".", ".", "."),
        ]);
        assert_eq!(labels(&tokens), vec!["nsubj", "ROOT", "dep", "dep"]);
        assert!(tokens.iter().all(|token| token.pos != PartOfSpeech::Verb));
    }

    #[test]
    fn inverted_question_with_do_support() {
        let tokens = sentence(&[
            ("Did", "do", "VBD"),
            ("you", "you", "PRP"),
            ("eat", "eat", "VB"),
            ("?", "?", "."),
        ]);
        assert_eq!(labels(&tokens), vec!["aux", "nsubj", "ROOT", "dep"]);
        assert_eq!(tokens[0].pos, PartOfSpeech::Aux);
        assert_eq!(tokens[2].pos, PartOfSpeech::Verb);
    }

    #[test]
    fn inverted_question_with_modal() {
        let tokens = sentence(&[
            ("Can", "can", "MD"),
            ("birds", "bird", "NNS"),
            ("fly", "fly", "VB"),
            ("?", "?", "."),
        ]);
        assert_eq!(labels(&tokens), vec!["aux", "nsubj", "ROOT", "dep"]);
    }

    #[test]
    fn inverted_question_with_determiner_phrase() {
        let tokens = sentence(&[
            ("Is", "be", "VBZ"),
            ("the", "the", "DT"),
            ("cat", "cat", "NN"),
            ("sleeping", "sleep", "VBG"),
            ("?", "?", "."),
        ]);
        assert_eq!(labels(&tokens), vec!["aux", "dep", "nsubj", "ROOT", "dep"]);
    }

    #[test]
    fn inverted_passive_question() {
        let tokens = sentence(&[
            ("Was", "be", "VBD"),
            ("the", "the", "DT"),
            ("letter", "letter", "NN"),
            ("written", "write", "VBN"),
            ("?", "?", "."),
        ]);
        assert_eq!(
            labels(&tokens),
            vec!["auxpass", "dep", "nsubjpass", "ROOT", "dep"]
        );
    }

    #[test]
    fn wh_question_finds_subject_after_auxiliary() {
        let tokens = sentence(&[
            ("Where", "where", "WRB"),
            ("did", "do", "VBD"),
            ("you", "you", "PRP"),
            ("go", "go", "VB"),
            ("?", "?", "."),
        ]);
        assert_eq!(tokens[2].dep, DependencyRole::NominalSubject);
        assert_eq!(tokens[3].dep, DependencyRole::Root);
    }

    #[test]
    fn fronted_auxiliary_without_noun_phrase_has_no_subject() {
        let tokens = sentence(&[
            ("Must", "must", "MD"),
            ("go", "go", "VB"),
            ("now", "now", "RB"),
            (".", ".", "."),
        ]);
        assert!(tokens.iter().all(|token| !token.dep.is_subject()));
        assert_eq!(tokens[1].dep, DependencyRole::Root);
    }

    #[test]
    fn second_main_verb_starts_a_new_chain() {
        let tokens = sentence(&[
            ("Birds", "bird", "NNS"),
            ("sing", "sing", "VBP"),
            ("to", "to", "TO"),
            ("attract", "attract", "VB"),
            ("mates", "mate", "NNS"),
            (".", ".", "."),
        ]);
        assert_eq!(tokens[1].dep, DependencyRole::Root);
        assert_eq!(tokens[3].dep, DependencyRole::Unspecified);
    }

    #[test]
    fn relabeling_clears_previous_roles() {
        let mut tokens = sentence(&[("Stop", "stop", "VB"), ("!", "!", ".")]);
        tokens[1].dep = DependencyRole::NominalSubject;
        label_roles(&mut tokens);
        assert_eq!(labels(&tokens), vec!["ROOT", "dep"]);
    }
}
