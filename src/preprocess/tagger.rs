// src/preprocess/tagger.rs
//! Part-of-speech tagging with Penn Treebank tags (`NN`, `NNS`, `JJ`, `RB`, ...).

use once_cell::sync::Lazy;
use std::collections::HashMap;

static POS_LEXICON: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let raw = include_str!("../../lexicon/pos_lexicon.json");
    serde_json::from_str::<HashMap<String, String>>(raw).expect("valid pos lexicon")
});

/// Tags a whole sequence so implementations may look at context.
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[String]) -> Vec<String>;
}

/// Context-free tagger: lexicon first, then numeric and suffix rules,
/// falling back to `NN` / `NNS`.
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    pub fn new() -> Self {
        Self
    }

    pub fn tag_word(&self, word: &str) -> &'static str {
        let lexicon: &'static HashMap<String, String> = &POS_LEXICON;
        if let Some(tag) = lexicon.get(word) {
            return tag.as_str();
        }
        if !word.chars().any(char::is_alphanumeric) {
            return "SYM";
        }
        if is_numeric(word) {
            return "CD";
        }
        suffix_tag(word)
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .map(|t| self.tag_word(t).to_string())
            .collect()
    }
}

const ADJ_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "ical", "less", "ular", "ional", "ic",
];

fn suffix_tag(word: &str) -> &'static str {
    if word.ends_with("ly") {
        return "RB";
    }
    if word.strip_suffix("ing").is_some_and(is_verb_stem) {
        return "VBG";
    }
    if !word.ends_with("eed") && word.strip_suffix("ed").is_some_and(is_verb_stem) {
        return "VBN";
    }
    if word.ends_with("izes") || word.ends_with("ises") {
        return "VBZ";
    }
    if word.ends_with("ize") {
        return "VB";
    }
    if ADJ_SUFFIXES.iter().any(|s| word.ends_with(s)) {
        return "JJ";
    }
    if word.ends_with('s') && !(word.ends_with("ss") || word.ends_with("us") || word.ends_with("is"))
    {
        return "NNS";
    }
    "NN"
}

/// `str-ing` and `th-ing` are not verb forms; a stem needs three letters and a vowel.
fn is_verb_stem(stem: &str) -> bool {
    stem.chars().count() >= 3 && stem.chars().any(|c| "aeiouy".contains(c))
}

fn is_numeric(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        && word
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '/' | '%'))
}
