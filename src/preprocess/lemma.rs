// src/preprocess/lemma.rs
use once_cell::sync::Lazy;
use std::collections::HashMap;

static NOUN_EXCEPTIONS: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let raw = include_str!("../../lexicon/noun_exceptions.json");
    serde_json::from_str::<HashMap<String, String>>(raw).expect("valid noun exception lexicon")
});

/// Reduces an inflected word to its dictionary form.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, token: &str) -> String;
}

/// Noun lemmatizer in the spirit of WordNet's morphy: irregular plurals from a
/// lexicon, then suffix detachment. Without a dictionary it cannot verify the
/// candidate, so endings that are usually singular (`-ss`, `-us`, `-is`) are
/// left alone.
#[derive(Debug, Clone, Default)]
pub struct SuffixLemmatizer;

impl SuffixLemmatizer {
    pub fn new() -> Self {
        Self
    }
}

/// (suffix, replacement), longest first.
const NOUN_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zes", "z"),
    ("ies", "y"),
    ("s", ""),
];

const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is", "ous", "ics"];

/// Singular nouns that end in `s`; their plurals take `-es`.
const SINGULAR_S: &[&str] = &[
    "atlas", "bias", "bonus", "bus", "campus", "census", "chaos", "consensus", "corpus",
    "gas", "lens", "minus", "news", "plus", "series", "species", "status", "virus",
];

impl Lemmatizer for SuffixLemmatizer {
    fn lemmatize(&self, token: &str) -> String {
        if let Some(base) = NOUN_EXCEPTIONS.get(token) {
            return base.clone();
        }
        if SINGULAR_S.contains(&token) || SINGULAR_ENDINGS.iter().any(|e| token.ends_with(e)) {
            return token.to_string();
        }
        if let Some(stem) = token.strip_suffix("es") {
            if SINGULAR_S.contains(&stem) {
                return stem.to_string();
            }
        }
        for (suffix, repl) in NOUN_RULES {
            if let Some(stem) = token.strip_suffix(suffix) {
                if stem.chars().count() < 2 {
                    return token.to_string();
                }
                return format!("{stem}{repl}");
            }
        }
        token.to_string()
    }
}
