// src/preprocess/tokenizer.rs
//! Fixed token-cleaning chain applied to paper text:
//! split → strip punctuation → lowercase → drop latex → lemmatize → length filter → noun filter.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::preprocess::lemma::{Lemmatizer, SuffixLemmatizer};
use crate::preprocess::tagger::{LexiconTagger, PosTagger};

pub const DEFAULT_MIN_TOKEN_LEN: usize = 5;

const PUNCTUATION: [char; 5] = [',', '.', ':', '?', '!'];

const POSSESSIVES: [&str; 2] = ["'s", "’s"];

/// Words (a leading backslash is kept so latex commands stay whole, inner
/// hyphens and apostrophes are kept) or any single non-space symbol.
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\\?\w+(?:[-'’]\w+)*|[^\w\s]").expect("word regex"));

static DEFAULT_TOKENIZER: Lazy<Tokenizer> = Lazy::new(Tokenizer::default);

pub struct Tokenizer {
    lemmatizer: Box<dyn Lemmatizer>,
    tagger: Box<dyn PosTagger>,
    min_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(
            Box::new(SuffixLemmatizer),
            Box::new(LexiconTagger),
            DEFAULT_MIN_TOKEN_LEN,
        )
    }
}

impl Tokenizer {
    pub fn new(
        lemmatizer: Box<dyn Lemmatizer>,
        tagger: Box<dyn PosTagger>,
        min_len: usize,
    ) -> Self {
        Self {
            lemmatizer,
            tagger,
            min_len,
        }
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let tokens = word_tokenize(text)
            .iter()
            .map(|t| remove_punctuation(t))
            .map(|t| normalize(&t))
            .collect();
        let tokens = remove_latex(tokens);
        let tokens = lemmatize(tokens, self.lemmatizer.as_ref());
        let tokens = filter_length(tokens, self.min_len);
        remove_non_nouns(tokens, self.tagger.as_ref())
    }
}

/// Run the default chain (suffix lemmatizer, lexicon tagger, min length 5).
pub fn tokenize(text: &str) -> Vec<String> {
    DEFAULT_TOKENIZER.tokenize(text)
}

pub fn word_tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for m in WORD_RE.find_iter(text) {
        let word = m.as_str();
        match split_possessive(word) {
            Some((stem, clitic)) => {
                tokens.push(stem.to_string());
                tokens.push(clitic.to_string());
            }
            None => tokens.push(word.to_string()),
        }
    }
    tokens
}

/// `network's` → (`network`, `'s`), Treebank style.
fn split_possessive(word: &str) -> Option<(&str, &str)> {
    for clitic in POSSESSIVES {
        if word.len() > clitic.len() {
            let at = word.len() - clitic.len();
            if word.is_char_boundary(at) && word[at..].eq_ignore_ascii_case(clitic) {
                return Some((&word[..at], &word[at..]));
            }
        }
    }
    None
}

pub fn remove_punctuation(token: &str) -> String {
    token.replace(PUNCTUATION, "")
}

pub fn normalize(token: &str) -> String {
    token.to_lowercase()
}

pub fn is_latex_token(token: &str) -> bool {
    token.starts_with('$') || token.starts_with('\\')
}

pub fn remove_latex(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().filter(|t| !is_latex_token(t)).collect()
}

pub fn lemmatize(tokens: Vec<String>, lemmatizer: &dyn Lemmatizer) -> Vec<String> {
    tokens.iter().map(|t| lemmatizer.lemmatize(t)).collect()
}

/// Keep tokens with at least `min_len` characters.
pub fn filter_length(tokens: Vec<String>, min_len: usize) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|t| t.chars().count() >= min_len)
        .collect()
}

/// Keep tokens whose tag starts with `N`.
pub fn remove_non_nouns(tokens: Vec<String>, tagger: &dyn PosTagger) -> Vec<String> {
    let tags = tagger.tag(&tokens);
    tokens
        .into_iter()
        .zip(tags)
        .filter(|(_, tag)| tag.starts_with('N'))
        .map(|(token, _)| token)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn latex_commands_stay_whole() {
        assert_eq!(
            word_tokenize(r"$\alpha$ Optimization Methods, Really!"),
            strings(&["$", r"\alpha", "$", "Optimization", "Methods", ",", "Really", "!"])
        );
    }

    #[test]
    fn possessive_clitic_is_split_off() {
        assert_eq!(
            word_tokenize("the network's and Model’S weights' norm, don't"),
            strings(&["the", "network", "'s", "and", "Model", "’S", "weights", "'", "norm", ",", "don't"])
        );
    }

    #[test]
    fn punctuation_is_stripped_inside_tokens() {
        assert_eq!(remove_punctuation("e.g.,"), "eg");
        assert_eq!(remove_punctuation("why?!"), "why");
        assert_eq!(remove_punctuation("$x$"), "$x$");
    }

    #[test]
    fn empty_token_is_not_latex() {
        assert!(!is_latex_token(""));
        assert!(is_latex_token("$"));
        assert!(is_latex_token(r"\mathbb"));
        assert!(!is_latex_token("alpha"));
    }

    #[test]
    fn length_filter_counts_chars() {
        assert_eq!(
            filter_length(strings(&["graph", "node", "réseau", ""]), 5),
            strings(&["graph", "réseau"])
        );
    }

    #[test]
    fn remove_non_nouns_of_nothing_is_nothing() {
        assert!(remove_non_nouns(Vec::new(), &LexiconTagger).is_empty());
    }
}
