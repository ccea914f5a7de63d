// tests/tokenizer.rs
use arxiv_trends::preprocess::tokenizer::{remove_non_nouns, tokenize, Tokenizer};
use arxiv_trends::preprocess::{LexiconTagger, PosTagger, SuffixLemmatizer};

#[test]
fn latex_short_and_non_noun_tokens_are_dropped() {
    let out = tokenize("$\\alpha$ Optimization Methods, Really!");
    assert_eq!(out, vec!["optimization", "method"]);
}

#[test]
fn abstract_sentence() {
    let out = tokenize(
        "We propose efficient algorithms for kernel matrices and study their convergence.",
    );
    assert_eq!(out, vec!["algorithm", "kernel", "matrix", "study", "convergence"]);
}

#[test]
fn empty_text_gives_no_tokens() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("   \n ").is_empty());
}

#[test]
fn remove_non_nouns_on_empty_sequence() {
    assert!(remove_non_nouns(Vec::new(), &LexiconTagger).is_empty());
}

struct EverythingIsAVerb;

impl PosTagger for EverythingIsAVerb {
    fn tag(&self, tokens: &[String]) -> Vec<String> {
        tokens.iter().map(|_| "VB".to_string()).collect()
    }
}

#[test]
fn tagger_is_pluggable() {
    let t = Tokenizer::new(Box::new(SuffixLemmatizer), Box::new(EverythingIsAVerb), 5);
    assert!(t.tokenize("Optimization methods").is_empty());
}

#[test]
fn minimum_length_is_configurable() {
    let t = Tokenizer::default().with_min_len(3);
    assert_eq!(t.tokenize("Graph nets"), vec!["graph", "net"]);
}

#[test]
fn possessives_merge_with_the_plain_noun() {
    let out = tokenize("The network's performance and the model's accuracy.");
    assert_eq!(out, vec!["network", "performance", "model", "accuracy"]);
}

#[test]
fn data_is_too_short_to_survive() {
    assert!(tokenize("Large data sets are analysed with data.").is_empty());
}

#[test]
fn es_plurals_of_s_nouns() {
    let t = Tokenizer::default().with_min_len(3);
    let out = t.tokenize("We correct biases in gases and lenses.");
    assert_eq!(out, vec!["correct", "bias", "gas", "lens"]);
}
