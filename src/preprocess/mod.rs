// src/preprocess/mod.rs
//! Preparing downloaded papers for analysis: loading, token cleaning and
//! frequency aggregation.

pub mod frequency;
pub mod lemma;
pub mod loader;
pub mod tagger;
pub mod tokenizer;

pub use crate::preprocess::frequency::{
    compute_frequencies, token_count, FrequencyTable, IncidenceTable,
};
pub use crate::preprocess::lemma::{Lemmatizer, SuffixLemmatizer};
pub use crate::preprocess::loader::{load, load_dir, Corpus, Paper};
pub use crate::preprocess::tagger::{LexiconTagger, PosTagger};
pub use crate::preprocess::tokenizer::{tokenize, Tokenizer};

use crate::download::interval::month_label;

/// Which part of a paper feeds the tokenizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextField {
    #[default]
    Summary,
    Title,
    Both,
}

impl TextField {
    pub fn text_of(self, paper: &Paper) -> String {
        match self {
            TextField::Summary => paper.summary.clone(),
            TextField::Title => paper.title.clone(),
            TextField::Both => format!("{}. {}", paper.title, paper.summary),
        }
    }
}

/// Tokenize every paper and build the incidence table over the whole corpus.
pub fn incidence_for(corpus: &Corpus, tokenizer: &Tokenizer, field: TextField) -> IncidenceTable {
    IncidenceTable::from_documents(
        corpus
            .iter()
            .map(|(id, paper)| (id, tokenizer.tokenize(&field.text_of(paper)))),
    )
}

/// Token frequencies per publication month (`YYYY-MM`).
pub fn monthly_frequencies(
    corpus: &Corpus,
    tokenizer: &Tokenizer,
    field: TextField,
) -> FrequencyTable<String> {
    let incidence = incidence_for(corpus, tokenizer, field);
    compute_frequencies(&incidence, |id| {
        corpus
            .get(id)
            .map(|p| month_label(&p.published))
            .unwrap_or_default()
    })
}
