use mcguess_common::Result;
use mcguess_vector::WordVectorStore;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

use crate::stop_words::StopWords;
use crate::tagger::PosTagger;
use crate::tokenizer::Tokenizer;

/// Tokens must be longer than this to survive
pub const MIN_TOKEN_LEN: usize = 2;

/// Applied in order; later rules see the output of earlier ones
const CONTRACTIONS: &[(&str, &str)] = &[
    ("â€™", "'"),
    ("\u{2019}", "'"),
    ("'s", ""),
    ("can't", "cannot"),
    ("won't", "will not"),
    ("n't", " not"),
    ("'re", " are"),
    ("'m", " am"),
    ("'ll", " will"),
    ("'ve", " have"),
];

/// Replace common contractions with their full forms
pub fn expand_contractions(text: &str) -> String {
    CONTRACTIONS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Raw text -> lowercase tokens worth scoring
///
/// A token survives when it is longer than [`MIN_TOKEN_LEN`], its tag is not
/// excluded, it is not a stop word, and the vector store knows it.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    tokenizer: Tokenizer,
    stop_words: Arc<StopWords>,
    excluded_tags: Arc<HashSet<String>>,
    store: Arc<WordVectorStore>,
}

impl TextNormalizer {
    pub fn new(
        stop_words: Arc<StopWords>,
        excluded_tags: Arc<HashSet<String>>,
        store: Arc<WordVectorStore>,
    ) -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::new()?,
            stop_words,
            excluded_tags,
            store,
        })
    }

    /// Normalize `text` using `tagger` for the POS filter
    pub fn normalize(&self, text: &str, tagger: &mut dyn PosTagger) -> Vec<String> {
        let expanded = expand_contractions(text);
        let stripped = self.tokenizer.strip_punctuation(&expanded);
        let words = self.tokenizer.tokenize(&stripped);
        let tags = tagger.tag(&words);
        if tags.len() != words.len() {
            warn!(
                "Tagger returned {} tags for {} tokens; untagged tokens skip the tag filter",
                tags.len(),
                words.len()
            );
        }

        words
            .iter()
            .enumerate()
            .filter_map(|(i, word)| {
                let tag = tags.get(i).map(String::as_str).unwrap_or_default();
                let word = word.to_lowercase();
                self.allowed_word(&word, tag).then_some(word)
            })
            .collect()
    }

    fn allowed_word(&self, word: &str, tag: &str) -> bool {
        word.len() > MIN_TOKEN_LEN
            && !self.excluded_tags.contains(tag)
            && !self.stop_words.contains(word)
            && self.store.contains(word)
    }
}
