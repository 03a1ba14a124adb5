//! mcguess text normalization
//!
//! Contraction expansion, tokenization, POS tagging and token filtering

pub mod normalizer;
pub mod stop_words;
pub mod tagger;
pub mod tokenizer;

// Re-export main types
pub use normalizer::{expand_contractions, TextNormalizer, MIN_TOKEN_LEN};
pub use stop_words::StopWords;
pub use tagger::{LexiconTagger, PooledTagger, PosLexicon, PosTagger, TaggerFactory, TaggerPool};
pub use tokenizer::Tokenizer;
