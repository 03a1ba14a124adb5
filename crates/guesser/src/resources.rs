use mcguess_common::{AppConfig, Result};
use mcguess_text::{PosLexicon, StopWords, TaggerPool, TextNormalizer};
use mcguess_vector::{SimilarityScorer, WordVectorStore};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Read-only data loaded once at startup
///
/// Any failure here is fatal; a partially loaded space must not serve.
#[derive(Debug, Clone)]
pub struct Resources {
    pub store: Arc<WordVectorStore>,
    pub stop_words: Arc<StopWords>,
    pub filtered_tags: Arc<HashSet<String>>,
    pub lexicon: Arc<PosLexicon>,
}

impl Resources {
    /// Load the vector model, stop words and POS lexicon named in `config`
    pub fn load(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let stop_words = StopWords::from_file(&config.stop_words)?;
        let lexicon = PosLexicon::from_file(&config.pos_model)?;
        let store = WordVectorStore::from_bin(&config.w2v_model)?;

        let resources = Self::new(
            store,
            stop_words,
            config.filtered_tags.iter().cloned(),
            lexicon,
        );
        info!(
            "Resources ready: {} words, {} stop words, {} filtered tags",
            resources.store.len(),
            resources.stop_words.len(),
            resources.filtered_tags.len()
        );
        Ok(resources)
    }

    pub fn new<I>(
        store: WordVectorStore,
        stop_words: StopWords,
        filtered_tags: I,
        lexicon: PosLexicon,
    ) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            store: Arc::new(store),
            stop_words: Arc::new(stop_words),
            filtered_tags: Arc::new(filtered_tags.into_iter().collect()),
            lexicon: Arc::new(lexicon),
        }
    }

    /// Build a guesser over these resources with `warm_taggers` pre-built taggers
    pub fn guesser(&self, warm_taggers: usize) -> Result<crate::QuestionGuesser> {
        let normalizer = TextNormalizer::new(
            self.stop_words.clone(),
            self.filtered_tags.clone(),
            self.store.clone(),
        )?;
        let scorer = SimilarityScorer::new(self.store.clone());
        let taggers = Arc::new(TaggerPool::lexicon(self.lexicon.clone(), warm_taggers));

        Ok(crate::QuestionGuesser::new(normalizer, scorer, taggers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Candidate;
    use mcguess_common::McGuessError;
    use std::io::Write;
    use std::path::Path;

    fn write_vectors(path: &Path, vocab: &[(&str, [f32; 2])]) {
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(file, "{} 2", vocab.len()).unwrap();
        for (word, values) in vocab {
            file.write_all(word.as_bytes()).unwrap();
            file.write_all(b" ").unwrap();
            for v in values {
                file.write_all(&v.to_le_bytes()).unwrap();
            }
            file.write_all(b"\n").unwrap();
        }
    }

    fn config_in(dir: &Path) -> AppConfig {
        let config = AppConfig {
            w2v_model: dir.join("vectors.bin"),
            stop_words: dir.join("stop_words.txt"),
            pos_model: dir.join("lexicon.tsv"),
            ..AppConfig::default()
        };
        std::fs::write(&config.stop_words, "what\nthe\n").unwrap();
        std::fs::write(&config.pos_model, "paris\tNNP\n").unwrap();
        config
    }

    #[test]
    fn test_load_and_guess() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        write_vectors(
            &config.w2v_model,
            &[("capital", [1.0, 0.1]), ("paris", [0.9, 0.2]), ("banana", [0.0, 1.0])],
        );

        let resources = Resources::load(&config).unwrap();
        assert_eq!(resources.store.len(), 3);
        assert!(resources.filtered_tags.contains("DT"));

        let guesser = resources.guesser(1).unwrap();
        let answers = Candidate::labeled(["banana", "Paris"]);
        assert_eq!(
            guesser.guess("What is the capital?", &answers).as_deref(),
            Some("Paris")
        );
    }

    #[test]
    fn test_malformed_vectors_abort_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.w2v_model, "300\n").unwrap();

        let err = Resources::load(&config).unwrap_err();
        assert!(matches!(err, McGuessError::Format(_)));
        assert!(err.is_startup_fatal());
    }

    #[test]
    fn test_missing_stop_words_abort_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.stop_words = dir.path().join("missing.txt");

        let err = Resources::load(&config).unwrap_err();
        assert!(matches!(err, McGuessError::Resource(_)));
    }
}
