use mcguess_common::{McGuessError, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Stop word set, stored lowercase
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Load a stop word list (one word per line)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            McGuessError::resource(format!(
                "Failed to open stop words {}: {}",
                path.display(),
                e
            ))
        })?;

        let stop_words = Self::from_reader(BufReader::new(file)).map_err(|e| {
            McGuessError::resource(format!(
                "Failed to read stop words {}: {}",
                path.display(),
                e
            ))
        })?;

        info!("Stop words loaded: {} from {}", stop_words.len(), path.display());
        Ok(stop_words)
    }

    /// Read one word per line; blank lines are skipped
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut words = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                words.insert(word.to_lowercase());
            }
        }
        Ok(Self { words })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(|w| w.into().to_lowercase()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_from_reader() {
        let stop_words = StopWords::from_reader(Cursor::new("the\n  And \n\nof\r\n")).unwrap();
        assert_eq!(stop_words.len(), 3);
        assert!(stop_words.contains("the"));
        assert!(stop_words.contains("and"));
        assert!(stop_words.contains("of"));
        assert!(!stop_words.contains(""));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "what").unwrap();
        writeln!(file, "which").unwrap();

        let stop_words = StopWords::from_file(file.path()).unwrap();
        assert!(stop_words.contains("which"));
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let err = StopWords::from_file("/nonexistent/stop_words.txt").unwrap_err();
        assert!(matches!(err, McGuessError::Resource(_)));
    }

    #[test]
    fn test_collect() {
        let stop_words: StopWords = ["The", "is"].into_iter().collect();
        assert!(stop_words.contains("the"));
        assert!(stop_words.contains("is"));
    }
}
