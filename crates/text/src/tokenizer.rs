use mcguess_common::{McGuessError, Result};
use regex::Regex;
use std::borrow::Cow;

/// Punctuation stripping and word splitting
///
/// Everything outside `[a-zA-Z. ]` is deleted, then the remainder is split
/// into runs of letters and runs of periods. Spaces only separate tokens.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    disallowed: Regex,
    token: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        let disallowed = Regex::new(r"[^a-zA-Z. ]")
            .map_err(|e| McGuessError::internal(format!("Invalid strip pattern: {}", e)))?;
        let token = Regex::new(r"[a-zA-Z]+|\.+")
            .map_err(|e| McGuessError::internal(format!("Invalid token pattern: {}", e)))?;
        Ok(Self { disallowed, token })
    }

    /// Delete every character outside `[a-zA-Z. ]`
    pub fn strip_punctuation<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.disallowed.replace_all(text, "")
    }

    /// Split stripped text into word and period tokens
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.token
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
