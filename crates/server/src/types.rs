use mcguess_common::{McGuessError, Result};
use mcguess_guesser::Candidate;
use serde::{Deserialize, Serialize};

/// Multiple choice request
///
/// Unknown fields (e.g. the `"^"` gold answer in question banks) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerRequest {
    /// Question text
    #[serde(rename = "#Q")]
    pub question: Option<String>,

    #[serde(rename = "A")]
    pub a: Option<String>,

    #[serde(rename = "B")]
    pub b: Option<String>,

    #[serde(rename = "C")]
    pub c: Option<String>,

    #[serde(rename = "D")]
    pub d: Option<String>,
}

impl AnswerRequest {
    /// Parse a JSON request body
    pub fn parse(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(McGuessError::invalid_input("Request body is empty"));
        }
        serde_json::from_slice(body)
            .map_err(|e| McGuessError::invalid_input(format!("Malformed request: {}", e)))
    }

    /// Question text, rejecting requests without one
    pub fn question(&self) -> Result<&str> {
        self.question
            .as_deref()
            .ok_or_else(|| McGuessError::invalid_input("Missing question (\"#Q\")"))
    }

    /// Present answers in label order; absent slots are skipped
    pub fn candidates(&self) -> Vec<Candidate> {
        [("A", &self.a), ("B", &self.b), ("C", &self.c), ("D", &self.d)]
            .into_iter()
            .filter_map(|(label, text)| text.as_ref().map(|t| Candidate::new(label, t.as_str())))
            .collect()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,

    /// Words in the vector space
    pub vocabulary: usize,

    /// Vector dimension
    pub dimension: Option<usize>,

    pub stop_words: usize,

    pub filtered_tags: usize,
}
