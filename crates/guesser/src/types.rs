use serde::Serialize;

/// Labels of the answer slots a request may carry
pub const ANSWER_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// Candidate answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Slot label ("A".."D")
    pub label: String,

    /// Raw answer text
    pub text: String,
}

impl Candidate {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Label texts in order: A, B, C, D, then E, F... for longer lists
    pub fn labeled<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Self::new(label_for(i), text))
            .collect()
    }
}

fn label_for(index: usize) -> String {
    match ANSWER_LABELS.get(index) {
        Some(label) => label.to_string(),
        None => char::from_u32('A' as u32 + index as u32)
            .filter(char::is_ascii_uppercase)
            .map(String::from)
            .unwrap_or_else(|| (index + 1).to_string()),
    }
}

/// Per-candidate scoring detail
#[derive(Debug, Clone, Serialize)]
pub struct CandidateScore {
    /// Candidate label
    pub label: String,

    /// Raw answer text
    pub text: String,

    /// Tokens that survived normalization
    pub tokens: Vec<String>,

    /// Cosine similarity with the question, if both sides had a vector
    pub score: Option<f64>,
}

/// Full outcome of a guess
#[derive(Debug, Clone, Serialize)]
pub struct GuessReport {
    /// Normalized question tokens
    pub question_tokens: Vec<String>,

    /// Scores in candidate order
    pub candidates: Vec<CandidateScore>,

    /// Index of the winning candidate
    pub best: Option<usize>,
}

impl GuessReport {
    /// Winning answer's original text
    pub fn answer(&self) -> Option<&str> {
        self.best
            .and_then(|i| self.candidates.get(i))
            .map(|c| c.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled() {
        let candidates = Candidate::labeled(["x", "y", "z", "w", "v"]);
        let labels: Vec<_> = candidates.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["A", "B", "C", "D", "E"]);
        assert_eq!(candidates[1].text, "y");
    }

    #[test]
    fn test_label_past_z() {
        assert_eq!(label_for(25), "Z");
        assert_eq!(label_for(26), "27");
    }

    #[test]
    fn test_report_answer() {
        let report = GuessReport {
            question_tokens: vec!["capital".to_string()],
            candidates: vec![CandidateScore {
                label: "A".to_string(),
                text: "Paris".to_string(),
                tokens: vec!["paris".to_string()],
                score: Some(0.9),
            }],
            best: Some(0),
        };
        assert_eq!(report.answer(), Some("Paris"));

        let empty = GuessReport {
            question_tokens: Vec::new(),
            candidates: Vec::new(),
            best: None,
        };
        assert_eq!(empty.answer(), None);
    }
}
