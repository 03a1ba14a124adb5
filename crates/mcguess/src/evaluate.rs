use anyhow::{Context, Result};
use mcguess_guesser::QuestionGuesser;
use mcguess_server::AnswerRequest;
use serde::Deserialize;
use std::io::BufRead;
use tracing::{debug, warn};

/// Question bank line: a request plus the gold answer under `"^"`
#[derive(Debug, Deserialize)]
pub struct BankEntry {
    #[serde(flatten)]
    pub request: AnswerRequest,

    #[serde(rename = "^")]
    pub answer: Option<String>,
}

/// Accuracy over a question bank
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Questions asked
    pub total: usize,
    /// Guesses matching the gold answer
    pub correct: usize,
    /// Questions where no answer could be scored
    pub unanswered: usize,
    /// Lines that failed to parse or had no question
    pub skipped: usize,
}

impl Evaluation {
    /// Percentage of questions answered correctly
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }
}

/// Guess every question in a JSON-lines bank
pub fn evaluate<R: BufRead>(guesser: &QuestionGuesser, reader: R) -> Result<Evaluation> {
    let mut eval = Evaluation::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let entry: BankEntry = match serde_json::from_str(&line) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no + 1, e);
                eval.skipped += 1;
                continue;
            }
        };

        let Some(question) = entry.request.question.as_deref() else {
            warn!("Skipping line {}: no question", line_no + 1);
            eval.skipped += 1;
            continue;
        };

        eval.total += 1;
        match guesser.guess(question, &entry.request.candidates()) {
            Some(guess) => {
                if entry.answer.as_deref() == Some(guess.as_str()) {
                    eval.correct += 1;
                }
                debug!("Line {}: guessed '{}'", line_no + 1, guess);
            }
            None => eval.unanswered += 1,
        }
    }

    Ok(eval)
}
