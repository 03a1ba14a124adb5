//! mcguess answer selection
//!
//! Picks the candidate answer whose thought vector is closest to the question's

mod guesser;
mod resources;
mod types;

pub use guesser::QuestionGuesser;
pub use resources::Resources;
pub use types::{Candidate, CandidateScore, GuessReport, ANSWER_LABELS};
