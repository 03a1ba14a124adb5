use mcguess_common::Result;
use mcguess_guesser::{QuestionGuesser, Resources};
use std::sync::Arc;

/// Shared application state
///
/// Everything here is read-only once the server starts.
pub struct AppState {
    /// Startup resources (vectors, stop words, tags, lexicon)
    pub resources: Resources,

    /// Answer selector; taggers are checked out per request
    pub guesser: Arc<QuestionGuesser>,
}

impl AppState {
    /// Create new application state
    ///
    /// `warm_taggers` taggers are built up front, one per expected
    /// concurrent request.
    pub fn new(resources: Resources, warm_taggers: usize) -> Result<Self> {
        let guesser = resources.guesser(warm_taggers)?;

        Ok(Self {
            resources,
            guesser: Arc::new(guesser),
        })
    }
}
