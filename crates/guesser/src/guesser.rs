use mcguess_text::{PosTagger, TaggerPool, TextNormalizer};
use mcguess_vector::SimilarityScorer;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::types::{Candidate, CandidateScore, GuessReport};

/// Below any cosine similarity, so the first scored answer always takes the lead
const NO_ANSWER: f64 = -2.0;

/// Multiple choice answer selector
///
/// Question and answers are reduced to thought vectors (sums of their word
/// vectors after normalization). The answer whose vector has the highest
/// cosine similarity with the question's wins; on equal scores the earlier
/// answer is kept.
#[derive(Debug, Clone)]
pub struct QuestionGuesser {
    normalizer: TextNormalizer,
    scorer: SimilarityScorer,
    taggers: Arc<TaggerPool>,
}

impl QuestionGuesser {
    pub fn new(
        normalizer: TextNormalizer,
        scorer: SimilarityScorer,
        taggers: Arc<TaggerPool>,
    ) -> Self {
        Self {
            normalizer,
            scorer,
            taggers,
        }
    }

    /// Text of the best answer, or `None` if no answer could be scored
    pub fn guess(&self, question: &str, answers: &[Candidate]) -> Option<String> {
        self.report(question, answers).answer().map(str::to_string)
    }

    /// Score every candidate against the question
    pub fn report(&self, question: &str, answers: &[Candidate]) -> GuessReport {
        // One tagger for the whole request
        let mut tagger = self.taggers.checkout();
        self.report_with(question, answers, &mut *tagger)
    }

    fn report_with(
        &self,
        question: &str,
        answers: &[Candidate],
        tagger: &mut dyn PosTagger,
    ) -> GuessReport {
        let question_tokens = self.normalizer.normalize(question, tagger);
        debug!("Question tokens: {}", question_tokens.join(" "));

        let question_vector = self.scorer.vectorize(&question_tokens);
        if question_vector.is_none() && !answers.is_empty() {
            warn!("There was no vector for question: {:?}", question_tokens);
        }

        let mut top_score = NO_ANSWER;
        let mut best = None;
        let mut candidates = Vec::with_capacity(answers.len());

        for (index, answer) in answers.iter().enumerate() {
            let tokens = self.normalizer.normalize(&answer.text, tagger);
            let score = self.scorer.score_against(question_vector.as_ref(), &tokens);

            match score {
                Some(score) => debug!("{} {:.6} -- {}", answer.label, score, tokens.join(" ")),
                None => debug!("{} no score -- {}", answer.label, answer.text),
            }

            if let Some(score) = score {
                if score > top_score {
                    top_score = score;
                    best = Some(index);
                }
            }

            candidates.push(CandidateScore {
                label: answer.label.clone(),
                text: answer.text.clone(),
                tokens,
                score,
            });
        }

        GuessReport {
            question_tokens,
            candidates,
            best,
        }
    }

    pub fn taggers(&self) -> &TaggerPool {
        &self.taggers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcguess_text::{PosLexicon, StopWords};
    use mcguess_vector::WordVectorStore;
    use std::collections::HashSet;

    fn guesser() -> QuestionGuesser {
        let store = Arc::new(
            WordVectorStore::from_vectors(vec![
                ("capital", vec![0.9, 0.1, 0.05]),
                ("france", vec![0.85, 0.15, 0.0]),
                ("paris", vec![0.95, 0.05, 0.1]),
                ("beautiful", vec![0.2, 0.7, 0.1]),
                ("banana", vec![0.0, 0.1, 0.95]),
                ("fruit", vec![0.05, 0.2, 0.9]),
                ("yellow", vec![0.1, 0.3, 0.8]),
                ("void", vec![0.0, 0.0, 0.0]),
            ])
            .unwrap(),
        );
        let stop_words: StopWords = ["what", "which"].into_iter().collect();
        let excluded: HashSet<String> =
            ["DT", "IN", "WP", "VBZ"].iter().map(|t| t.to_string()).collect();

        let normalizer =
            TextNormalizer::new(Arc::new(stop_words), Arc::new(excluded), store.clone()).unwrap();
        let taggers = Arc::new(TaggerPool::lexicon(Arc::new(PosLexicon::builtin()), 1));
        QuestionGuesser::new(normalizer, SimilarityScorer::new(store), taggers)
    }

    #[test]
    fn test_no_answers() {
        assert_eq!(guesser().guess("What is the capital of France", &[]), None);
    }

    #[test]
    fn test_related_answer_wins() {
        let answers = Candidate::labeled(["Paris is beautiful", "xyz"]);
        let guess = guesser().guess("What is the capital of France", &answers);
        assert_eq!(guess.as_deref(), Some("Paris is beautiful"));
    }

    #[test]
    fn test_unscorable_answer_is_skipped() {
        let answers = Candidate::labeled(["xyz", "Paris"]);
        let report = guesser().report("What is the capital of France", &answers);

        assert_eq!(report.candidates[0].score, None);
        assert!(report.candidates[0].tokens.is_empty());
        assert!(report.candidates[1].score.is_some());
        assert_eq!(report.answer(), Some("Paris"));
    }

    #[test]
    fn test_closer_answer_wins_regardless_of_order() {
        let answers = Candidate::labeled(["yellow fruit", "banana", "Paris"]);
        let guess = guesser().guess("Which fruit is yellow and curved", &answers);
        assert_ne!(guess.as_deref(), Some("Paris"));

        let guess = guesser().guess("What is the capital of France", &answers);
        assert_eq!(guess.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_report_scores_match_scorer() {
        let guesser = guesser();
        let answers = Candidate::labeled(["Paris", "yellow banana", "xyz"]);
        let report = guesser.report("capital of France", &answers);

        for candidate in &report.candidates {
            assert_eq!(
                candidate.score,
                guesser.scorer.score(&report.question_tokens, &candidate.tokens)
            );
        }
        assert_eq!(report.candidates[2].score, None);
    }

    #[test]
    fn test_tie_keeps_first() {
        let answers = vec![
            Candidate::new("A", "Paris, beautiful!"),
            Candidate::new("B", "paris beautiful"),
        ];
        let report = guesser().report("capital of France", &answers);

        assert_eq!(report.candidates[0].score, report.candidates[1].score);
        assert_eq!(report.best, Some(0));
        assert_eq!(report.answer(), Some("Paris, beautiful!"));
    }

    #[test]
    fn test_unscorable_question() {
        let answers = Candidate::labeled(["Paris", "banana"]);
        let report = guesser().report("What is it", &answers);

        assert!(report.question_tokens.is_empty());
        assert!(report.candidates.iter().all(|c| c.score.is_none()));
        assert_eq!(report.answer(), None);
    }

    #[test]
    fn test_zero_vector_answer_has_no_score() {
        let answers = Candidate::labeled(["void", "banana"]);
        let report = guesser().report("capital of France", &answers);

        assert_eq!(report.candidates[0].score, None);
        assert_eq!(report.answer(), Some("banana"));
    }

    #[test]
    fn test_tagger_returned_after_guess() {
        let guesser = guesser();
        guesser.guess("capital", &Candidate::labeled(["Paris"]));
        guesser.guess("capital", &Candidate::labeled(["Paris"]));
        assert_eq!(guesser.taggers().idle(), guesser.taggers().created());
        assert_eq!(guesser.taggers().created(), 1);
    }
}
