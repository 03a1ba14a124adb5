use ndarray::{Array1, ArrayView1};
use std::sync::Arc;
use tracing::warn;

use crate::store::WordVectorStore;

/// Sum of the word vectors of a token sequence
pub type ThoughtVector = Array1<f64>;

/// Cosine similarity of two vectors
///
/// `None` when the dimensions differ or either vector has zero norm.
pub fn cosine_similarity(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }

    let dot = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    let denominator = norm_a * norm_b;
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    Some(dot / denominator)
}

/// Turns token sequences into thought vectors and scores them
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    store: Arc<WordVectorStore>,
}

impl SimilarityScorer {
    pub fn new(store: Arc<WordVectorStore>) -> Self {
        Self { store }
    }

    /// Elementwise sum of every token's vector
    ///
    /// `None` for an empty sequence or when any token is missing from the store.
    pub fn vectorize<S: AsRef<str>>(&self, tokens: &[S]) -> Option<ThoughtVector> {
        let dimension = self.store.dimension()?;
        if tokens.is_empty() {
            return None;
        }

        let mut sum = Array1::<f64>::zeros(dimension);
        for token in tokens {
            let vector = self.store.get(token.as_ref())?;
            sum += &vector;
        }
        Some(sum)
    }

    /// Cosine similarity of two token sequences' thought vectors
    pub fn score<S: AsRef<str>>(&self, question: &[S], answer: &[S]) -> Option<f64> {
        let question_vector = self.vectorize(question);
        if question_vector.is_none() {
            warn!("There was no vector for: {:?}", as_strs(question));
        }
        self.score_against(question_vector.as_ref(), answer)
    }

    /// Score `answer` against an already vectorized question
    ///
    /// Lets a caller vectorize the question once for many answers.
    pub fn score_against<S: AsRef<str>>(
        &self,
        question_vector: Option<&ThoughtVector>,
        answer: &[S],
    ) -> Option<f64> {
        let answer_vector = self.vectorize(answer);
        if answer_vector.is_none() {
            warn!("There was no vector for: {:?}", as_strs(answer));
        }

        match (question_vector, answer_vector) {
            (Some(q), Some(a)) => cosine_similarity(q.view(), a.view()),
            _ => None,
        }
    }
}

fn as_strs<S: AsRef<str>>(tokens: &[S]) -> Vec<&str> {
    tokens.iter().map(AsRef::as_ref).collect()
}
