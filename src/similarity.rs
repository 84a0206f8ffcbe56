//! Sentence similarity scoring.
//!
//! Sentences are compared as vectors of lexical identity counts. Scores are
//! memoized in a [`ScoreCache`] that lives as long as one generation run.

use std::collections::HashMap;

use crate::corpus::Corpus;
use crate::sentence::{Sentence, SentenceId};

/// Cosine dissimilarity `1 - cos(v1, v2)` of two count vectors.
///
/// Only identities accepted by `in_vocabulary` count. Returns `0.0` when
/// either vector has zero magnitude.
pub fn cosine_dissimilarity<F>(
    v1: &HashMap<String, usize>,
    v2: &HashMap<String, usize>,
    in_vocabulary: F,
) -> f64
where
    F: Fn(&str) -> bool,
{
    let mut dot_product = 0.0;
    let mut norm1 = 0.0;
    let mut norm2 = 0.0;

    for (word, &count) in v1.iter().filter(|(w, _)| in_vocabulary(w.as_str())) {
        let val1 = count as f64;
        norm1 += val1 * val1;
        if let Some(&other) = v2.get(word) {
            dot_product += val1 * other as f64;
        }
    }
    for (_, &count) in v2.iter().filter(|(w, _)| in_vocabulary(w.as_str())) {
        let val2 = count as f64;
        norm2 += val2 * val2;
    }

    if norm1 == 0.0 || norm2 == 0.0 {
        return 0.0;
    }
    1.0 - dot_product / (norm1.sqrt() * norm2.sqrt())
}

/// Preference for short sentences: `1 / exp((4n/25)^4)` for `n` tokens.
pub fn sentence_length_score(token_count: usize) -> f64 {
    let scaled = 4.0 * token_count as f64 / 25.0;
    1.0 / scaled.powi(4).exp()
}

/// Memoized dissimilarities (per ordered sentence pair) and length scores
/// (per token count)
#[derive(Debug, Default)]
pub struct ScoreCache {
    dissimilarities: HashMap<(SentenceId, SentenceId), f64>,
    length_scores: HashMap<usize, f64>,
}

impl ScoreCache {
    pub fn new() -> Self {
        ScoreCache::default()
    }

    /// Dissimilarity of two sentences over the corpus vocabulary
    pub fn dissimilarity(&mut self, a: &Sentence, b: &Sentence, corpus: &Corpus) -> f64 {
        *self
            .dissimilarities
            .entry((a.id(), b.id()))
            .or_insert_with(|| {
                cosine_dissimilarity(a.frequencies(), b.frequencies(), |w| {
                    corpus.contains_identity(w)
                })
            })
    }

    pub fn length_score(&mut self, sentence: &Sentence) -> f64 {
        *self
            .length_scores
            .entry(sentence.len())
            .or_insert_with(|| sentence_length_score(sentence.len()))
    }

    /// Number of memoized dissimilarities
    pub fn len(&self) -> usize {
        self.dissimilarities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dissimilarities.is_empty()
    }
}
