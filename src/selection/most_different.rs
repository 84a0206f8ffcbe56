//! Most-different selection.
//!
//! Every size-`need` combination of candidate sentences is scored together
//! with the sentences of the in-use cards. The score is the sum of pairwise
//! cosine dissimilarities, optionally weighted by sentence length. The first
//! best combination wins.

use tracing::{debug, warn};

use super::combinations::{binomial, Combinations};
use super::{SelectionAlgorithm, SelectionRequest};
use crate::corpus::{Corpus, Occurrence};
use crate::sentence::Sentence;
use crate::similarity::ScoreCache;

/// Combination counts above this are searched, with a warning
pub const COMBINATION_WARNING_THRESHOLD: u64 = 1_000_000;

/// Diversity-maximizing strategy
#[derive(Debug, Default)]
pub struct MostDifferent {
    benefit_shorter_sentences: bool,
    cache: ScoreCache,
}

impl MostDifferent {
    pub fn new(benefit_shorter_sentences: bool) -> Self {
        MostDifferent {
            benefit_shorter_sentences,
            cache: ScoreCache::new(),
        }
    }

    /// Sum of pairwise scores over a full sentence set
    fn score(&mut self, corpus: &Corpus, sentences: &[&Sentence]) -> f64 {
        let mut total = 0.0;
        for i in 0..sentences.len() {
            for j in i + 1..sentences.len() {
                let mut score = self.cache.dissimilarity(sentences[i], sentences[j], corpus);
                if self.benefit_shorter_sentences {
                    score *= self.cache.length_score(sentences[i])
                        * self.cache.length_score(sentences[j]);
                }
                total += score;
            }
        }
        total
    }
}

impl SelectionAlgorithm for MostDifferent {
    fn name(&self) -> &'static str {
        "mostDifferent"
    }

    fn choose(&mut self, request: &SelectionRequest<'_>) -> Option<Vec<Occurrence>> {
        let candidates = request.distinct_candidates();
        if candidates.is_empty() {
            return None;
        }
        if candidates.len() <= request.need {
            return Some(candidates.into_iter().cloned().collect());
        }

        let total = binomial(candidates.len(), request.need);
        if total > COMBINATION_WARNING_THRESHOLD {
            warn!(
                "'{}' has {} combinations of {} sentences, this may take a while",
                request.key, total, request.need
            );
        } else {
            debug!("'{}': scoring {} combinations", request.key, total);
        }

        let fixed: Vec<&Sentence> = request
            .in_use
            .iter()
            .map(|card| request.scoring_sentence(card))
            .collect();

        let mut best: Option<(f64, Vec<usize>)> = None;
        let mut sentences = Vec::with_capacity(fixed.len() + request.need);
        for combination in Combinations::new(candidates.len(), request.need) {
            sentences.clear();
            sentences.extend(fixed.iter().copied());
            sentences.extend(combination.iter().map(|&i| &*candidates[i].sentence));

            let score = self.score(request.corpus, &sentences);
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, combination));
            }
        }

        best.map(|(score, combination)| {
            debug!("'{}': best combination scores {:.4}", request.key, score);
            combination
                .into_iter()
                .map(|i| candidates[i].clone())
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::InUseFlashcards;
    use crate::flashcard::{FlashcardMap, SerializableFlashcard};

    fn choose_texts(lines: &[&str], key: &str, need: usize, benefit_shorter: bool) -> Vec<String> {
        let corpus = Corpus::index(lines);
        let in_use = InUseFlashcards::default();
        let request = SelectionRequest {
            corpus: &corpus,
            key,
            unused: corpus.occurrences_of(key),
            in_use: &[],
            all_in_use: &in_use,
            need,
        };
        MostDifferent::new(benefit_shorter)
            .choose(&request)
            .unwrap()
            .iter()
            .map(|o| o.sentence.text().to_string())
            .collect()
    }

    #[test]
    fn test_ties_keep_first_combination() {
        let chosen = choose_texts(&["a b c.", "b d e.", "b f g."], "b", 2, false);
        assert_eq!(chosen, vec!["a b c.", "b d e."]);
    }

    #[test]
    fn test_picks_most_different_pair() {
        let chosen = choose_texts(&["x a b", "x a c", "x d e"], "x", 2, false);
        assert_eq!(chosen, vec!["x a b", "x d e"]);
    }

    #[test]
    fn test_single_pick_without_in_use_takes_first() {
        let chosen = choose_texts(&["x a", "x b", "x c"], "x", 1, false);
        assert_eq!(chosen, vec!["x a"]);
    }

    #[test]
    fn test_shorter_sentences_preferred() {
        let lines = [
            "w a b c d e f g h i j k l",
            "w m",
            "w n",
            "w o p q r s t u v y z aa bb",
        ];
        let plain = choose_texts(&lines, "w", 2, false);
        assert_eq!(plain, vec!["w a b c d e f g h i j k l", "w o p q r s t u v y z aa bb"]);
        let short = choose_texts(&lines, "w", 2, true);
        assert_eq!(short, vec!["w m", "w n"]);
    }

    #[test]
    fn test_in_use_sentences_take_part_in_scoring() {
        let corpus = Corpus::index(&["x a b", "x a c", "x d e"]);
        let mut stored = FlashcardMap::new();
        stored.insert(
            "x".to_string(),
            vec![SerializableFlashcard {
                before_cloze: String::new(),
                cloze_word_part1: "x".to_string(),
                after_cloze: " a b".to_string(),
                in_use: true,
                ..Default::default()
            }],
        );
        let in_use = InUseFlashcards::reconstruct(&stored).unwrap();
        let unused: Vec<Occurrence> = corpus.occurrences_of("x")[1..].to_vec();
        let request = SelectionRequest {
            corpus: &corpus,
            key: "x",
            unused: &unused,
            in_use: in_use.get("x"),
            all_in_use: &in_use,
            need: 1,
        };
        let chosen = MostDifferent::new(false).choose(&request).unwrap();
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].sentence.text(), "x d e");
    }

    #[test]
    fn test_fewer_candidates_than_needed() {
        let chosen = choose_texts(&["x a", "x a"], "x", 2, false);
        assert_eq!(chosen, vec!["x a"]);
    }
}
