//! Highest-proportion-of-new-words selection.
//!
//! Ranks unused occurrences by the share of their sentence's lexical units
//! that do not appear in any in-use flashcard's sentence.

use std::collections::{HashMap, HashSet};

use super::{SelectionAlgorithm, SelectionRequest};
use crate::corpus::Occurrence;
use crate::sentence::{Sentence, SentenceId};

#[derive(Debug, Default)]
pub struct HighestProportionOfNewWords {
    seen: Option<HashSet<String>>,
    proportions: HashMap<SentenceId, f64>,
}

impl HighestProportionOfNewWords {
    pub fn new() -> Self {
        HighestProportionOfNewWords::default()
    }
}

/// Share of a sentence's lexical units missing from `seen`
fn new_word_proportion(sentence: &Sentence, seen: &HashSet<String>) -> f64 {
    let mut total = 0usize;
    let mut new = 0usize;
    for (identity, _) in sentence.lexical_units() {
        total += 1;
        if !seen.contains(identity) {
            new += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    new as f64 / total as f64
}

impl SelectionAlgorithm for HighestProportionOfNewWords {
    fn name(&self) -> &'static str {
        "highestProportionOfNewWords"
    }

    fn choose(&mut self, request: &SelectionRequest<'_>) -> Option<Vec<Occurrence>> {
        if request.unused.is_empty() {
            return None;
        }

        let seen = self.seen.get_or_insert_with(|| {
            request
                .all_in_use
                .iter()
                .flat_map(|(_, cards)| cards)
                .flat_map(|card| request.scoring_sentence(card).lexical_units())
                .map(|(identity, _)| identity.to_string())
                .collect()
        });
        let proportions = &mut self.proportions;

        let mut ranked: Vec<(f64, &Occurrence)> = request
            .unused
            .iter()
            .map(|occurrence| {
                let proportion = *proportions
                    .entry(occurrence.sentence_id())
                    .or_insert_with(|| new_word_proportion(&occurrence.sentence, seen));
                (proportion, occurrence)
            })
            .collect();

        // Stable, so equal proportions keep corpus order
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        Some(
            ranked
                .into_iter()
                .take(request.need)
                .map(|(_, occurrence)| occurrence.clone())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, InUseFlashcards};
    use crate::flashcard::{FlashcardMap, SerializableFlashcard};

    #[test]
    fn test_proportion() {
        let sentence = crate::tokenizer::Tokenizer::tokenize("a b c d.");
        let seen: HashSet<String> = ["a", "b", "z"].iter().map(|s| s.to_string()).collect();
        assert_eq!(new_word_proportion(&sentence, &seen), 0.5);
        assert_eq!(new_word_proportion(&sentence, &HashSet::new()), 1.0);
    }

    #[test]
    fn test_prefers_unseen_words() {
        let corpus = Corpus::index(&["k a b", "k a c", "k d e", "a b x"]);
        let mut stored = FlashcardMap::new();
        stored.insert(
            "x".to_string(),
            vec![SerializableFlashcard {
                before_cloze: "a b ".to_string(),
                cloze_word_part1: "x".to_string(),
                in_use: true,
                ..Default::default()
            }],
        );
        let in_use = InUseFlashcards::reconstruct(&stored).unwrap();
        let request = SelectionRequest {
            corpus: &corpus,
            key: "k",
            unused: corpus.occurrences_of("k"),
            in_use: &[],
            all_in_use: &in_use,
            need: 2,
        };

        let chosen = HighestProportionOfNewWords::new().choose(&request).unwrap();
        let texts: Vec<&str> = chosen.iter().map(|o| o.sentence.text()).collect();
        // "k d e" is all new; "k a c" beats "k a b" on new words
        assert_eq!(texts, vec!["k d e", "k a c"]);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let corpus = Corpus::index(&["k a", "k b", "k c"]);
        let in_use = InUseFlashcards::default();
        let request = SelectionRequest {
            corpus: &corpus,
            key: "k",
            unused: corpus.occurrences_of("k"),
            in_use: &[],
            all_in_use: &in_use,
            need: 2,
        };
        let chosen = HighestProportionOfNewWords::new().choose(&request).unwrap();
        assert_eq!(chosen[0].sentence.text(), "k a");
        assert_eq!(chosen[1].sentence.text(), "k b");
    }
}
