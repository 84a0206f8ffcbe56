//! Output ordering of the generated flashcard map.
//!
//! Orders are listed most significant first and applied as stable sorts
//! from the last to the first. Buried identities then move to the end.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::corpus::{Corpus, InUseFlashcards};
use crate::error::ClozeError;
use crate::flashcard::{FlashcardMap, SerializableFlashcard};

/// One sort applied to the lexical identities of the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputOrder {
    /// By identity, code point order
    Alphabetical,
    /// Most corpus occurrences first
    Frequency,
    /// Shuffled
    Random,
    /// Fewest in-use flashcards first
    LeastUsedAsClozeFirst,
    /// Fewest distinct in-use sentences containing the identity first
    LeastInUsedSentencesFirst,
}

impl OutputOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputOrder::Alphabetical => "alphabetical",
            OutputOrder::Frequency => "frequency",
            OutputOrder::Random => "random",
            OutputOrder::LeastUsedAsClozeFirst => "leastUsedAsClozeFirst",
            OutputOrder::LeastInUsedSentencesFirst => "leastInUsedSentencesFirst",
        }
    }

    /// Parse a comma separated list such as `leastUsedAsClozeFirst,alphabetical`
    pub fn parse_list(list: &str) -> Result<Vec<OutputOrder>, ClozeError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for OutputOrder {
    type Err = ClozeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let folded: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "alphabetical" => Ok(Self::Alphabetical),
            "frequency" => Ok(Self::Frequency),
            "random" => Ok(Self::Random),
            "leastusedasclozefirst" | "leastusedfirst" => Ok(Self::LeastUsedAsClozeFirst),
            "leastinusedsentencesfirst" => Ok(Self::LeastInUsedSentencesFirst),
            _ => Err(ClozeError::UnknownOutputOrder(name.to_string())),
        }
    }
}

impl std::fmt::Display for OutputOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flashcards per identity in output order; serializes as a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedFlashcards(Vec<(String, Vec<SerializableFlashcard>)>);

impl OrderedFlashcards {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Vec<SerializableFlashcard>)> {
        self.0.iter()
    }

    /// Number of identities
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of flashcards
    pub fn flashcard_count(&self) -> usize {
        self.0.iter().map(|(_, cards)| cards.len()).sum()
    }
}

impl From<FlashcardMap> for OrderedFlashcards {
    fn from(map: FlashcardMap) -> Self {
        OrderedFlashcards(map.into_iter().collect())
    }
}

impl Serialize for OrderedFlashcards {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, cards) in &self.0 {
            map.serialize_entry(key, cards)?;
        }
        map.end()
    }
}

/// What the order keys are computed from
pub struct OrderContext<'a> {
    pub corpus: &'a Corpus,
    pub in_use: &'a InUseFlashcards,
    /// Seed for [`OutputOrder::Random`]; entropy when absent
    pub seed: Option<u64>,
}

/// Number of distinct in-use sentences containing each identity
fn in_use_sentence_counts(context: &OrderContext<'_>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for sentence in context.in_use.sentences() {
        let sentence = context.corpus.sentence(sentence.id()).unwrap_or(sentence);
        for identity in sentence.frequencies().keys() {
            *counts.entry(identity.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Sort the flashcard map by `orders`, then move `bury` identities to the end
pub fn order_flashcards(
    flashcards: FlashcardMap,
    orders: &[OutputOrder],
    bury: &[String],
    context: &OrderContext<'_>,
) -> OrderedFlashcards {
    let mut items: Vec<(String, Vec<SerializableFlashcard>)> = flashcards.into_iter().collect();

    for order in orders.iter().rev() {
        debug!("Applying output order '{}'", order);
        match order {
            OutputOrder::Alphabetical => items.sort_by(|a, b| a.0.cmp(&b.0)),
            OutputOrder::Frequency => {
                items.sort_by_key(|(key, _)| Reverse(context.corpus.frequency(key)))
            }
            OutputOrder::Random => {
                let mut rng = match context.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                items.shuffle(&mut rng);
            }
            OutputOrder::LeastUsedAsClozeFirst => {
                items.sort_by_key(|(_, cards)| cards.iter().filter(|c| c.in_use).count())
            }
            OutputOrder::LeastInUsedSentencesFirst => {
                let counts = in_use_sentence_counts(context);
                items.sort_by_key(|(key, _)| counts.get(key).copied().unwrap_or(0));
            }
        }
    }

    if !bury.is_empty() {
        let buried: HashSet<&str> = bury.iter().map(String::as_str).collect();
        items.sort_by_key(|(key, _)| buried.contains(key.as_str()));
    }

    OrderedFlashcards(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(before: &str, word: &str, after: &str, in_use: bool) -> SerializableFlashcard {
        SerializableFlashcard {
            before_cloze: before.to_string(),
            cloze_word_part1: word.to_string(),
            after_cloze: after.to_string(),
            in_use,
            ..Default::default()
        }
    }

    fn fixture() -> (Corpus, FlashcardMap, InUseFlashcards) {
        let corpus = Corpus::index(&["a b c.", "b c d.", "c e."]);
        let mut stored = FlashcardMap::new();
        stored.insert("a".to_string(), vec![card("", "a", " b c.", true)]);
        stored.insert("e".to_string(), vec![card("c ", "e", ".", true)]);
        let in_use = InUseFlashcards::reconstruct(&stored).unwrap();

        let mut flashcards = stored;
        flashcards.insert("b".to_string(), vec![card("a ", "b", " c.", false)]);
        flashcards.insert("c".to_string(), vec![card("a b ", "c", ".", false)]);
        flashcards.insert("d".to_string(), vec![card("b c ", "d", ".", false)]);
        (corpus, flashcards, in_use)
    }

    fn keys_for(orders: &[OutputOrder], bury: &[&str]) -> Vec<String> {
        let (corpus, flashcards, in_use) = fixture();
        let context = OrderContext {
            corpus: &corpus,
            in_use: &in_use,
            seed: Some(7),
        };
        let bury: Vec<String> = bury.iter().map(|s| s.to_string()).collect();
        order_flashcards(flashcards, orders, &bury, &context)
            .keys()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_alphabetical() {
        assert_eq!(keys_for(&[OutputOrder::Alphabetical], &[]), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_frequency_then_alphabetical() {
        assert_eq!(
            keys_for(&[OutputOrder::Frequency, OutputOrder::Alphabetical], &[]),
            ["c", "b", "a", "d", "e"]
        );
    }

    #[test]
    fn test_unused_first_then_alphabetical() {
        assert_eq!(
            keys_for(&[OutputOrder::LeastUsedAsClozeFirst, OutputOrder::Alphabetical], &[]),
            ["b", "c", "d", "a", "e"]
        );
    }

    #[test]
    fn test_least_in_used_sentences_first() {
        // in-use sentences: "a b c." and "c e."
        assert_eq!(
            keys_for(
                &[OutputOrder::LeastInUsedSentencesFirst, OutputOrder::Alphabetical],
                &[]
            ),
            ["d", "a", "b", "e", "c"]
        );
    }

    #[test]
    fn test_bury() {
        assert_eq!(
            keys_for(&[OutputOrder::Alphabetical], &["b", "a"]),
            ["c", "d", "e", "a", "b"]
        );
    }

    #[test]
    fn test_random_is_seeded() {
        let first = keys_for(&[OutputOrder::Random], &[]);
        let second = keys_for(&[OutputOrder::Random], &[]);
        assert_eq!(first, second);
        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(sorted, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            OutputOrder::parse_list("LEAST_USED_AS_CLOZE_FIRST, alphabetical").unwrap(),
            vec![OutputOrder::LeastUsedAsClozeFirst, OutputOrder::Alphabetical]
        );
        assert!(OutputOrder::parse_list("sideways").is_err());
    }

    #[test]
    fn test_serializes_in_order() {
        let ordered = OrderedFlashcards(vec![
            ("z".to_string(), vec![]),
            ("a".to_string(), vec![]),
        ]);
        assert_eq!(serde_json::to_string(&ordered).unwrap(), r#"{"z":[],"a":[]}"#);
    }
}
