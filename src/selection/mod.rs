//! Example sentence selection strategies.
//!
//! A strategy is asked, per lexical unit, to pick `need` occurrences from the
//! ones not already covered by in-use flashcards.

pub mod combinations;
pub mod most_different;
pub mod new_words;

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, InUseFlashcards, Occurrence};
use crate::error::ClozeError;
use crate::flashcard::ClozeFlashcard;
use crate::sentence::{Sentence, SentenceId};

pub use most_different::MostDifferent;
pub use new_words::HighestProportionOfNewWords;

/// Everything a strategy needs to pick occurrences for one lexical unit
#[derive(Debug, Clone, Copy)]
pub struct SelectionRequest<'a> {
    pub corpus: &'a Corpus,
    /// The lexical identity being filled
    pub key: &'a str,
    /// Occurrences not covered by an in-use flashcard, in corpus order
    pub unused: &'a [Occurrence],
    /// In-use flashcards stored under `key`
    pub in_use: &'a [ClozeFlashcard],
    /// In-use flashcards of every key
    pub all_in_use: &'a InUseFlashcards,
    /// Number of new occurrences wanted
    pub need: usize,
}

impl<'a> SelectionRequest<'a> {
    /// The sentence used to score an in-use card: the corpus copy when the
    /// corpus still has it, otherwise the card's own
    pub fn scoring_sentence(&self, card: &'a ClozeFlashcard) -> &'a Sentence {
        self.corpus
            .sentence(card.sentence().id())
            .unwrap_or_else(|| card.sentence())
    }

    /// Unused occurrences with one entry per sentence, skipping sentences
    /// already used by an in-use card of this key
    pub fn distinct_candidates(&self) -> Vec<&'a Occurrence> {
        let excluded: HashSet<SentenceId> =
            self.in_use.iter().map(|c| c.sentence().id()).collect();
        let mut seen = HashSet::new();
        self.unused
            .iter()
            .filter(|o| !excluded.contains(&o.sentence_id()) && seen.insert(o.sentence_id()))
            .collect()
    }
}

/// A sentence selection strategy
pub trait SelectionAlgorithm {
    /// Strategy identifier
    fn name(&self) -> &'static str;

    /// Pick up to `request.need` occurrences; `None` when nothing can be picked
    fn choose(&mut self, request: &SelectionRequest<'_>) -> Option<Vec<Occurrence>>;
}

/// The available selection strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionStrategy {
    /// Maximize pairwise cosine dissimilarity of the chosen sentences
    #[default]
    MostDifferent,
    /// Prefer sentences with the most lexical units the learner has not seen
    HighestProportionOfNewWords,
}

impl SelectionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategy::MostDifferent => "mostDifferent",
            SelectionStrategy::HighestProportionOfNewWords => "highestProportionOfNewWords",
        }
    }

    /// Create a fresh strategy instance for one run
    pub fn build(self, benefit_shorter_sentences: bool) -> Box<dyn SelectionAlgorithm> {
        match self {
            SelectionStrategy::MostDifferent => {
                Box::new(MostDifferent::new(benefit_shorter_sentences))
            }
            SelectionStrategy::HighestProportionOfNewWords => {
                Box::new(HighestProportionOfNewWords::new())
            }
        }
    }
}

impl FromStr for SelectionStrategy {
    type Err = ClozeError;

    /// Accepts `mostDifferent`, `most_different`, `MOST_DIFFERENT` and the like
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let folded: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "mostdifferent" => Ok(Self::MostDifferent),
            "highestproportionofnewwords" | "newwords" => Ok(Self::HighestProportionOfNewWords),
            _ => Err(ClozeError::UnknownStrategy(name.to_string())),
        }
    }
}

impl std::fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
