//! One generation run.
//!
//! [`ClozeGenerator::generate`] validates and indexes the corpus, rebuilds
//! the in-use flashcards, seeds the result with them and asks the selection
//! strategy to fill every lexical unit up to the target count. [`run`] wraps
//! it with file I/O and output ordering.

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::config::GeneratorConfig;
use crate::corpus::{find_invalid_lines, Corpus, InUseFlashcards, Occurrence};
use crate::error::{ClozeError, Result};
use crate::flashcard::{ClozeFlashcard, FlashcardMap};
use crate::ordering::{order_flashcards, OrderContext, OrderedFlashcards};
use crate::persistence::ensure_in_use_persist;
use crate::selection::{SelectionRequest, SelectionStrategy};
use crate::store;

/// Parameters consumed by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Target number of flashcards per lexical unit
    pub flashcards_per_word: usize,
    pub benefit_shorter_sentences: bool,
    pub strategy: SelectionStrategy,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        GeneratorSettings {
            flashcards_per_word: 3,
            benefit_shorter_sentences: false,
            strategy: SelectionStrategy::MostDifferent,
        }
    }
}

/// Output of one run, with the state it was computed from
#[derive(Debug)]
pub struct Generation {
    pub corpus: Corpus,
    pub in_use: InUseFlashcards,
    pub flashcards: FlashcardMap,
}

impl Generation {
    /// Total number of flashcards in the result
    pub fn flashcard_count(&self) -> usize {
        self.flashcards.values().map(Vec::len).sum()
    }
}

/// Check if an occurrence is the one an in-use flashcard blanks
fn is_covered(occurrence: &Occurrence, in_use: &[ClozeFlashcard]) -> bool {
    in_use.iter().any(|card| {
        card.sentence().id() == occurrence.sentence_id() && card.blank() == occurrence.blank
    })
}

pub struct ClozeGenerator {
    settings: GeneratorSettings,
}

impl ClozeGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        ClozeGenerator { settings }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate flashcards for every lexical unit of `lines`, keeping every
    /// in-use flashcard of `stored`
    pub fn generate<S: AsRef<str>>(&self, lines: &[S], stored: &FlashcardMap) -> Result<Generation> {
        let target = self.settings.flashcards_per_word;
        if target == 0 {
            return Err(ClozeError::InvalidFlashcardsPerWord);
        }

        let invalid = find_invalid_lines(lines);
        if !invalid.is_empty() {
            for line in &invalid {
                error!("Invalid sentence line: {:?}", line);
            }
            return Err(ClozeError::InvalidLines { lines: invalid });
        }

        let corpus = Corpus::index(lines);
        let in_use = InUseFlashcards::reconstruct(stored)?;

        // Seed with the in-use cards so they always survive
        let mut flashcards = FlashcardMap::new();
        for (key, cards) in in_use.iter() {
            flashcards.insert(
                key.clone(),
                cards.iter().map(|c| c.serializable().clone()).collect(),
            );
        }

        let mut algorithm = self
            .settings
            .strategy
            .build(self.settings.benefit_shorter_sentences);
        info!(
            "Selecting up to {} sentences per lexical unit with '{}'",
            target,
            algorithm.name()
        );

        for (key, occurrences) in corpus.occurrences() {
            let cards = in_use.get(key);
            let need = target.saturating_sub(cards.len());
            if need == 0 {
                debug!("'{}' already has {} in-use flashcards", key, cards.len());
                continue;
            }

            let unused: Vec<Occurrence> = occurrences
                .iter()
                .filter(|o| !is_covered(o, cards))
                .cloned()
                .collect();

            let chosen = if unused.len() + cards.len() <= target {
                unused
            } else {
                let request = SelectionRequest {
                    corpus: &corpus,
                    key,
                    unused: &unused,
                    in_use: cards,
                    all_in_use: &in_use,
                    need,
                };
                match algorithm.choose(&request) {
                    Some(chosen) => chosen,
                    None => {
                        warn!("No valid combination found for '{}'", key);
                        continue;
                    }
                }
            };

            for occurrence in chosen {
                let Some(card) = occurrence.flashcard(false) else {
                    warn!(
                        "Cannot blank token {} of '{}' for '{}', skipping",
                        occurrence.blank,
                        occurrence.sentence.text(),
                        key
                    );
                    continue;
                };
                let card = card.into_serializable();
                let entry = flashcards.entry(key.clone()).or_default();
                if !entry.contains(&card) {
                    entry.push(card);
                }
            }
        }

        ensure_in_use_persist(&in_use, &flashcards)?;

        let generation = Generation {
            corpus,
            in_use,
            flashcards,
        };
        info!(
            "Generated {} flashcards for {} lexical units",
            generation.flashcard_count(),
            generation.flashcards.len()
        );
        Ok(generation)
    }
}

/// Counts reported after a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub sentences: usize,
    pub lexical_units: usize,
    pub in_use: usize,
    pub flashcards: usize,
    pub output_file: PathBuf,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Wrote {} flashcards ({} in use) for {} lexical units from {} sentences to {}",
            self.flashcards,
            self.in_use,
            self.lexical_units,
            self.sentences,
            self.output_file.display()
        )
    }
}

/// Read the corpus and store, generate, order and write the result
pub fn run(config: &GeneratorConfig) -> Result<RunSummary> {
    config.validate()?;

    let lines = store::read_sentence_lines(&config.input_file)?;

    let stored = match config.existing_flashcards_path() {
        None => {
            info!("Ignoring existing flashcards, starting fresh");
            FlashcardMap::new()
        }
        Some(path) => match store::read_flashcards(path)? {
            Some(stored) => stored,
            None => {
                info!(
                    "No existing flashcards at '{}', starting fresh",
                    path.display()
                );
                FlashcardMap::new()
            }
        },
    };

    let generation = ClozeGenerator::new(config.settings()).generate(&lines, &stored)?;
    let Generation {
        corpus,
        in_use,
        flashcards,
    } = generation;

    let context = OrderContext {
        corpus: &corpus,
        in_use: &in_use,
        seed: config.random_seed,
    };
    let ordered: OrderedFlashcards = order_flashcards(
        flashcards,
        &config.output_order,
        &config.words_to_bury,
        &context,
    );

    store::write_flashcards(&config.output_file, &ordered)?;

    Ok(RunSummary {
        sentences: corpus.sentences().len(),
        lexical_units: ordered.len(),
        in_use: in_use.len(),
        flashcards: ordered.flashcard_count(),
        output_file: config.output_file.clone(),
    })
}
