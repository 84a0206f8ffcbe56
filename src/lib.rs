//! # cloze-gen
//!
//! Generates cloze flashcards from a corpus of example sentences.
//!
//! Every distinct lexical unit of the corpus (a word, or a multi-word
//! expression tagged in the text as `look_1 it up_1`) gets up to N
//! flashcards in which it is blanked out. The example sentences are chosen
//! to be as different from one another as possible, and flashcards the
//! learner already marked as in use are always kept on later runs.
//!
//! ## Quick Start
//!
//! ```rust
//! use cloze_gen::{ClozeGenerator, FlashcardMap, GeneratorSettings};
//!
//! let lines = ["a b c.", "b d e.", "b f g."];
//! let settings = GeneratorSettings {
//!     flashcards_per_word: 2,
//!     ..Default::default()
//! };
//!
//! let generation = ClozeGenerator::new(settings)
//!     .generate(&lines, &FlashcardMap::new())
//!     .unwrap();
//!
//! for card in &generation.flashcards["b"] {
//!     println!("{}", card);
//! }
//! ```
//!
//! ## Sentence Model
//!
//! Lines are parsed without a dictionary:
//!
//! ```rust
//! use cloze_gen::Tokenizer;
//!
//! let sentence = Tokenizer::tokenize("She looked_1 it up_1 yesterday.");
//! assert_eq!(sentence.text(), "She looked it up yesterday.");
//! assert_eq!(sentence.tokens()[1].lexical_id, "looked~up");
//! ```

pub mod char_categories;
pub mod chunker;
pub mod config;
pub mod corpus;
pub mod error;
pub mod expression;
pub mod flashcard;
pub mod generator;
pub mod ordering;
pub mod persistence;
pub mod profiles;
pub mod selection;
pub mod sentence;
pub mod similarity;
pub mod store;
pub mod token;
pub mod tokenizer;

// Re-export main types for convenience
pub use char_categories::{get_char_category, CharCategory};
pub use chunker::{Chunk, Chunker};
pub use config::{ConfigField, GeneratorConfig};
pub use corpus::{find_invalid_lines, Corpus, InUseFlashcards, Occurrence};
pub use error::{ClozeError, Result};
pub use expression::MultiWordExpression;
pub use flashcard::{ClozeFlashcard, FlashcardMap, SerializableFlashcard};
pub use generator::{run, ClozeGenerator, Generation, GeneratorSettings, RunSummary};
pub use ordering::{order_flashcards, OrderContext, OrderedFlashcards, OutputOrder};
pub use persistence::ensure_in_use_persist;
pub use profiles::ProfileStore;
pub use selection::{SelectionAlgorithm, SelectionRequest, SelectionStrategy};
pub use sentence::{Sentence, SentenceId};
pub use token::{Punctuation, PunctuationPosition, Token};
pub use tokenizer::Tokenizer;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pipeline() {
        let lines = [
            "I like cats.",
            "Cats like fish.",
            "She looked_1 it up_1 yesterday.",
        ];
        let generation = ClozeGenerator::new(GeneratorSettings::default())
            .generate(&lines, &FlashcardMap::new())
            .unwrap();

        // "like" appears twice, "Cats" and "cats" are distinct units
        assert_eq!(generation.flashcards["like"].len(), 2);
        assert!(generation.flashcards.contains_key("Cats"));
        assert!(generation.flashcards.contains_key("cats"));

        let split = &generation.flashcards["looked~up"][0];
        assert_eq!(split.cloze_word_part1, "looked");
        assert_eq!(split.cloze_word_part2, "up");

        // Every card reproduces its sentence
        for cards in generation.flashcards.values() {
            for card in cards {
                assert!(lines
                    .iter()
                    .map(|l| Tokenizer::tokenize(l))
                    .any(|s| s.text() == card.text()));
            }
        }
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
