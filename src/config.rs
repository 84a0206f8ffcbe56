//! Run configuration, loaded from TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClozeError, Result};
use crate::generator::GeneratorSettings;
use crate::ordering::OutputOrder;
use crate::selection::SelectionStrategy;

/// Settings of one generation run. Every field has a default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Sentence corpus, one sentence per line
    pub input_file: PathBuf,
    /// Where the flashcard JSON is written
    pub output_file: PathBuf,
    /// Store to read in-use flashcards from; the output file when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_output_file: Option<PathBuf>,
    /// Start fresh, ignoring any existing store
    pub ignore_existing: bool,
    pub algorithm: SelectionStrategy,
    pub flashcards_per_word: usize,
    pub benefit_shorter_sentences: bool,
    pub output_order: Vec<OutputOrder>,
    pub words_to_bury: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
}

/// A single setting, as shown by `config current <field>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigField {
    InputFile,
    OutputFile,
    Algorithm,
    FlashcardsPerWord,
    BenefitShorter,
    OutputOrder,
    BuryWords,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            input_file: PathBuf::from("sentences.txt"),
            output_file: PathBuf::from("clozeFlashcards.json"),
            existing_output_file: None,
            ignore_existing: false,
            algorithm: SelectionStrategy::MostDifferent,
            flashcards_per_word: 3,
            benefit_shorter_sentences: false,
            output_order: vec![OutputOrder::Alphabetical],
            words_to_bury: Vec::new(),
            random_seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Serialize to TOML text
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: GeneratorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ClozeError::io(path, e))?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.flashcards_per_word == 0 {
            return Err(ClozeError::InvalidFlashcardsPerWord);
        }
        Ok(())
    }

    /// The store in-use flashcards are read from, `None` when ignoring it
    pub fn existing_flashcards_path(&self) -> Option<&Path> {
        if self.ignore_existing {
            return None;
        }
        Some(
            self.existing_output_file
                .as_deref()
                .unwrap_or(self.output_file.as_path()),
        )
    }

    /// Add a word to bury; `false` when it is already listed
    pub fn add_bury_word(&mut self, word: &str) -> bool {
        if self.words_to_bury.iter().any(|w| w == word) {
            return false;
        }
        self.words_to_bury.push(word.to_string());
        true
    }

    /// Remove a word to bury; `false` when it was not listed
    pub fn remove_bury_word(&mut self, word: &str) -> bool {
        let before = self.words_to_bury.len();
        self.words_to_bury.retain(|w| w != word);
        self.words_to_bury.len() != before
    }

    /// One line describing a setting
    pub fn describe(&self, field: ConfigField) -> String {
        let join = |items: Vec<String>| items.join(", ");
        match field {
            ConfigField::InputFile => format!("Input file: {}", self.input_file.display()),
            ConfigField::OutputFile => format!("Output file: {}", self.output_file.display()),
            ConfigField::Algorithm => format!("Algorithm: {}", self.algorithm),
            ConfigField::FlashcardsPerWord => {
                format!("Flashcards per word: {}", self.flashcards_per_word)
            }
            ConfigField::BenefitShorter => {
                format!("Benefit shorter sentences: {}", self.benefit_shorter_sentences)
            }
            ConfigField::OutputOrder => format!(
                "Output order: {}",
                join(self.output_order.iter().map(ToString::to_string).collect())
            ),
            ConfigField::BuryWords if self.words_to_bury.is_empty() => "Bury words: None".to_string(),
            ConfigField::BuryWords => format!("Bury words: {}", join(self.words_to_bury.clone())),
        }
    }

    /// The subset consumed by the generator
    pub fn settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            flashcards_per_word: self.flashcards_per_word,
            benefit_shorter_sentences: self.benefit_shorter_sentences,
            strategy: self.algorithm,
        }
    }
}
