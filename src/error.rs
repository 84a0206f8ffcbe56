//! Error types for cloze-gen.

use std::path::PathBuf;

use thiserror::Error;

/// Result type defaulting to [`ClozeError`].
pub type Result<T, E = ClozeError> = std::result::Result<T, E>;

/// Errors that can abort a generation run.
#[derive(Debug, Error)]
pub enum ClozeError {
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid flashcard JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("cannot serialize configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("no configuration profile named '{0}'")]
    UnknownProfile(String),

    #[error("configuration profile '{0}' already exists")]
    ProfileExists(String),

    #[error("invalid profile name '{0}': use letters, digits, '-' and '_'")]
    InvalidProfileName(String),

    /// Corpus lines that failed validation. The run aborts before any parsing.
    #[error("{} invalid sentence line(s), first: {:?}", .lines.len(), .lines.first())]
    InvalidLines { lines: Vec<String> },

    /// A stored in-use flashcard could not be turned back into a sentence.
    #[error("in-use flashcard for '{key}' cannot be reconstructed: {text:?}")]
    UnreadableFlashcard { key: String, text: String },

    #[error("in-use flashcards for '{key}' are missing from the generated set")]
    MissingInUseKey { key: String },

    #[error("in-use flashcard for '{key}' is missing from the generated set: {flashcard}")]
    MissingInUseFlashcard { key: String, flashcard: String },

    #[error("unknown selection strategy '{0}'")]
    UnknownStrategy(String),

    #[error("unknown output order '{0}'")]
    UnknownOutputOrder(String),

    #[error("flashcards per word must be positive")]
    InvalidFlashcardsPerWord,
}

impl ClozeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ClozeError::Io {
            path: path.into(),
            source,
        }
    }
}
