//! Token and punctuation representation.
//!
//! A Token is one word of a sentence with its punctuation removed. The
//! punctuation is kept separately as [`Punctuation`] marks keyed by token
//! position, so the sentence can be rendered back exactly.

use serde::{Deserialize, Serialize};

/// Where a punctuation mark sits relative to its token position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PunctuationPosition {
    /// Attached directly before the token (`"word`)
    Before,
    /// Attached directly after the token (`word,`)
    After,
    /// Its own chunk, placed before the token at this position
    Alone,
}

impl PunctuationPosition {
    /// Convert to a string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PunctuationPosition::Before => "before",
            PunctuationPosition::After => "after",
            PunctuationPosition::Alone => "alone",
        }
    }
}

/// A run of punctuation characters and its placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punctuation {
    /// The punctuation characters
    pub text: String,
    /// Placement relative to the token position it is stored under
    pub position: PunctuationPosition,
}

impl Punctuation {
    pub fn new(text: impl Into<String>, position: PunctuationPosition) -> Self {
        Punctuation {
            text: text.into(),
            position,
        }
    }
}

/// A single word of a sentence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text without surrounding punctuation or expression tag
    pub text: String,

    /// Position within the sentence (alone punctuation takes no position)
    pub index: usize,

    /// Index into the owning sentence's multi-word expressions
    pub expression: Option<usize>,

    /// Grouping key shared by all occurrences of the same lexical unit
    pub lexical_id: String,
}

impl Token {
    /// Create a standalone token; its lexical identity is its text
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        let text = text.into();
        Token {
            lexical_id: text.clone(),
            text,
            index,
            expression: None,
        }
    }

    /// Check if this token belongs to a multi-word expression
    pub fn in_expression(&self) -> bool {
        self.expression.is_some()
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)?;
        if self.lexical_id != self.text {
            write!(f, "/{}", self.lexical_id)?;
        }
        Ok(())
    }
}
