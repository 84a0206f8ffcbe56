//! Character classification for corpus lines.
//!
//! Every character of a sentence line falls into one category. The chunker
//! uses the punctuation category to peel marks off words, and the line
//! validator rejects anything categorized as [`CharCategory::Other`].

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Punctuation characters recognized around and between words.
pub const PUNCTUATION_CHARS: &str = "\",.?!;:'()-";

/// Marker separating a word from its multi-word expression tag (`word_1`).
pub const EXPRESSION_MARKER: char = '_';

/// Character categories used in sentence processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharCategory {
    /// Alphabetic character
    Letter,
    /// Numeric character
    Digit,
    /// Whitespace (only single spaces separate chunks in a valid line)
    Whitespace,
    /// The expression tag marker `_`
    ExpressionMarker,
    /// One of [`PUNCTUATION_CHARS`]
    Punct,
    /// Anything else; invalid in a corpus line
    #[default]
    Other,
}

impl CharCategory {
    /// Check if this category may appear in a corpus line
    pub fn is_allowed(&self) -> bool {
        !matches!(self, CharCategory::Other)
    }
}

static PUNCT_SET: Lazy<HashSet<char>> = Lazy::new(|| PUNCTUATION_CHARS.chars().collect());

/// Get the category of a single character
pub fn get_char_category(c: char) -> CharCategory {
    if PUNCT_SET.contains(&c) {
        CharCategory::Punct
    } else if c == EXPRESSION_MARKER {
        CharCategory::ExpressionMarker
    } else if c.is_alphabetic() {
        CharCategory::Letter
    } else if c.is_numeric() {
        CharCategory::Digit
    } else if c.is_whitespace() {
        CharCategory::Whitespace
    } else {
        CharCategory::Other
    }
}

/// Check if a character is recognized punctuation
pub fn is_punctuation(c: char) -> bool {
    PUNCT_SET.contains(&c)
}

/// Check if a string consists only of recognized punctuation
pub fn is_punctuation_only(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_punctuation)
}
