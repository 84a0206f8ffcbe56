//! Whitespace chunking and punctuation splitting for sentence lines.
//!
//! A line is cut on whitespace into chunks. Each chunk is then split into a
//! leading punctuation run, the word itself and a trailing punctuation run.
//! A chunk made only of punctuation is an "alone" chunk.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::char_categories::PUNCTUATION_CHARS;

/// `(leading punctuation)(word)(trailing punctuation)`
static PUNCT_SPLIT: Lazy<Regex> = Lazy::new(|| {
    let class = format!("[{}]", regex::escape(PUNCTUATION_CHARS));
    Regex::new(&format!("^({class}*)(.*?)({class}*)$")).expect("punctuation pattern is valid")
});

/// One whitespace-delimited piece of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    /// Punctuation standing on its own
    Alone(&'a str),
    /// A word with the punctuation wrapped around it
    Word {
        before: &'a str,
        word: &'a str,
        after: &'a str,
    },
}

impl<'a> Chunk<'a> {
    /// Classify a single whitespace-free chunk
    pub fn classify(chunk: &'a str) -> Self {
        let (before, word, after) = split_punctuation(chunk);
        if word.is_empty() {
            Chunk::Alone(chunk)
        } else {
            Chunk::Word {
                before,
                word,
                after,
            }
        }
    }

    /// Check if this chunk carries a word
    pub fn is_word(&self) -> bool {
        matches!(self, Chunk::Word { .. })
    }
}

/// Chunker for a single sentence line
pub struct Chunker<'a> {
    line: &'a str,
}

impl<'a> Chunker<'a> {
    /// Create a new chunker for the given line
    pub fn new(line: &'a str) -> Self {
        Chunker { line }
    }

    /// Get the original line
    pub fn line(&self) -> &'a str {
        self.line
    }

    /// Cut the line into classified chunks
    pub fn make_chunks(&self) -> Vec<Chunk<'a>> {
        self.line.split_whitespace().map(Chunk::classify).collect()
    }
}

/// Split a chunk into leading punctuation, word and trailing punctuation.
///
/// Punctuation inside the word (`don't`) is left in the word.
pub fn split_punctuation(chunk: &str) -> (&str, &str, &str) {
    match PUNCT_SPLIT.captures(chunk) {
        Some(caps) => {
            let get = |i| caps.get(i).map_or("", |m| m.as_str());
            (get(1), get(2), get(3))
        }
        None => ("", chunk, ""),
    }
}
