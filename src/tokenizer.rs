//! Line parser.
//!
//! Turns one corpus line into a [`Sentence`]: chunks are split on
//! whitespace, punctuation is peeled off and tagged words are grouped into
//! multi-word expressions.

use unicode_normalization::UnicodeNormalization;

use crate::char_categories::EXPRESSION_MARKER;
use crate::chunker::{split_punctuation, Chunk, Chunker};
use crate::expression::parse_expression_tag;
use crate::sentence::{Sentence, SentenceBuilder};

/// Tag given to the cloze words of a rebuilt in-use flashcard
pub const RECONSTRUCTION_TAG: u32 = 0;

/// Stateless line parser
pub struct Tokenizer;

impl Tokenizer {
    /// Parse a line into a sentence
    pub fn tokenize(line: &str) -> Sentence {
        // Normalize Unicode (NFC normalization)
        let normalized: String = line.nfc().collect();

        let mut builder = SentenceBuilder::new();
        for chunk in Chunker::new(&normalized).make_chunks() {
            match chunk {
                Chunk::Alone(marks) => builder.push_alone(marks),
                Chunk::Word {
                    before,
                    word,
                    after,
                } => {
                    let (text, tag) = parse_expression_tag(word);
                    builder.push_word(before, text, tag, after);
                }
            }
        }
        builder.build()
    }
}

/// Tag every word of a cloze part with [`RECONSTRUCTION_TAG`].
///
/// The tag goes after the word core, so `"up,"` becomes `"up_0,"`.
/// Punctuation-only chunks are left untouched.
pub fn tag_cloze_words(part: &str) -> String {
    part.split(' ')
        .map(|chunk| {
            let (before, word, after) = split_punctuation(chunk);
            if word.is_empty() {
                chunk.to_string()
            } else {
                format!(
                    "{}{}{}{}{}",
                    before, word, EXPRESSION_MARKER, RECONSTRUCTION_TAG, after
                )
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
