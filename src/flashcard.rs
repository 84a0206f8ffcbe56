//! Cloze flashcards.
//!
//! A [`ClozeFlashcard`] is a sentence with one lexical unit blanked out. Its
//! [`SerializableFlashcard`] form splits the sentence text into five
//! segments: the text before the cloze, the first cloze part, the text
//! between the parts of a split expression, the second cloze part and the
//! text after. The segments concatenate back to the sentence text.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::sentence::{Atom, Sentence};

/// Stored flashcards keyed by lexical identity
pub type FlashcardMap = BTreeMap<String, Vec<SerializableFlashcard>>;

/// Five-segment flashcard as stored in the flashcard JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableFlashcard {
    pub before_cloze: String,
    #[serde(default)]
    pub mid_cloze: String,
    pub after_cloze: String,
    #[serde(rename = "clozeWordPart1", alias = "clozeWord")]
    pub cloze_word_part1: String,
    #[serde(rename = "clozeWordPart2", default)]
    pub cloze_word_part2: String,
    #[serde(with = "title_case_bool", default)]
    pub in_use: bool,
}

impl SerializableFlashcard {
    /// Check if the blank is a split multi-word expression
    pub fn is_split(&self) -> bool {
        !self.cloze_word_part2.is_empty()
    }

    /// The full sentence text
    pub fn text(&self) -> String {
        [
            self.before_cloze.as_str(),
            &self.cloze_word_part1,
            &self.mid_cloze,
            &self.cloze_word_part2,
            &self.after_cloze,
        ]
        .concat()
    }
}

// Equality and hashing ignore `in_use`.
impl PartialEq for SerializableFlashcard {
    fn eq(&self, other: &Self) -> bool {
        self.before_cloze == other.before_cloze
            && self.cloze_word_part1 == other.cloze_word_part1
            && self.mid_cloze == other.mid_cloze
            && self.cloze_word_part2 == other.cloze_word_part2
            && self.after_cloze == other.after_cloze
    }
}

impl Eq for SerializableFlashcard {}

impl Hash for SerializableFlashcard {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.before_cloze.hash(state);
        self.cloze_word_part1.hash(state);
        self.mid_cloze.hash(state);
        self.cloze_word_part2.hash(state);
        self.after_cloze.hash(state);
    }
}

impl std::fmt::Display for SerializableFlashcard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_split() {
            write!(
                f,
                "{}*{}*{}*{}*{}",
                self.before_cloze,
                self.cloze_word_part1,
                self.mid_cloze,
                self.cloze_word_part2,
                self.after_cloze
            )
        } else {
            write!(
                f,
                "{}*{}*{}",
                self.before_cloze, self.cloze_word_part1, self.after_cloze
            )
        }
    }
}

/// `inUse` is written as `"True"`/`"False"`; booleans are accepted on read
mod title_case_bool {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Text(String),
        }

        match Flag::deserialize(deserializer)? {
            Flag::Bool(value) => Ok(value),
            Flag::Text(text) => match text.as_str() {
                "True" | "true" => Ok(true),
                "False" | "false" => Ok(false),
                other => Err(D::Error::custom(format!("invalid inUse value '{}'", other))),
            },
        }
    }
}

/// A sentence with one blank lexical unit
#[derive(Debug, Clone)]
pub struct ClozeFlashcard {
    sentence: Rc<Sentence>,
    blank: usize,
    in_use: bool,
    serialized: SerializableFlashcard,
}

impl ClozeFlashcard {
    /// Build a flashcard blanking the unit at token position `blank`.
    ///
    /// Returns `None` when `blank` is not a token of the sentence.
    pub fn new(sentence: Rc<Sentence>, blank: usize, in_use: bool) -> Option<Self> {
        let serialized = segment(&sentence, blank, in_use)?;
        Some(ClozeFlashcard {
            sentence,
            blank,
            in_use,
            serialized,
        })
    }

    pub fn sentence(&self) -> &Rc<Sentence> {
        &self.sentence
    }

    /// Token position of the blank
    pub fn blank(&self) -> usize {
        self.blank
    }

    pub fn in_use(&self) -> bool {
        self.in_use
    }

    /// Lexical identity of the blanked unit
    pub fn lexical_id(&self) -> &str {
        self.sentence
            .token(self.blank)
            .map_or("", |t| t.lexical_id.as_str())
    }

    pub fn serializable(&self) -> &SerializableFlashcard {
        &self.serialized
    }

    pub fn into_serializable(self) -> SerializableFlashcard {
        self.serialized
    }
}

impl PartialEq for ClozeFlashcard {
    fn eq(&self, other: &Self) -> bool {
        self.serialized == other.serialized
    }
}

impl Eq for ClozeFlashcard {}

impl std::fmt::Display for ClozeFlashcard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.serialized, f)
    }
}

/// Cut the rendered sentence into the five flashcard segments
fn segment(sentence: &Sentence, blank: usize, in_use: bool) -> Option<SerializableFlashcard> {
    let (part1, part2) = sentence.cloze_ranges(blank)?;
    let atoms = sentence.atoms();

    // Atom span from the first to the last word of a token range
    let locate = |range: &Range<usize>| -> Option<Range<usize>> {
        if range.is_empty() {
            return None;
        }
        let start = atoms.iter().position(|a| *a == Atom::Word(range.start))?;
        let end = atoms.iter().position(|a| *a == Atom::Word(range.end - 1))?;
        Some(start..end + 1)
    };

    let first = locate(&part1)?;
    let render = |range: Range<usize>| sentence.render(&atoms[range]);

    let flashcard = match locate(&part2) {
        Some(second) => SerializableFlashcard {
            before_cloze: render(0..first.start),
            cloze_word_part1: render(first.clone()),
            mid_cloze: render(first.end..second.start),
            cloze_word_part2: render(second.clone()),
            after_cloze: render(second.end..atoms.len()),
            in_use,
        },
        None => SerializableFlashcard {
            before_cloze: render(0..first.start),
            cloze_word_part1: render(first.clone()),
            mid_cloze: String::new(),
            cloze_word_part2: String::new(),
            after_cloze: render(first.end..atoms.len()),
            in_use,
        },
    };

    Some(flashcard)
}
