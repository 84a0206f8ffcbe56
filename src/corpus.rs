//! Corpus indexing.
//!
//! [`Corpus`] parses every line once and maps each lexical identity to the
//! places it occurs. [`InUseFlashcards`] rebuilds the flashcards a learner
//! is already studying from their stored text, using the same parser.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::char_categories::get_char_category;
use crate::chunker::split_punctuation;
use crate::error::{ClozeError, Result};
use crate::expression::has_nested_tag;
use crate::flashcard::{ClozeFlashcard, FlashcardMap, SerializableFlashcard};
use crate::sentence::{Sentence, SentenceId};
use crate::tokenizer::{tag_cloze_words, Tokenizer, RECONSTRUCTION_TAG};

/// One place a lexical unit appears: a sentence and the blank position
#[derive(Debug, Clone)]
pub struct Occurrence {
    pub sentence: Rc<Sentence>,
    pub blank: usize,
}

impl Occurrence {
    pub fn new(sentence: Rc<Sentence>, blank: usize) -> Self {
        Occurrence { sentence, blank }
    }

    pub fn sentence_id(&self) -> SentenceId {
        self.sentence.id()
    }

    /// Build the flashcard blanking this occurrence
    pub fn flashcard(&self, in_use: bool) -> Option<ClozeFlashcard> {
        ClozeFlashcard::new(Rc::clone(&self.sentence), self.blank, in_use)
    }
}

/// Parsed corpus with its occurrence index
#[derive(Debug, Default)]
pub struct Corpus {
    sentences: Vec<Rc<Sentence>>,
    by_id: HashMap<SentenceId, Rc<Sentence>>,
    occurrences: BTreeMap<String, Vec<Occurrence>>,
}

impl Corpus {
    /// Parse all lines and register every lexical unit they contain
    pub fn index<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut corpus = Corpus::default();

        for line in lines {
            let sentence = Rc::new(Tokenizer::tokenize(line.as_ref()));
            corpus.register(&sentence);
            corpus
                .by_id
                .entry(sentence.id())
                .or_insert_with(|| Rc::clone(&sentence));
            corpus.sentences.push(sentence);
        }

        info!(
            "Indexed {} sentences with {} lexical units",
            corpus.sentences.len(),
            corpus.occurrences.len()
        );
        corpus
    }

    fn register(&mut self, sentence: &Rc<Sentence>) {
        for (identity, blank) in sentence.lexical_units() {
            self.occurrences
                .entry(identity.to_string())
                .or_default()
                .push(Occurrence::new(Rc::clone(sentence), blank));
        }
    }

    pub fn sentences(&self) -> &[Rc<Sentence>] {
        &self.sentences
    }

    /// Look up a corpus sentence by identity
    pub fn sentence(&self, id: SentenceId) -> Option<&Rc<Sentence>> {
        self.by_id.get(&id)
    }

    /// All lexical identities with their occurrences, in key order
    pub fn occurrences(&self) -> &BTreeMap<String, Vec<Occurrence>> {
        &self.occurrences
    }

    pub fn occurrences_of(&self, identity: &str) -> &[Occurrence] {
        self.occurrences
            .get(identity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check if an identity belongs to the corpus vocabulary
    pub fn contains_identity(&self, identity: &str) -> bool {
        self.occurrences.contains_key(identity)
    }

    /// Number of corpus occurrences of an identity
    pub fn frequency(&self, identity: &str) -> usize {
        self.occurrences_of(identity).len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Check a single corpus line.
///
/// A valid line has at least one letter, no leading, trailing or doubled
/// whitespace and only letters, digits, spaces, `_` and known punctuation.
/// A word may carry at most one expression tag.
pub fn is_valid_line(line: &str) -> bool {
    if line.trim() != line {
        return false;
    }
    if !line.chars().any(char::is_alphabetic) {
        return false;
    }

    let mut previous_space = false;
    for c in line.chars() {
        if !get_char_category(c).is_allowed() {
            return false;
        }
        let space = c.is_whitespace();
        if space && previous_space {
            return false;
        }
        previous_space = space;
    }

    !line
        .split_whitespace()
        .any(|chunk| has_nested_tag(split_punctuation(chunk).1))
}

/// Collect the lines that fail [`is_valid_line`]
pub fn find_invalid_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| !is_valid_line(line))
        .map(str::to_string)
        .collect()
}

/// In-use flashcards rebuilt from the flashcard store, grouped by stored key
#[derive(Debug, Default)]
pub struct InUseFlashcards {
    by_key: BTreeMap<String, Vec<ClozeFlashcard>>,
}

impl InUseFlashcards {
    /// Rebuild every in-use card of the store.
    ///
    /// Cards that are not in use are dropped. A card whose text cannot be
    /// parsed back into the same five segments is an error, since it could
    /// not be kept in the output.
    pub fn reconstruct(stored: &FlashcardMap) -> Result<Self> {
        let mut by_key: BTreeMap<String, Vec<ClozeFlashcard>> = BTreeMap::new();

        for (key, cards) in stored {
            for card in cards.iter().filter(|c| c.in_use) {
                let flashcard = rebuild(key, card)?;

                if flashcard.lexical_id() != key {
                    warn!(
                        "In-use flashcard '{}' stored under '{}' resolves to '{}', keeping the stored key",
                        card,
                        key,
                        flashcard.lexical_id()
                    );
                }

                let group = by_key.entry(key.clone()).or_default();
                if group.contains(&flashcard) {
                    debug!("Duplicate in-use flashcard '{}' under '{}'", card, key);
                    continue;
                }
                group.push(flashcard);
            }
        }

        let result = InUseFlashcards { by_key };
        info!(
            "Reconstructed {} in-use flashcards for {} lexical units",
            result.len(),
            result.by_key.len()
        );
        Ok(result)
    }

    /// In-use cards stored under a key
    pub fn get(&self, key: &str) -> &[ClozeFlashcard] {
        self.by_key.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<ClozeFlashcard>)> {
        self.by_key.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.by_key.keys()
    }

    /// Total number of in-use cards
    pub fn len(&self) -> usize {
        self.by_key.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Distinct sentences of all in-use cards
    pub fn sentences(&self) -> Vec<&Rc<Sentence>> {
        let mut seen = std::collections::HashSet::new();
        self.by_key
            .values()
            .flatten()
            .map(ClozeFlashcard::sentence)
            .filter(|s| seen.insert(s.id()))
            .collect()
    }
}

/// Parse a stored card back into a flashcard on its own sentence
fn rebuild(key: &str, card: &SerializableFlashcard) -> Result<ClozeFlashcard> {
    let unreadable = || ClozeError::UnreadableFlashcard {
        key: key.to_string(),
        text: card.to_string(),
    };

    if card.cloze_word_part1.is_empty() {
        return Err(unreadable());
    }

    let mut line = String::new();
    line.push_str(&card.before_cloze);
    line.push_str(&tag_cloze_words(&card.cloze_word_part1));
    line.push_str(&card.mid_cloze);
    if card.is_split() {
        line.push_str(&tag_cloze_words(&card.cloze_word_part2));
    }
    line.push_str(&card.after_cloze);

    let sentence = Tokenizer::tokenize(&line);
    let blank = sentence
        .expressions()
        .iter()
        .find(|e| e.tag == RECONSTRUCTION_TAG)
        .map(|e| e.first())
        .ok_or_else(unreadable)?;

    let flashcard = ClozeFlashcard::new(Rc::new(sentence), blank, true).ok_or_else(unreadable)?;
    if flashcard.serializable() != card {
        debug!(
            "In-use flashcard '{}' rebuilt as '{}'",
            card,
            flashcard.serializable()
        );
        return Err(unreadable());
    }
    Ok(flashcard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(entries: &[(&str, &str, &str, &str, &str, &str, bool)]) -> FlashcardMap {
        let mut map = FlashcardMap::new();
        for &(key, before, part1, mid, part2, after, in_use) in entries {
            map.entry(key.to_string())
                .or_default()
                .push(SerializableFlashcard {
                    before_cloze: before.to_string(),
                    cloze_word_part1: part1.to_string(),
                    mid_cloze: mid.to_string(),
                    cloze_word_part2: part2.to_string(),
                    after_cloze: after.to_string(),
                    in_use,
                });
        }
        map
    }

    #[test]
    fn test_index_occurrences() {
        let corpus = Corpus::index(&["a b c.", "b d e.", "b f g."]);
        assert_eq!(corpus.sentences().len(), 3);
        assert_eq!(corpus.frequency("b"), 3);
        assert_eq!(corpus.frequency("a"), 1);
        assert_eq!(corpus.frequency("z"), 0);

        let b = corpus.occurrences_of("b");
        assert_eq!(b[0].blank, 1);
        assert_eq!(b[1].blank, 0);
        assert_eq!(b[2].sentence.text(), "b f g.");
    }

    #[test]
    fn test_index_registers_expression_once() {
        let corpus = Corpus::index(&["She looked_1 it up_1 yesterday."]);
        assert_eq!(corpus.frequency("looked~up"), 1);
        assert!(!corpus.contains_identity("looked"));
        assert!(!corpus.contains_identity("up"));
        assert_eq!(corpus.occurrences_of("looked~up")[0].blank, 1);
    }

    #[test]
    fn test_expressions_in_different_order_share_identity() {
        let corpus = Corpus::index(&["look_1 it up_1", "up_1 you look_1"]);
        assert_eq!(corpus.frequency("look~up"), 2);
    }

    #[test]
    fn test_empty_corpus() {
        let lines: Vec<String> = Vec::new();
        let corpus = Corpus::index(&lines);
        assert!(corpus.is_empty());
        assert!(corpus.occurrences().is_empty());
    }

    #[test]
    fn test_sentence_lookup() {
        let corpus = Corpus::index(&["a b c."]);
        let id = Tokenizer::tokenize("a b c.").id();
        assert!(corpus.sentence(id).is_some());
    }

    #[test]
    fn test_invalid_lines() {
        let lines = [
            "A fine line.",
            "No  double spaces",
            " leading space",
            "trailing space ",
            "!!! ...",
            "Bad # char",
            "Tagged_1 words_1 are fine",
            "123",
            "x word_1_2 y_2 z.",
            "odd_name_2 stays_2 fine",
        ];
        assert_eq!(
            find_invalid_lines(&lines),
            vec![
                "No  double spaces",
                " leading space",
                "trailing space ",
                "!!! ...",
                "Bad # char",
                "123",
                "x word_1_2 y_2 z.",
            ]
        );
    }

    #[test]
    fn test_reconstruct_in_use() {
        let map = stored(&[
            ("b", "a ", "b", "", "", " c.", true),
            ("d", "b ", "d", "", "", " e.", false),
        ]);
        let in_use = InUseFlashcards::reconstruct(&map).unwrap();
        assert_eq!(in_use.len(), 1);
        assert!(in_use.get("d").is_empty());

        let card = &in_use.get("b")[0];
        assert_eq!(card.blank(), 1);
        assert!(card.in_use());
        assert_eq!(card.sentence().text(), "a b c.");
        assert_eq!(card.sentence().id(), Tokenizer::tokenize("a b c.").id());
    }

    #[test]
    fn test_reconstruct_split_expression() {
        let map = stored(&[(
            "looked~up",
            "She ",
            "looked",
            " it ",
            "up",
            " yesterday.",
            true,
        )]);
        let in_use = InUseFlashcards::reconstruct(&map).unwrap();
        let card = &in_use.get("looked~up")[0];
        assert_eq!(card.lexical_id(), "looked~up");
        assert_eq!(card.blank(), 1);
        assert_eq!(card.serializable(), &map["looked~up"][0]);
    }

    #[test]
    fn test_reconstruct_punctuated_blank() {
        let map = stored(&[("Hi", "\"", "Hi", "", "", ",\" he said.", true)]);
        let in_use = InUseFlashcards::reconstruct(&map).unwrap();
        assert_eq!(in_use.get("Hi")[0].sentence().text(), "\"Hi,\" he said.");
    }

    #[test]
    fn test_reconstruct_deduplicates() {
        let map = stored(&[
            ("b", "a ", "b", "", "", " c.", true),
            ("b", "a ", "b", "", "", " c.", true),
        ]);
        assert_eq!(InUseFlashcards::reconstruct(&map).unwrap().len(), 1);
    }

    #[test]
    fn test_unreadable_in_use_card() {
        let map = stored(&[("b", "a ", "", "", "", " c.", true)]);
        let err = InUseFlashcards::reconstruct(&map).unwrap_err();
        assert!(matches!(err, ClozeError::UnreadableFlashcard { .. }));
    }

    #[test]
    fn test_in_use_sentences_are_distinct() {
        let map = stored(&[
            ("a", "", "a", "", "", " b c.", true),
            ("b", "a ", "b", "", "", " c.", true),
            ("d", "", "d", "", "", " e.", true),
        ]);
        let in_use = InUseFlashcards::reconstruct(&map).unwrap();
        assert_eq!(in_use.sentences().len(), 2);
    }
}
