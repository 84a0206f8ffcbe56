//! Sentence model.
//!
//! A [`Sentence`] owns its tokens, the punctuation marks keyed by token
//! position and its multi-word expressions. Rendering the tokens and marks
//! back in order reproduces the untagged line exactly; the rendered text is
//! also what the sentence identity is hashed from.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use once_cell::unsync::OnceCell;
use sha2::{Digest, Sha256};

use crate::expression::MultiWordExpression;
use crate::token::{Punctuation, PunctuationPosition, Token};

/// Deterministic identity of a sentence, hashed from its rendered text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SentenceId(pub u64);

impl SentenceId {
    /// First 8 bytes of the SHA-256 digest of the text, big-endian
    pub fn of(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let digest = hasher.finalize();

        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        SentenceId(u64::from_be_bytes(prefix))
    }
}

impl std::fmt::Display for SentenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// One element of a rendered sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Atom<'a> {
    Space,
    Punct(&'a str),
    Word(usize),
}

/// A parsed corpus line
#[derive(Debug, Clone)]
pub struct Sentence {
    id: SentenceId,
    text: String,
    tokens: Vec<Token>,
    punctuation: BTreeMap<usize, Vec<Punctuation>>,
    expressions: Vec<MultiWordExpression>,
    frequencies: OnceCell<HashMap<String, usize>>,
}

impl PartialEq for Sentence {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Sentence {}

impl Sentence {
    pub fn id(&self) -> SentenceId {
        self.id
    }

    /// The rendered line, without expression tags
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Number of tokens (alone punctuation is not counted)
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Punctuation marks stored under a token position
    pub fn punctuation_at(&self, position: usize) -> &[Punctuation] {
        self.punctuation
            .get(&position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn expressions(&self) -> &[MultiWordExpression] {
        &self.expressions
    }

    /// The multi-word expression a token belongs to, if any
    pub fn expression_of(&self, index: usize) -> Option<&MultiWordExpression> {
        self.tokens
            .get(index)
            .and_then(|t| t.expression)
            .and_then(|e| self.expressions.get(e))
    }

    /// Lexical units of the sentence as `(identity, blank position)`.
    ///
    /// Standalone tokens yield themselves; an expression yields once, at its
    /// first member.
    pub fn lexical_units(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.tokens.iter().filter_map(move |token| match token.expression {
            None => Some((token.lexical_id.as_str(), token.index)),
            Some(e) if self.expressions[e].first() == token.index => {
                Some((token.lexical_id.as_str(), token.index))
            }
            Some(_) => None,
        })
    }

    /// Occurrence count of each lexical identity in this sentence
    pub fn frequencies(&self) -> &HashMap<String, usize> {
        self.frequencies.get_or_init(|| {
            let mut counts = HashMap::new();
            for (identity, _) in self.lexical_units() {
                *counts.entry(identity.to_string()).or_insert(0) += 1;
            }
            counts
        })
    }

    /// Token ranges blanked by a cloze on `blank`; the second is empty unless
    /// the blank belongs to a split expression
    pub fn cloze_ranges(&self, blank: usize) -> Option<(Range<usize>, Range<usize>)> {
        let token = self.tokens.get(blank)?;
        match token.expression.and_then(|e| self.expressions.get(e)) {
            Some(expression) => Some(expression.cloze_ranges()),
            None => Some((blank..blank + 1, blank + 1..blank + 1)),
        }
    }

    /// Flatten the sentence into atoms; each whitespace chunk is one alone
    /// mark or `[before] word [after]`, chunks separated by one space
    pub(crate) fn atoms(&self) -> Vec<Atom<'_>> {
        let mut atoms = Vec::with_capacity(self.tokens.len() * 2);

        for position in 0..=self.tokens.len() {
            let marks = self.punctuation_at(position);

            for mark in marks
                .iter()
                .filter(|m| m.position == PunctuationPosition::Alone)
            {
                if !atoms.is_empty() {
                    atoms.push(Atom::Space);
                }
                atoms.push(Atom::Punct(&mark.text));
            }

            if position == self.tokens.len() {
                break;
            }

            if !atoms.is_empty() {
                atoms.push(Atom::Space);
            }
            atoms.extend(
                marks
                    .iter()
                    .filter(|m| m.position == PunctuationPosition::Before)
                    .map(|m| Atom::Punct(&m.text)),
            );
            atoms.push(Atom::Word(position));
            atoms.extend(
                marks
                    .iter()
                    .filter(|m| m.position == PunctuationPosition::After)
                    .map(|m| Atom::Punct(&m.text)),
            );
        }

        atoms
    }

    pub(crate) fn render(&self, atoms: &[Atom<'_>]) -> String {
        let mut out = String::new();
        for atom in atoms {
            match atom {
                Atom::Space => out.push(' '),
                Atom::Punct(text) => out.push_str(text),
                Atom::Word(i) => out.push_str(&self.tokens[*i].text),
            }
        }
        out
    }
}

impl std::fmt::Display for Sentence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Incremental construction of a [`Sentence`] from classified chunks
#[derive(Debug, Default)]
pub struct SentenceBuilder {
    tokens: Vec<Token>,
    punctuation: BTreeMap<usize, Vec<Punctuation>>,
    tagged: Vec<(u32, Vec<usize>)>,
}

impl SentenceBuilder {
    pub fn new() -> Self {
        SentenceBuilder::default()
    }

    /// Add punctuation standing on its own; it is placed before the next token
    pub fn push_alone(&mut self, text: &str) {
        let position = self.tokens.len();
        self.punctuation
            .entry(position)
            .or_default()
            .push(Punctuation::new(text, PunctuationPosition::Alone));
    }

    /// Add a word with its surrounding punctuation, returning its position
    pub fn push_word(&mut self, before: &str, text: &str, tag: Option<u32>, after: &str) -> usize {
        let position = self.tokens.len();

        if !before.is_empty() {
            self.punctuation
                .entry(position)
                .or_default()
                .push(Punctuation::new(before, PunctuationPosition::Before));
        }
        if !after.is_empty() {
            self.punctuation
                .entry(position)
                .or_default()
                .push(Punctuation::new(after, PunctuationPosition::After));
        }

        if let Some(tag) = tag {
            match self.tagged.iter_mut().find(|(t, _)| *t == tag) {
                Some((_, members)) => members.push(position),
                None => self.tagged.push((tag, vec![position])),
            }
        }

        self.tokens.push(Token::new(text, position));
        position
    }

    /// Resolve expressions and lexical identities, then render and hash
    pub fn build(self) -> Sentence {
        let SentenceBuilder {
            mut tokens,
            punctuation,
            tagged,
        } = self;

        let mut expressions = Vec::with_capacity(tagged.len());
        for (tag, members) in tagged {
            let texts: Vec<&str> = members.iter().map(|&m| tokens[m].text.as_str()).collect();
            let expression = MultiWordExpression::new(tag, members, &texts);
            for &member in &expression.members {
                tokens[member].expression = Some(expressions.len());
                tokens[member].lexical_id = expression.identity.clone();
            }
            expressions.push(expression);
        }

        let mut sentence = Sentence {
            id: SentenceId(0),
            text: String::new(),
            tokens,
            punctuation,
            expressions,
            frequencies: OnceCell::new(),
        };
        let text = sentence.render(&sentence.atoms());
        sentence.id = SentenceId::of(&text);
        sentence.text = text;
        sentence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    #[test]
    fn test_render_plain() {
        let sentence = Tokenizer::tokenize("I like cats.");
        assert_eq!(sentence.text(), "I like cats.");
        assert_eq!(sentence.len(), 3);
    }

    #[test]
    fn test_render_alone_punctuation() {
        for line in [
            "Well , I agree .",
            "- Yes , she said",
            "\"Hi,\" he said.",
            "I agree, ?",
            "one ; two ( three ) four",
        ] {
            assert_eq!(Tokenizer::tokenize(line).text(), line);
        }
    }

    #[test]
    fn test_tags_are_not_rendered() {
        let tagged = Tokenizer::tokenize("She looked_1 it up_1 yesterday.");
        let plain = Tokenizer::tokenize("She looked it up yesterday.");
        assert_eq!(tagged.text(), "She looked it up yesterday.");
        assert_eq!(tagged.id(), plain.id());
    }

    #[test]
    fn test_sentence_id_is_deterministic() {
        assert_eq!(SentenceId::of("a b c."), SentenceId::of("a b c."));
        assert_ne!(SentenceId::of("a b c."), SentenceId::of("a b c"));
        assert_eq!(SentenceId::of(""), SentenceId(0xe3b0_c442_98fc_1c14));
        assert_eq!(SentenceId::of("").to_string(), "e3b0c44298fc1c14");
    }

    #[test]
    fn test_lexical_units() {
        let sentence = Tokenizer::tokenize("She looked_1 it up_1 yesterday.");
        let units: Vec<(&str, usize)> = sentence.lexical_units().collect();
        assert_eq!(
            units,
            vec![("She", 0), ("looked~up", 1), ("it", 2), ("yesterday", 4)]
        );
    }

    #[test]
    fn test_frequencies() {
        let sentence = Tokenizer::tokenize("the cat saw the dog.");
        let freq = sentence.frequencies();
        assert_eq!(freq.get("the"), Some(&2));
        assert_eq!(freq.get("dog"), Some(&1));
        assert_eq!(freq.len(), 4);
    }

    #[test]
    fn test_cloze_ranges() {
        let sentence = Tokenizer::tokenize("She looked_1 it up_1 yesterday.");
        assert_eq!(sentence.cloze_ranges(0), Some((0..1, 1..1)));
        assert_eq!(sentence.cloze_ranges(1), Some((1..2, 3..4)));
        assert_eq!(sentence.cloze_ranges(3), Some((1..2, 3..4)));
        assert_eq!(sentence.cloze_ranges(9), None);
    }

    #[test]
    fn test_empty_sentence() {
        let sentence = SentenceBuilder::new().build();
        assert!(sentence.is_empty());
        assert_eq!(sentence.text(), "");
        assert_eq!(sentence.lexical_units().count(), 0);
    }
}
