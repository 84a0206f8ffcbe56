//! Multi-word expressions.
//!
//! Words of one line sharing a tag (`look_1 it up_1`) form one lexical unit.
//! Members need not be adjacent; [`ExpressionSplit`] describes how the
//! members are laid out around the first gap.

use std::ops::Range;

use tracing::warn;

use crate::char_categories::EXPRESSION_MARKER;

/// Separator between member words in an expression's lexical identity
pub const IDENTITY_SEPARATOR: &str = "~";

/// A tagged group of tokens within one sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiWordExpression {
    /// The in-line tag shared by the members
    pub tag: u32,
    /// Member token positions, ascending
    pub members: Vec<usize>,
    /// Sorted member texts joined by [`IDENTITY_SEPARATOR`]
    pub identity: String,
}

/// Layout of an expression's members around its first gap.
///
/// `before_split` members form the first contiguous run, followed by
/// `inside_split` non-member tokens, then `after_split` tokens up to and
/// including the last member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpressionSplit {
    pub before_split: usize,
    pub inside_split: usize,
    pub after_split: usize,
}

impl ExpressionSplit {
    /// Check if the expression has a gap
    pub fn is_split(&self) -> bool {
        self.after_split > 0
    }
}

impl MultiWordExpression {
    /// Build an expression from its tag, member positions and member texts
    pub fn new(tag: u32, members: Vec<usize>, texts: &[&str]) -> Self {
        MultiWordExpression {
            tag,
            members,
            identity: expression_identity(texts),
        }
    }

    /// Position of the first member; blanks for the expression point here
    pub fn first(&self) -> usize {
        self.members[0]
    }

    /// Position of the last member
    pub fn last(&self) -> usize {
        self.members[self.members.len() - 1]
    }

    /// Check if a token position belongs to this expression
    pub fn contains(&self, position: usize) -> bool {
        self.members.binary_search(&position).is_ok()
    }

    /// Count members before, non-members inside and tokens after the first gap
    pub fn split(&self) -> ExpressionSplit {
        let first = self.first();
        let mut run = 1;
        while run < self.members.len() && self.members[run] == first + run {
            run += 1;
        }

        if run == self.members.len() {
            return ExpressionSplit {
                before_split: run,
                inside_split: 0,
                after_split: 0,
            };
        }

        let resume = self.members[run];
        ExpressionSplit {
            before_split: run,
            inside_split: resume - (first + run),
            after_split: self.last() - resume + 1,
        }
    }

    /// Token ranges of the two cloze parts; the second is empty when unsplit
    pub fn cloze_ranges(&self) -> (Range<usize>, Range<usize>) {
        let split = self.split();
        let first = self.first();
        let part1 = first..first + split.before_split;
        let part2_start = part1.end + split.inside_split;
        (part1, part2_start..part2_start + split.after_split)
    }
}

/// Lexical identity of an expression: member texts sorted, then joined.
pub fn expression_identity(texts: &[&str]) -> String {
    let mut sorted = texts.to_vec();
    sorted.sort_unstable();
    sorted.join(IDENTITY_SEPARATOR)
}

/// Split off a well-formed `_<digits>` tag without logging
fn split_tag(word: &str) -> Option<(&str, u32)> {
    let (text, tag) = word.rsplit_once(EXPRESSION_MARKER)?;
    if text.is_empty() || tag.is_empty() || !tag.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    tag.parse().ok().map(|tag| (text, tag))
}

/// Split a word into its text and expression tag (`"kick_1"` -> `("kick", Some(1))`).
///
/// Words with a malformed tag are kept whole.
pub fn parse_expression_tag(word: &str) -> (&str, Option<u32>) {
    match split_tag(word) {
        Some((text, tag)) => (text, Some(tag)),
        None => {
            if word.contains(EXPRESSION_MARKER) {
                warn!("Invalid expression tag in word '{}', treating it as a plain word", word);
            }
            (word, None)
        }
    }
}

/// Check if a word carries a tag whose text is itself tagged, as in `word_1_2`.
///
/// Such a word renders as `word_1`, which would read back as a tagged word.
pub fn has_nested_tag(word: &str) -> bool {
    split_tag(word).map_or(false, |(text, _)| split_tag(text).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expression(members: &[usize]) -> MultiWordExpression {
        let texts: Vec<String> = members.iter().map(|m| format!("w{}", m)).collect();
        let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
        MultiWordExpression::new(1, members.to_vec(), &texts)
    }

    #[test]
    fn test_identity_is_order_independent() {
        assert_eq!(
            expression_identity(&["kick", "the", "bucket"]),
            expression_identity(&["the", "bucket", "kick"])
        );
        assert_eq!(expression_identity(&["kick", "the", "bucket"]), "bucket~kick~the");
    }

    #[test]
    fn test_contiguous_split() {
        let split = expression(&[2, 3, 4]).split();
        assert_eq!(
            split,
            ExpressionSplit {
                before_split: 3,
                inside_split: 0,
                after_split: 0
            }
        );
        assert!(!split.is_split());
    }

    #[test]
    fn test_single_gap_split() {
        let expr = expression(&[1, 3]);
        assert_eq!(
            expr.split(),
            ExpressionSplit {
                before_split: 1,
                inside_split: 1,
                after_split: 1
            }
        );
        assert_eq!(expr.cloze_ranges(), (1..2, 3..4));
    }

    #[test]
    fn test_multiple_gaps_extend_second_part() {
        let expr = expression(&[0, 2, 4]);
        assert_eq!(
            expr.split(),
            ExpressionSplit {
                before_split: 1,
                inside_split: 1,
                after_split: 3
            }
        );
        assert_eq!(expr.cloze_ranges(), (0..1, 2..5));
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_expression_tag("kick_1"), ("kick", Some(1)));
        assert_eq!(parse_expression_tag("kick"), ("kick", None));
        assert_eq!(parse_expression_tag("kick_x"), ("kick_x", None));
        assert_eq!(parse_expression_tag("_1"), ("_1", None));
        assert_eq!(parse_expression_tag("kick_"), ("kick_", None));
        assert_eq!(parse_expression_tag("a_b_2"), ("a_b", Some(2)));
    }

    #[test]
    fn test_nested_tag() {
        assert!(has_nested_tag("word_1_2"));
        assert!(!has_nested_tag("word_2"));
        assert!(!has_nested_tag("a_b_2"));
        assert!(!has_nested_tag("_1_2"));
        assert!(!has_nested_tag("word"));
    }
}
