//! Check that a generated flashcard set keeps every in-use flashcard.

use tracing::error;

use crate::corpus::InUseFlashcards;
use crate::error::{ClozeError, Result};
use crate::flashcard::FlashcardMap;

/// Fail if any in-use flashcard is missing from `result` under its key.
pub fn ensure_in_use_persist(in_use: &InUseFlashcards, result: &FlashcardMap) -> Result<()> {
    for (key, cards) in in_use.iter() {
        let Some(generated) = result.get(key) else {
            error!("In-use key '{}' is missing from the generated flashcards", key);
            return Err(ClozeError::MissingInUseKey { key: key.clone() });
        };

        for card in cards {
            if !generated.contains(card.serializable()) {
                error!("In-use flashcard '{}' for '{}' was dropped", card, key);
                return Err(ClozeError::MissingInUseFlashcard {
                    key: key.clone(),
                    flashcard: card.to_string(),
                });
            }
        }
    }
    Ok(())
}
