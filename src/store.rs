//! Reading the sentence corpus and reading/writing the flashcard store.

use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::error::{ClozeError, Result};
use crate::flashcard::FlashcardMap;

/// Read corpus lines: trimmed, NFC-normalized, empty lines skipped
pub fn read_sentence_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|e| ClozeError::io(path, e))?;

    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| ClozeError::io(path, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        lines.push(line.nfc().collect());
    }

    info!("Read {} sentence lines from '{}'", lines.len(), path.display());
    Ok(lines)
}

/// Parse a flashcard store from JSON text
pub fn parse_flashcards(json: &str) -> Result<FlashcardMap> {
    Ok(serde_json::from_str(json)?)
}

/// Read a flashcard store; `None` when the file does not exist
pub fn read_flashcards(path: impl AsRef<Path>) -> Result<Option<FlashcardMap>> {
    let path = path.as_ref();
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ClozeError::io(path, e)),
    };

    let flashcards = parse_flashcards(&json)?;
    debug!(
        "Read {} stored lexical units from '{}'",
        flashcards.len(),
        path.display()
    );
    Ok(Some(flashcards))
}

/// Replace `path` with what `write` produces.
///
/// The content goes to a temporary file next to `path`, which is renamed
/// over it once complete. A failed write leaves the previous file intact.
pub(crate) fn replace_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| ClozeError::io(parent, e))?;

    {
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        write(&mut writer)?;
        writer.flush().map_err(|e| ClozeError::io(path, e))?;
    }
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| ClozeError::io(path, e))?;

    temp_file
        .persist(path)
        .map_err(|e| ClozeError::io(path, e.error))?;
    Ok(())
}

/// Write flashcards to `path` as JSON with a 4-space indent, non-ASCII kept
/// as is, replacing any existing file
pub fn write_flashcards<T: Serialize>(path: impl AsRef<Path>, flashcards: &T) -> Result<()> {
    let path = path.as_ref();

    replace_file(path, |writer| {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        flashcards.serialize(&mut serializer)?;
        writer
            .write_all(b"\n")
            .map_err(|e| ClozeError::io(path, e))
    })?;

    info!("Wrote flashcards to '{}'", path.display());
    Ok(())
}
