//! Book family detection from a volume's front matter
//!
//! Volumes open with the collection heading, e.g. "Majjhimanikāye" or
//! "Khuddakanikāye Jātakapāḷi", ahead of the first chapter heading.

use crate::book_family::BookFamily;
use crate::helpers::fold_for_match;
use crate::types::{Result, SourceLine, StructureError};

/// How far into the volume the collection heading is looked for.
pub const DETECTION_WINDOW: usize = 40;

const COLLECTION_MARKERS: [&str; 2] = ["nikāy", "jātakapāḷi"];

/// Find the collection heading and return its family key.
///
/// Jātaka volumes name the Khuddaka collection on a line of its own before
/// the book title, so a Jātaka match anywhere in the window wins.
pub fn detect_family_name(lines: &[SourceLine]) -> Option<String> {
    let keys: Vec<String> = lines.iter()
        .take(DETECTION_WINDOW)
        .map(|line| line.text.trim())
        .filter(|text| !text.is_empty())
        .filter(|text| {
            let folded = fold_for_match(text);
            COLLECTION_MARKERS.iter().any(|marker| folded.contains(marker))
        })
        .filter_map(BookFamily::normalize_name)
        .collect();

    keys.iter()
        .find(|key| key.as_str() == "jataka")
        .or_else(|| keys.first())
        .cloned()
}

/// Detect the built-in book family for a volume.
///
/// # Errors
/// Returns `UnknownFamily` if no collection heading is found, or it names
/// a collection with no built-in family.
pub fn detect_book_family(lines: &[SourceLine]) -> Result<BookFamily> {
    let key = detect_family_name(lines).ok_or_else(|| {
        StructureError::UnknownFamily(format!("no collection heading in the first {} lines", DETECTION_WINDOW))
    })?;

    tracing::info!("Detected book family: {}", key);
    BookFamily::builtin(&key)
}
