//! ID generation and cross-volume numbering continuity
//!
//! Chapter ids have the form `{prefix}.{running_index}`, e.g. "sn.12", where
//! the running index continues across the physical volumes of one work.
//! Content ids extend the chapter id with the unit number or range:
//! "sn.12.3", "sn.12.617-621". A number seen again in the same chapter,
//! as when verse numbering restarts under each jātaka, gets an occurrence
//! suffix: "ja.8.1", "ja.8.1_2".

use std::collections::HashMap;

use crate::book_family::BookFamily;
use crate::types::{ChapterUnit, ContentUnit, Result, StructureError, VolumeContinuationState};

/// How content-unit numbers are treated when ids are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentNumbering {
    /// Keep the numbers declared in the text
    #[default]
    Preserve,
    /// Overwrite with 1, 2, 3… inside each chapter
    RenumberPerChapter,
}

impl ContentNumbering {
    pub fn for_family(family: &BookFamily) -> Self {
        if family.renumber_per_chapter {
            ContentNumbering::RenumberPerChapter
        } else {
            ContentNumbering::Preserve
        }
    }
}

pub fn chapter_id(prefix: &str, running_index: u32) -> String {
    format!("{}.{}", prefix, running_index)
}

fn content_key(unit: &ContentUnit) -> String {
    match &unit.number_range {
        Some(range) => range.clone(),
        None => unit.number.to_string(),
    }
}

pub fn content_id(chapter_id: &str, unit: &ContentUnit) -> String {
    format!("{}.{}", chapter_id, content_key(unit))
}

/// Content id for the `occurrence`-th unit with the same key, counting from 1.
pub fn content_id_nth(chapter_id: &str, unit: &ContentUnit, occurrence: u32) -> String {
    if occurrence <= 1 {
        content_id(chapter_id, unit)
    } else {
        format!("{}_{}", content_id(chapter_id, unit), occurrence)
    }
}

/// Assign chapter and content ids in order, continuing from `continuation`.
///
/// Returns the chapters and the state to pass to the next volume. With no
/// chapters the state comes back unchanged.
///
/// # Errors
/// `NumberingOverflow` when the running index would pass `u32::MAX`.
pub fn assign_ids(
    mut chapters: Vec<ChapterUnit>,
    prefix: &str,
    continuation: VolumeContinuationState,
    numbering: ContentNumbering,
) -> Result<(Vec<ChapterUnit>, VolumeContinuationState)> {
    let mut running_index = continuation.last_assigned_number;

    for chapter in chapters.iter_mut() {
        running_index = running_index.checked_add(1).ok_or_else(|| StructureError::NumberingOverflow {
            prefix: prefix.to_string(),
            last_assigned_number: continuation.last_assigned_number,
        })?;
        chapter.number = running_index;
        chapter.id = chapter_id(prefix, running_index);

        let mut seen: HashMap<String, u32> = HashMap::new();
        for (idx, unit) in chapter.content_units.iter_mut().enumerate() {
            if numbering == ContentNumbering::RenumberPerChapter {
                unit.number = idx as u32 + 1;
                unit.number_range = None;
            }
            let occurrence = seen.entry(content_key(unit)).or_insert(0);
            *occurrence += 1;
            unit.id = Some(content_id_nth(&chapter.id, unit, *occurrence));
        }
    }

    if !chapters.is_empty() {
        tracing::debug!(
            "Assigned ids {}..={} with prefix '{}'",
            continuation.last_assigned_number + 1,
            running_index,
            prefix
        );
    }

    Ok((chapters, VolumeContinuationState::new(running_index)))
}
