//! Boundary slicing
//!
//! Turns an ordered list of headings at one level into contiguous line
//! ranges. Sibling slices always tile their parent range exactly: a leading
//! slice covers lines before the first heading, and a parent with no
//! headings at all becomes a single fallback slice.

use std::ops::Range;

use crate::types::{HeadingCandidate, HierarchyLevel, SliceOrigin, StructuralSlice};

/// Slice `parent` at the given headings.
///
/// `headings` must be sorted by `line_position` and lie inside `parent`,
/// which holds for the output of a single left-to-right heading scan.
pub fn slice(
    headings: &[HeadingCandidate],
    level: HierarchyLevel,
    parent: Range<usize>,
    fallback_title: &str,
) -> Vec<StructuralSlice> {
    debug_assert!(
        headings.windows(2).all(|w| w[0].line_position < w[1].line_position),
        "headings must be sorted by line position"
    );
    debug_assert!(
        headings.iter().all(|h| parent.contains(&h.line_position)),
        "headings must lie inside the parent range"
    );

    if headings.is_empty() {
        return vec![StructuralSlice {
            level,
            start_line: parent.start,
            end_line: parent.end,
            heading: HeadingCandidate::synthetic(level, fallback_title, parent.start),
            origin: SliceOrigin::Fallback,
        }];
    }

    let mut slices = Vec::with_capacity(headings.len() + 1);

    let first_start = headings[0].line_position;
    if first_start > parent.start {
        slices.push(StructuralSlice {
            level,
            start_line: parent.start,
            end_line: first_start,
            heading: HeadingCandidate::synthetic(level, "", parent.start),
            origin: SliceOrigin::Leading,
        });
    }

    for (idx, heading) in headings.iter().enumerate() {
        let end_line = match headings.get(idx + 1) {
            Some(next) => next.line_position,
            None => parent.end,
        };

        slices.push(StructuralSlice {
            level,
            start_line: heading.line_position,
            end_line,
            heading: heading.clone(),
            origin: SliceOrigin::Heading,
        });
    }

    slices
}

/// True if `slices` cover `parent` with no gaps and no overlaps.
pub fn tiles_parent(slices: &[StructuralSlice], parent: &Range<usize>) -> bool {
    match (slices.first(), slices.last()) {
        (Some(first), Some(last)) => {
            first.start_line == parent.start
                && last.end_line == parent.end
                && slices.windows(2).all(|w| w[0].end_line == w[1].start_line)
                && slices.iter().all(|s| s.start_line <= s.end_line)
        }
        _ => parent.is_empty(),
    }
}
