//! Numbered-unit parsing
//!
//! Walks the lines of one slice and accumulates numbered content units.
//! Titles and vagga labels seen along the way are carried forward to the
//! units that follow them.

use crate::helpers::parse_numbered_line;
use crate::heading_classifier::HeadingClassifier;
use crate::types::{ContentUnit, Diagnostic, HierarchyLevel, RawLine, StructuralSlice};

/// Carry-forward state of one forward pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    /// Attaches to the next unit only
    pub pending_title: Option<String>,
    /// Number printed before the pending title
    pub pending_title_number: Option<u32>,
    /// Attaches to every unit until the next vagga heading
    pub pending_subgroup: Option<String>,
    pub current_unit: Option<ContentUnit>,
}

impl ParserState {
    /// State for a slice whose units all belong to one vagga.
    pub fn in_subgroup(label: Option<String>) -> Self {
        ParserState {
            pending_subgroup: label,
            ..Default::default()
        }
    }
}

/// Units parsed from one slice, with any conditions worth reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUnits {
    pub units: Vec<ContentUnit>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct UnitParser<'a> {
    classifier: &'a HeadingClassifier<'a>,
    expected_levels: Vec<HierarchyLevel>,
}

impl<'a> UnitParser<'a> {
    pub fn new(classifier: &'a HeadingClassifier<'a>) -> Self {
        UnitParser {
            classifier,
            expected_levels: classifier.family().content_levels(),
        }
    }

    pub fn parse_units(&self, slice: &StructuralSlice, lines: &[RawLine]) -> ParsedUnits {
        self.parse_units_with(slice, lines, ParserState::default())
    }

    /// Parse the slice body, starting from the given carry-forward state.
    pub fn parse_units_with(&self, slice: &StructuralSlice, lines: &[RawLine], mut state: ParserState) -> ParsedUnits {
        let mut parsed = ParsedUnits::default();
        let range = slice.content_range();
        let end = range.end.min(lines.len());
        // The open unit was started by orphan text, not by a numbered line
        let mut implicit_open = false;

        for line in &lines[range.start.min(end)..end] {
            if let Some(candidate) = self.classifier.classify_reporting(line, &self.expected_levels, &mut parsed.diagnostics) {
                match candidate.level {
                    HierarchyLevel::SubGroup => {
                        state.pending_subgroup = Some(candidate.bare_name);
                        continue;
                    }
                    HierarchyLevel::ContentUnit => {
                        state.pending_title = Some(candidate.bare_name);
                        state.pending_title_number = candidate.declared_number;
                        continue;
                    }
                    HierarchyLevel::ChapterUnit => {}
                }
            }

            if let Some(numbered) = parse_numbered_line(&line.text) {
                // A numbered chapter-style name inside a chapter is a title,
                // never a unit of its own
                if self.classifier.has_chapter_suffix(numbered.rest) {
                    state.pending_title = Some(numbered.rest.to_string());
                    state.pending_title_number = Some(numbered.number);
                    continue;
                }

                // "1." right after orphan text continues the implicit unit 1
                if implicit_open && numbered.range.is_none() && numbered.number == 1 {
                    if let Some(unit) = state.current_unit.as_mut() {
                        if unit.title.is_none() {
                            unit.title = state.pending_title.take();
                            unit.title_number = state.pending_title_number.take();
                        }
                        unit.body_lines.push(numbered.rest.to_string());
                    }
                    implicit_open = false;
                    continue;
                }
                implicit_open = false;

                if let Some(unit) = state.current_unit.take() {
                    parsed.units.push(unit);
                }

                state.current_unit = Some(ContentUnit {
                    id: None,
                    number: numbered.number,
                    number_range: numbered.range.clone(),
                    title: state.pending_title.take(),
                    title_number: state.pending_title_number.take(),
                    subgroup_label: state.pending_subgroup.clone(),
                    line_position: line.position,
                    body_lines: vec![numbered.rest.to_string()],
                });
                continue;
            }

            let text = line.text.trim();
            match state.current_unit.as_mut() {
                Some(unit) => unit.body_lines.push(text.to_string()),
                None => {
                    parsed.diagnostics.push(Diagnostic::orphan_body_text(
                        line.position,
                        format!("Text before the first numbered unit opens an implicit unit 1: '{}'", text),
                    ));
                    state.current_unit = Some(ContentUnit {
                        id: None,
                        number: 1,
                        number_range: None,
                        title: state.pending_title.take(),
                        title_number: state.pending_title_number.take(),
                        subgroup_label: state.pending_subgroup.clone(),
                        line_position: line.position,
                        body_lines: vec![text.to_string()],
                    });
                    implicit_open = true;
                }
            }
        }

        if let Some(unit) = state.current_unit.take() {
            parsed.units.push(unit);
        }

        if let Some(title) = state.pending_title {
            tracing::debug!("Title '{}' at the end of lines {:?} has no unit to attach to", title, range);
        }

        parsed
    }
}
