//! Volume and work extraction
//!
//! One forward pass per volume:
//!
//! 1. normalize the source lines
//! 2. check that every structural suffix in the volume is declared by the family
//! 3. locate chapter headings and slice the volume into chapters
//! 4. inside each chapter, optionally slice by vagga, then parse numbered units
//! 5. assign ids, continuing the numbering of the previous volume

use crate::book_family::{BookFamily, KNOWN_STRUCTURAL_SUFFIXES};
use crate::boundary_slicer;
use crate::heading_classifier::HeadingClassifier;
use crate::helpers::{fold_for_match, fold_suffixes, has_sentence_punctuation, matching_suffix, parse_numbered_line};
use crate::id_assigner::{assign_ids, ContentNumbering};
use crate::logger::{info, warn};
use crate::normalizer::LineNormalizer;
use crate::types::{
    ChapterUnit, ContentUnit, Diagnostic, HeadingKind, HierarchyLevel, RawLine, Result, SliceOrigin,
    SourceLine, StructuralSlice, StructureError, VolumeContinuationState, VolumeTree, WorkTree,
};
use crate::unit_parser::{ParserState, UnitParser};

/// Extraction engine configured for one book family.
pub struct StructureExtractor<'a> {
    family: &'a BookFamily,
    normalizer: LineNormalizer,
    classifier: HeadingClassifier<'a>,
    known_suffixes: Vec<(String, &'static str)>,
    declared_suffixes: Vec<String>,
}

impl<'a> StructureExtractor<'a> {
    /// Validates the family before anything is read.
    pub fn new(family: &'a BookFamily) -> Result<Self> {
        family.validate()?;

        let known_suffixes = KNOWN_STRUCTURAL_SUFFIXES.iter()
            .map(|suffix| (fold_for_match(suffix), *suffix))
            .collect();

        Ok(StructureExtractor {
            family,
            normalizer: LineNormalizer::new(family)?,
            classifier: HeadingClassifier::new(family),
            known_suffixes,
            declared_suffixes: fold_suffixes(&family.declared_suffixes()),
        })
    }

    pub fn family(&self) -> &BookFamily {
        self.family
    }

    pub fn classifier(&self) -> &HeadingClassifier<'a> {
        &self.classifier
    }

    pub fn normalize(&self, source: &[SourceLine]) -> Vec<RawLine> {
        self.normalizer.normalize(source)
    }

    /// Extract one physical volume from its source lines.
    pub fn extract_volume(
        &self,
        source: &[SourceLine],
        continuation: VolumeContinuationState,
    ) -> Result<(VolumeTree, VolumeContinuationState)> {
        let lines = self.normalizer.normalize(source);
        self.extract_lines(&lines, continuation)
    }

    /// Extract one volume from lines that are already normalized.
    ///
    /// # Errors
    /// Fails with `MisconfiguredBookFamily` before any structure is built if a
    /// numbered heading ends in a structural suffix the family does not declare.
    pub fn extract_lines(
        &self,
        lines: &[RawLine],
        continuation: VolumeContinuationState,
    ) -> Result<(VolumeTree, VolumeContinuationState)> {
        self.check_suffix_coverage(lines)?;

        let mut diagnostics = Vec::new();
        let root = 0..lines.len();

        let headings = self.classifier.locate_headings(lines, root.clone(), HierarchyLevel::ChapterUnit, &mut diagnostics);
        if headings.is_empty() {
            diagnostics.push(Diagnostic::no_headings_found(
                0,
                format!("No chapter headings found, using '{}' as the only chapter", self.family.default_title),
            ));
        }

        let slices = boundary_slicer::slice(&headings, HierarchyLevel::ChapterUnit, root, &self.family.default_title);

        let mut front_matter = Vec::new();
        let mut chapters = Vec::new();
        let mut division: Option<String> = None;
        // Division heading whose own lines still wait for a chapter
        let mut preamble_of: Option<&StructuralSlice> = None;

        for slice in &slices {
            match (slice.origin, slice.heading.kind) {
                (SliceOrigin::Leading, _) => {
                    front_matter = texts(&lines[slice.content_range()]);
                }
                (SliceOrigin::Heading, HeadingKind::Division) => {
                    if let Some(previous) = preamble_of.take() {
                        chapters.push(self.build_division_chapter(previous, lines, &mut diagnostics));
                    }
                    division = Some(slice.heading.bare_name.clone());
                    if !slice.is_empty() {
                        preamble_of = Some(slice);
                    }
                }
                _ => {
                    // A nipāta past the cutoff is its own chapter, not inside the previous division
                    if self.classifier.is_division_name(&slice.heading.bare_name) {
                        if let Some(previous) = preamble_of.take() {
                            chapters.push(self.build_division_chapter(previous, lines, &mut diagnostics));
                        }
                        division = None;
                    }
                    let mut chapter = self.build_chapter(slice, lines, division.clone(), &mut diagnostics);
                    if let Some(division_slice) = preamble_of.take() {
                        chapter.division_preamble = texts(&lines[division_slice.content_range()]);
                        diagnostics.push(Diagnostic::orphan_body_text(
                            division_slice.content_start(),
                            format!(
                                "Text between division '{}' and chapter '{}' kept as the chapter's division preamble",
                                division_slice.heading.bare_name, chapter.title
                            ),
                        ));
                    }
                    chapters.push(chapter);
                }
            }
        }

        if let Some(previous) = preamble_of.take() {
            chapters.push(self.build_division_chapter(previous, lines, &mut diagnostics));
        }

        let (chapters, next) = assign_ids(
            chapters,
            &self.family.id_prefix,
            continuation,
            ContentNumbering::for_family(self.family),
        )?;

        let unit_count: usize = chapters.iter().map(|c| c.content_units.len()).sum();
        info(&format!(
            "Extracted {} chapters, {} units from {} lines ({} diagnostics)",
            chapters.len(), unit_count, lines.len(), diagnostics.len()
        ));

        let tree = VolumeTree {
            family: self.family.name.clone(),
            id_prefix: self.family.id_prefix.clone(),
            front_matter,
            chapters,
            diagnostics,
        };

        Ok((tree, next))
    }

    fn build_chapter(
        &self,
        slice: &StructuralSlice,
        lines: &[RawLine],
        division: Option<String>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ChapterUnit {
        let content_units = if self.family.has_subgroup_layer {
            self.parse_subgroups(slice, lines, diagnostics)
        } else {
            let parsed = UnitParser::new(&self.classifier).parse_units(slice, lines);
            diagnostics.extend(parsed.diagnostics);
            parsed.units
        };

        tracing::debug!(
            "Chapter '{}' at lines {}..{}: {} units",
            slice.heading.bare_name, slice.start_line, slice.end_line, content_units.len()
        );

        ChapterUnit {
            id: String::new(),
            title: slice.heading.bare_name.clone(),
            number: 0,
            declared_number: slice.heading.declared_number,
            division,
            start_line: slice.start_line,
            end_line: slice.end_line,
            division_preamble: Vec::new(),
            content_units,
        }
    }

    /// A division with text of its own but no chapters after it becomes a chapter.
    fn build_division_chapter(
        &self,
        slice: &StructuralSlice,
        lines: &[RawLine],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ChapterUnit {
        diagnostics.push(Diagnostic::no_headings_found(
            slice.start_line,
            format!("Division '{}' has no chapter headings, using it as a chapter", slice.heading.bare_name),
        ));
        self.build_chapter(slice, lines, None, diagnostics)
    }

    /// Slice a chapter by vagga and parse each vagga separately.
    fn parse_subgroups(
        &self,
        chapter: &StructuralSlice,
        lines: &[RawLine],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<ContentUnit> {
        let range = chapter.content_range();
        let headings = self.classifier.locate_headings(lines, range.clone(), HierarchyLevel::SubGroup, diagnostics);

        if headings.is_empty() {
            diagnostics.push(Diagnostic::no_headings_found(
                chapter.start_line,
                format!("No vagga headings in chapter '{}'", chapter.heading.bare_name),
            ));
        }

        let parser = UnitParser::new(&self.classifier);
        let mut units = Vec::new();

        for sub in boundary_slicer::slice(&headings, HierarchyLevel::SubGroup, range, &chapter.heading.bare_name) {
            let label = match sub.origin {
                SliceOrigin::Heading => Some(sub.heading.bare_name.clone()),
                SliceOrigin::Leading | SliceOrigin::Fallback => None,
            };
            let parsed = parser.parse_units_with(&sub, lines, ParserState::in_subgroup(label));
            diagnostics.extend(parsed.diagnostics);
            units.extend(parsed.units);
        }

        units
    }

    /// Fail if a numbered heading ends in a known structural suffix that no
    /// table of this family declares.
    fn check_suffix_coverage(&self, lines: &[RawLine]) -> Result<()> {
        for line in lines {
            let Some(numbered) = parse_numbered_line(&line.text) else {
                continue;
            };
            if has_sentence_punctuation(numbered.rest) {
                continue;
            }

            let folded = fold_for_match(numbered.rest);
            if matching_suffix(&folded, &self.declared_suffixes).is_some() {
                continue;
            }

            if let Some((_, suffix)) = self.known_suffixes.iter().find(|(known, _)| folded.ends_with(known.as_str())) {
                return Err(StructureError::MisconfiguredBookFamily {
                    family: self.family.name.clone(),
                    suffix: suffix.to_string(),
                    line_position: line.position,
                    line: line.text.clone(),
                });
            }
        }

        Ok(())
    }
}

fn texts(lines: &[RawLine]) -> Vec<String> {
    lines.iter().map(|line| line.text.clone()).collect()
}

/// Extract one volume with a fresh engine.
pub fn extract_volume(
    family: &BookFamily,
    source: &[SourceLine],
    continuation: VolumeContinuationState,
) -> Result<(VolumeTree, VolumeContinuationState)> {
    StructureExtractor::new(family)?.extract_volume(source, continuation)
}

/// Extract the physical volumes of one logical work, in order.
///
/// Chapter numbering continues from `continuation` across all volumes. The
/// first misconfigured volume stops the whole work.
pub fn extract_work(
    family: &BookFamily,
    volumes: &[Vec<SourceLine>],
    continuation: VolumeContinuationState,
) -> Result<WorkTree> {
    let extractor = StructureExtractor::new(family)?;
    let mut state = continuation;
    let mut trees = Vec::with_capacity(volumes.len());

    for (idx, source) in volumes.iter().enumerate() {
        let (tree, next) = extractor.extract_volume(source, state)?;

        if !tree.diagnostics.is_empty() {
            warn(&format!("Volume {}: {} diagnostics", idx + 1, tree.diagnostics.len()));
        }

        state = next;
        trees.push(tree);
    }

    Ok(WorkTree {
        family: family.name.clone(),
        id_prefix: family.id_prefix.clone(),
        volumes: trees,
        continuation: state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiagnosticKind;

    fn extract(family: &BookFamily, texts: &[&str]) -> VolumeTree {
        let lines = SourceLine::from_lines(texts);
        extract_volume(family, &lines, VolumeContinuationState::default()).unwrap().0
    }

    #[test]
    fn test_front_matter_and_chapters() {
        let family = BookFamily::from_family_name("majjhima").unwrap();
        let tree = extract(&family, &[
            "Majjhimanikāye",
            "Mūlapaṇṇāsapāḷi",
            "1. Mūlapariyāyavaggo",
            "1. Mūlapariyāyasuttaṃ",
            "1. Evaṃ me sutaṃ.",
            "2. Sīhanādavaggo",
            "11. Cūḷasīhanādasuttaṃ",
            "139. Evaṃ me sutaṃ.",
        ]);

        assert_eq!(tree.front_matter, vec!["Majjhimanikāye".to_string(), "Mūlapaṇṇāsapāḷi".to_string()]);
        assert_eq!(tree.chapters.len(), 2);
        assert_eq!(tree.chapters[0].id, "mn.1");
        assert_eq!(tree.chapters[0].title, "Mūlapariyāyavaggo");
        assert_eq!(tree.chapters[1].content_units[0].number, 139);
        assert_eq!(tree.chapters[1].content_units[0].title.as_deref(), Some("Cūḷasīhanādasuttaṃ"));
        assert_eq!(tree.chapters[1].content_units[0].id.as_deref(), Some("mn.2.139"));
        assert!(tree.diagnostics.is_empty());
    }

    #[test]
    fn test_no_headings_single_default_chapter() {
        let family = BookFamily::from_family_name("majjhima").unwrap();
        let tree = extract(&family, &["1. Evaṃ me sutaṃ.", "2. Tatra kho."]);

        assert_eq!(tree.chapters.len(), 1);
        assert_eq!(tree.chapters[0].title, "Majjhimanikāyo");
        assert_eq!(tree.chapters[0].declared_number, None);
        assert_eq!(tree.chapters[0].content_units.len(), 2);
        assert_eq!(tree.diagnostics[0].kind, DiagnosticKind::NoHeadingsFound);
    }

    #[test]
    fn test_empty_volume() {
        let family = BookFamily::from_family_name("digha").unwrap();
        let (tree, state) = extract_volume(&family, &[], VolumeContinuationState::new(3)).unwrap();

        assert_eq!(tree.chapters.len(), 1);
        assert!(tree.chapters[0].content_units.is_empty());
        assert_eq!(state.last_assigned_number, 4);
    }

    #[test]
    fn test_division_sets_chapter_division() {
        let family = BookFamily::from_family_name("anguttara").unwrap();
        let tree = extract(&family, &[
            "1. Ekakanipāto",
            "1. Rūpādivaggo",
            "1. Nāhaṃ, bhikkhave, aññaṃ ekarūpampi samanupassāmi.",
            "2. Dukanipāto",
            "1. Kammakaraṇavaggo",
            "1. Dvemāni, bhikkhave, vajjāni.",
        ]);

        assert_eq!(tree.chapters.len(), 2);
        assert_eq!(tree.chapters[0].division.as_deref(), Some("Ekakanipāto"));
        assert_eq!(tree.chapters[1].division.as_deref(), Some("Dukanipāto"));
        assert_eq!(tree.chapters[1].id, "an.2");
        assert!(tree.diagnostics.is_empty());
    }

    #[test]
    fn test_division_preamble_kept_on_next_chapter() {
        let family = BookFamily::from_family_name("anguttara").unwrap();
        let tree = extract(&family, &[
            "1. Ekakanipāto",
            "Namo tassa bhagavato arahato sammāsambuddhassa",
            "1. Rūpādivaggo",
            "1. Nāhaṃ, bhikkhave, aññaṃ ekarūpampi samanupassāmi.",
        ]);

        assert_eq!(tree.chapters.len(), 1);
        assert_eq!(tree.chapters[0].title, "Rūpādivaggo");
        assert_eq!(tree.chapters[0].division_preamble, vec!["Namo tassa bhagavato arahato sammāsambuddhassa".to_string()]);
        assert_eq!(tree.diagnostics.len(), 1);
        assert_eq!(tree.diagnostics[0].kind, DiagnosticKind::OrphanBodyText);
        assert_eq!(tree.diagnostics[0].line_position, Some(1));
    }

    #[test]
    fn test_trailing_division_with_text_becomes_chapter() {
        let family = BookFamily::from_family_name("anguttara").unwrap();
        let tree = extract(&family, &[
            "1. Ekakanipāto",
            "1. Rūpādivaggo",
            "1. Nāhaṃ, bhikkhave, aññaṃ ekarūpampi samanupassāmi.",
            "2. Dukanipāto",
            "Dvemāni, bhikkhave, vajjāni.",
        ]);

        assert_eq!(tree.chapters.len(), 2);
        assert_eq!(tree.chapters[1].title, "Dukanipāto");
        assert_eq!(tree.chapters[1].id, "an.2");
        assert_eq!(tree.chapters[1].division, None);
        assert_eq!(tree.chapters[1].content_units[0].body_lines, vec!["Dvemāni, bhikkhave, vajjāni.".to_string()]);
    }

    #[test]
    fn test_misconfigured_family_is_fatal() {
        let family = BookFamily::from_family_name("majjhima").unwrap();
        let lines = SourceLine::from_lines(&["1. Mūlapariyāyavaggo", "1. Ekakanipāto", "1. Text."]);
        let result = extract_volume(&family, &lines, VolumeContinuationState::default());

        match result {
            Err(StructureError::MisconfiguredBookFamily { suffix, line_position, .. }) => {
                assert_eq!(suffix, "nipāto");
                assert_eq!(line_position, 1);
            }
            other => panic!("expected MisconfiguredBookFamily, got {:?}", other),
        }
    }

    #[test]
    fn test_ignored_suffix_is_not_misconfigured() {
        let mut family = BookFamily::from_family_name("majjhima").unwrap();
        family.ignored_suffixes = vec!["nipāto".to_string()];
        let tree = extract(&family, &["1. Mūlapariyāyavaggo", "1. Ekakanipāto", "2. Text."]);
        assert_eq!(tree.chapters.len(), 1);
    }

    #[test]
    fn test_invalid_family_rejected() {
        let family = BookFamily::default();
        assert!(matches!(StructureExtractor::new(&family), Err(StructureError::InvalidConfig { .. })));
    }
}
