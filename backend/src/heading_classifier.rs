//! Heading classification
//!
//! Decides for a single line whether it is a structural heading at one of
//! the expected hierarchy levels, in order of precedence:
//!
//! 1. numbered heading whose name ends in a level suffix ("1. Naḷavaggo")
//! 2. range-numbered content title ("617-621. …suttapañcakaṃ")
//! 3. unnumbered title recognized by formatting (bold, size, short, no prose)
//!
//! Anything else is body text.

use std::ops::Range;

use crate::book_family::BookFamily;
use crate::helpers::{
    fold_for_match, fold_suffixes, has_sentence_punctuation, matching_suffix,
    parse_numbered_line, word_count,
};
use crate::types::{Diagnostic, HeadingCandidate, HeadingKind, HierarchyLevel, RawLine};

/// Classifier for one book family, with its suffix tables folded for matching.
pub struct HeadingClassifier<'a> {
    family: &'a BookFamily,
    chapter_suffixes: Vec<String>,
    subgroup_suffixes: Vec<String>,
    content_title_suffixes: Vec<String>,
    division_suffixes: Vec<String>,
    heuristic_suffixes: Vec<String>,
    function_words: Vec<String>,
}

/// Chapter scan state: a nipāta numbered past the cutoff has no vaggas.
#[derive(Debug, Clone, Copy, Default)]
struct ChapterScanState {
    is_nipata_chapter: bool,
}

impl<'a> HeadingClassifier<'a> {
    pub fn new(family: &'a BookFamily) -> Self {
        HeadingClassifier {
            family,
            chapter_suffixes: fold_suffixes(&family.chapter_suffixes),
            subgroup_suffixes: fold_suffixes(&family.subgroup_suffixes),
            content_title_suffixes: fold_suffixes(&family.content_title_suffixes),
            division_suffixes: fold_suffixes(&family.division_suffixes),
            heuristic_suffixes: fold_suffixes(&family.title_heuristic.suffixes),
            function_words: fold_suffixes(&family.title_heuristic.function_words),
        }
    }

    pub fn family(&self) -> &BookFamily {
        self.family
    }

    /// Classify a line against the expected levels.
    ///
    /// Ties between levels are resolved by precedence, outermost level first.
    pub fn classify(&self, line: &RawLine, expected_levels: &[HierarchyLevel]) -> Option<HeadingCandidate> {
        self.classify_in_scan(line, expected_levels, ChapterScanState::default(), None)
    }

    /// Like `classify`, but reports lines matching more than one active level.
    pub fn classify_reporting(
        &self,
        line: &RawLine,
        expected_levels: &[HierarchyLevel],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<HeadingCandidate> {
        self.classify_in_scan(line, expected_levels, ChapterScanState::default(), Some(diagnostics))
    }

    /// Locate all headings of `level` inside `range`, in one left-to-right scan.
    ///
    /// Lines are classified against `level` and every active level inside it,
    /// so a line matching several of them is reported as ambiguous when it
    /// becomes a heading here. Title-only candidates are never boundaries and
    /// are left out. During the
    /// chapter scan a division numbered past the family's nipāta cutoff
    /// becomes a chapter and switches off the other chapter suffixes.
    pub fn locate_headings(
        &self,
        lines: &[RawLine],
        range: Range<usize>,
        level: HierarchyLevel,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<HeadingCandidate> {
        let mut state = ChapterScanState::default();
        let mut headings = Vec::new();
        let mut line_diagnostics = Vec::new();
        let expected = self.levels_from(level);
        let end = range.end.min(lines.len());

        for line in &lines[range.start.min(end)..end] {
            line_diagnostics.clear();
            let candidate = match self.classify_in_scan(line, &expected, state, Some(&mut line_diagnostics)) {
                Some(c) if c.level == level && !c.is_title_only() => c,
                _ => continue,
            };
            diagnostics.append(&mut line_diagnostics);

            if level == HierarchyLevel::ChapterUnit
                && self.family.nipata_cutoff.is_some()
                && candidate.kind == HeadingKind::Boundary
                && self.is_division_name(&candidate.bare_name)
                && !state.is_nipata_chapter
            {
                tracing::debug!("Nipāta chapters begin at line {}: {}", candidate.line_position, candidate.bare_name);
                state.is_nipata_chapter = true;
            }

            headings.push(candidate);
        }

        tracing::debug!("Located {} {} headings in lines {:?}", headings.len(), level.as_str(), range);
        headings
    }

    /// True if a numbered name ends in a chapter or division suffix.
    pub fn has_chapter_suffix(&self, name: &str) -> bool {
        let folded = fold_for_match(name);
        matching_suffix(&folded, &self.chapter_suffixes).is_some()
            || matching_suffix(&folded, &self.division_suffixes).is_some()
    }

    pub fn is_division_name(&self, name: &str) -> bool {
        matching_suffix(&fold_for_match(name), &self.division_suffixes).is_some()
    }

    /// Active levels of this family from `level` inwards.
    fn levels_from(&self, level: HierarchyLevel) -> Vec<HierarchyLevel> {
        let mut active = vec![HierarchyLevel::ChapterUnit];
        active.extend(self.family.content_levels());
        active.into_iter().skip_while(|l| *l != level).collect()
    }

    fn classify_in_scan(
        &self,
        line: &RawLine,
        expected_levels: &[HierarchyLevel],
        state: ChapterScanState,
        diagnostics: Option<&mut Vec<Diagnostic>>,
    ) -> Option<HeadingCandidate> {
        if let Some(numbered) = parse_numbered_line(&line.text) {
            let folded = fold_for_match(numbered.rest);

            if numbered.range.is_none() {
                // Suffix-keyed numbered heading
                let matches = self.matching_levels(&folded, numbered.number, expected_levels, state);
                let (level, kind) = *matches.first()?;

                if matches.len() > 1 {
                    if let Some(diagnostics) = diagnostics {
                        let levels: Vec<&str> = matches.iter().map(|(l, _)| l.as_str()).collect();
                        diagnostics.push(Diagnostic::structural_ambiguity(
                            line.position,
                            format!("'{}' matches levels {:?}, classified as {}", line.text, levels, level.as_str()),
                        ));
                    }
                }

                return Some(HeadingCandidate {
                    level,
                    kind,
                    declared_number: Some(numbered.number),
                    number_range: None,
                    bare_name: numbered.rest.to_string(),
                    line_position: line.position,
                });
            }

            // Range-numbered content title
            if expected_levels.contains(&HierarchyLevel::ContentUnit)
                && matching_suffix(&folded, &self.content_title_suffixes).is_some()
            {
                return Some(HeadingCandidate {
                    level: HierarchyLevel::ContentUnit,
                    kind: HeadingKind::TitleOnly,
                    declared_number: Some(numbered.number),
                    number_range: numbered.range.clone(),
                    bare_name: numbered.rest.to_string(),
                    line_position: line.position,
                });
            }

            return None;
        }

        // Formatting heuristic, only for unnumbered lines
        if expected_levels.contains(&HierarchyLevel::ContentUnit) && self.looks_like_title(line) {
            return Some(HeadingCandidate {
                level: HierarchyLevel::ContentUnit,
                kind: HeadingKind::TitleOnly,
                declared_number: None,
                number_range: None,
                bare_name: line.text.trim().to_string(),
                line_position: line.position,
            });
        }

        None
    }

    /// Levels whose suffix table matches, in precedence order.
    fn matching_levels(
        &self,
        folded_name: &str,
        number: u32,
        expected_levels: &[HierarchyLevel],
        state: ChapterScanState,
    ) -> Vec<(HierarchyLevel, HeadingKind)> {
        let mut matches = Vec::new();

        for level in HierarchyLevel::ALL.iter().filter(|l| expected_levels.contains(l)) {
            let kind = match level {
                HierarchyLevel::ChapterUnit => self.chapter_match(folded_name, number, state),
                HierarchyLevel::SubGroup => matching_suffix(folded_name, &self.subgroup_suffixes)
                    .map(|_| HeadingKind::Boundary),
                // A numbered content title is carried to the unit it names
                HierarchyLevel::ContentUnit => matching_suffix(folded_name, &self.content_title_suffixes)
                    .map(|_| HeadingKind::TitleOnly),
            };

            if let Some(kind) = kind {
                matches.push((*level, kind));
            }
        }

        matches
    }

    fn chapter_match(&self, folded_name: &str, number: u32, state: ChapterScanState) -> Option<HeadingKind> {
        if matching_suffix(folded_name, &self.division_suffixes).is_some() {
            return match self.family.nipata_cutoff {
                Some(cutoff) if number > cutoff => Some(HeadingKind::Boundary),
                _ => Some(HeadingKind::Division),
            };
        }
        if state.is_nipata_chapter {
            return None;
        }
        matching_suffix(folded_name, &self.chapter_suffixes).map(|_| HeadingKind::Boundary)
    }

    fn looks_like_title(&self, line: &RawLine) -> bool {
        let heuristic = &self.family.title_heuristic;
        if !heuristic.enabled {
            return false;
        }

        let text = line.text.trim();
        let words = word_count(text);

        if text.is_empty()
            || text.chars().count() >= heuristic.max_chars
            || has_sentence_punctuation(text)
            || words > heuristic.max_words
        {
            return false;
        }

        let folded = fold_for_match(text);
        let large = line.relative_size
            .map(|size| size >= heuristic.min_relative_size)
            .unwrap_or(false);
        let marked = line.is_emphasized
            || large
            || matching_suffix(&folded, &self.heuristic_suffixes).is_some();
        if !marked {
            return false;
        }

        let function_words = folded.split_whitespace()
            .filter(|word| self.function_words.iter().any(|fw| fw == word))
            .count();

        function_words <= heuristic.max_function_words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAPTER: &[HierarchyLevel] = &[HierarchyLevel::ChapterUnit];
    const CONTENT: &[HierarchyLevel] = &[HierarchyLevel::ContentUnit];

    fn family(name: &str) -> BookFamily {
        BookFamily::from_family_name(name).unwrap()
    }

    #[test]
    fn test_numbered_chapter_heading() {
        let family = family("samyutta");
        let classifier = HeadingClassifier::new(&family);
        let line = RawLine::new(4, "1. Devatāsaṃyuttaṃ");

        let candidate = classifier.classify(&line, CHAPTER).unwrap();
        assert_eq!(candidate.level, HierarchyLevel::ChapterUnit);
        assert_eq!(candidate.kind, HeadingKind::Boundary);
        assert_eq!(candidate.declared_number, Some(1));
        assert_eq!(candidate.bare_name, "Devatāsaṃyuttaṃ");
        assert_eq!(candidate.line_position, 4);
    }

    #[test]
    fn test_niggahita_variant_matches_suffix() {
        let family = family("samyutta");
        let classifier = HeadingClassifier::new(&family);
        let candidate = classifier.classify(&RawLine::new(0, "2. Devaputtasaṁyuttaṁ"), CHAPTER).unwrap();
        assert_eq!(candidate.bare_name, "Devaputtasaṁyuttaṁ");
    }

    #[test]
    fn test_level_not_expected_is_not_heading() {
        let family = family("samyutta");
        let classifier = HeadingClassifier::new(&family);
        let line = RawLine::new(0, "1. Naḷavaggo");

        assert!(classifier.classify(&line, CHAPTER).is_none());
        let candidate = classifier.classify(&line, &[HierarchyLevel::SubGroup]).unwrap();
        assert_eq!(candidate.level, HierarchyLevel::SubGroup);
    }

    #[test]
    fn test_numbered_body_text_is_not_heading() {
        let family = family("majjhima");
        let classifier = HeadingClassifier::new(&family);
        let line = RawLine::new(0, "1. Evaṃ me sutaṃ – ekaṃ samayaṃ bhagavā ukkaṭṭhāyaṃ viharati.");
        assert!(classifier.classify(&line, &HierarchyLevel::ALL).is_none());
    }

    #[test]
    fn test_numbered_content_title_is_title_only() {
        let family = family("majjhima");
        let classifier = HeadingClassifier::new(&family);
        let candidate = classifier.classify(&RawLine::new(3, "1. Mūlapariyāyasuttaṃ"), CONTENT).unwrap();
        assert_eq!(candidate.level, HierarchyLevel::ContentUnit);
        assert!(candidate.is_title_only());
        assert_eq!(candidate.declared_number, Some(1));
    }

    #[test]
    fn test_range_numbered_title() {
        let family = family("samyutta");
        let classifier = HeadingClassifier::new(&family);
        let line = RawLine::new(0, "617-621. Rūpaanabhisamayādisuttapañcakaṃ");

        let candidate = classifier.classify(&line, CONTENT).unwrap();
        assert_eq!(candidate.declared_number, Some(617));
        assert_eq!(candidate.number_range.as_deref(), Some("617-621"));
        assert_eq!(candidate.bare_name, "Rūpaanabhisamayādisuttapañcakaṃ");

        let body = RawLine::new(1, "617-621. Some shared content.");
        assert!(classifier.classify(&body, CONTENT).is_none());
    }

    #[test]
    fn test_title_heuristic_suffix() {
        let family = family("khuddaka");
        let classifier = HeadingClassifier::new(&family);

        let candidate = classifier.classify(&RawLine::new(0, "Somevatthu"), CONTENT).unwrap();
        assert!(candidate.is_title_only());
        assert_eq!(candidate.declared_number, None);

        // Prose, punctuation and unmarked short lines are body text
        assert!(classifier.classify(&RawLine::new(1, "Evaṃ me sutaṃ."), CONTENT).is_none());
        assert!(classifier.classify(&RawLine::new(2, "Atha kho bhagavā"), CONTENT).is_none());
    }

    #[test]
    fn test_title_heuristic_formatting_hints() {
        let family = family("khuddaka");
        let classifier = HeadingClassifier::new(&family);

        let bold = RawLine::new(0, "Cakkhupālattheravatthu").emphasized();
        assert!(classifier.classify(&bold, CONTENT).is_some());

        let large = RawLine::new(0, "Yamakavaggavaṇṇanā").with_relative_size(1.5);
        assert!(classifier.classify(&large, CONTENT).is_some());

        let small = RawLine::new(0, "Yamakavaggavaṇṇanā").with_relative_size(1.0);
        assert!(classifier.classify(&small, CONTENT).is_none());

        let prose = RawLine::new(0, "so ca kho pana bhikkhu").emphasized();
        assert!(classifier.classify(&prose, CONTENT).is_none());
    }

    #[test]
    fn test_title_heuristic_disabled() {
        let family = family("majjhima");
        let classifier = HeadingClassifier::new(&family);
        let bold = RawLine::new(0, "Somevatthu").emphasized();
        assert!(classifier.classify(&bold, CONTENT).is_none());
    }

    #[test]
    fn test_division_and_nipata_cutoff() {
        let family = family("jataka");
        let classifier = HeadingClassifier::new(&family);

        let early = classifier.classify(&RawLine::new(0, "1. Ekakanipāto"), CHAPTER).unwrap();
        assert_eq!(early.kind, HeadingKind::Division);

        let late = classifier.classify(&RawLine::new(0, "8. Aṭṭhakanipāto"), CHAPTER).unwrap();
        assert_eq!(late.kind, HeadingKind::Boundary);
    }

    #[test]
    fn test_locate_headings_deactivates_vaggo_after_nipata_chapter() {
        let family = family("jataka");
        let classifier = HeadingClassifier::new(&family);
        let lines = RawLine::from_lines(&[
            "1. Ekakanipāto",
            "1. Apaṇṇakavaggo",
            "1. Apaṇṇakajātakaṃ",
            "1. Apaṇṇakaṃ ṭhānameke, dutiyaṃ āhu takkikā.",
            "8. Aṭṭhakanipāto",
            "1. Kaccānivaggo",
            "9. Navakanipāto",
        ]);
        let mut diagnostics = Vec::new();
        let headings = classifier.locate_headings(&lines, 0..lines.len(), HierarchyLevel::ChapterUnit, &mut diagnostics);

        let positions: Vec<usize> = headings.iter().map(|h| h.line_position).collect();
        assert_eq!(positions, vec![0, 1, 4, 6]);
        assert_eq!(headings[0].kind, HeadingKind::Division);
        assert_eq!(headings[1].kind, HeadingKind::Boundary);
        assert_eq!(headings[2].kind, HeadingKind::Boundary);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_ambiguous_heading_reported() {
        let family = BookFamily {
            name: "overlap".to_string(),
            id_prefix: "ov".to_string(),
            chapter_suffixes: vec!["vaggo".to_string()],
            subgroup_suffixes: vec!["vaggo".to_string()],
            has_subgroup_layer: true,
            ..Default::default()
        };
        let classifier = HeadingClassifier::new(&family);
        let mut diagnostics = Vec::new();
        let line = RawLine::new(7, "1. Naḷavaggo");

        let candidate = classifier
            .classify_reporting(&line, &[HierarchyLevel::ChapterUnit, HierarchyLevel::SubGroup], &mut diagnostics)
            .unwrap();
        assert_eq!(candidate.level, HierarchyLevel::ChapterUnit);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, crate::types::DiagnosticKind::StructuralAmbiguity);
        assert_eq!(diagnostics[0].line_position, Some(7));
    }

    #[test]
    fn test_locate_headings_reports_ambiguous_boundary() {
        let family = BookFamily {
            name: "overlap".to_string(),
            id_prefix: "ov".to_string(),
            chapter_suffixes: vec!["vaggo".to_string()],
            content_title_suffixes: vec!["vaggo".to_string()],
            ..Default::default()
        };
        let classifier = HeadingClassifier::new(&family);
        let lines = RawLine::from_lines(&["1. Naḷavaggo", "1. Evaṃ me sutaṃ."]);
        let mut diagnostics = Vec::new();

        let headings = classifier.locate_headings(&lines, 0..2, HierarchyLevel::ChapterUnit, &mut diagnostics);
        assert_eq!(headings.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, crate::types::DiagnosticKind::StructuralAmbiguity);
    }

    #[test]
    fn test_has_chapter_suffix() {
        let family = family("anguttara");
        let classifier = HeadingClassifier::new(&family);
        assert!(classifier.has_chapter_suffix("Rūpādivaggo"));
        assert!(classifier.has_chapter_suffix("Dukanipāto"));
        assert!(!classifier.has_chapter_suffix("Evaṃ me sutaṃ"));
    }
}
