//! Book family definitions and normalization
//!
//! A book family is the declarative rule set that tells the engine how one
//! text family marks its hierarchy: which heading suffixes belong to which
//! level, whether chapters carry a nested vagga layer, how units are numbered
//! and which lines are page boilerplate.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::helpers::fold_for_match;
use crate::types::{HierarchyLevel, Result, StructureError};

/// Keys of the built-in book families, in canonical order.
pub const BUILTIN_FAMILIES: [&str; 6] = ["digha", "majjhima", "samyutta", "anguttara", "jataka", "khuddaka"];

/// Heading suffixes any family may use. A numbered line ending in one of these
/// must be declared by the active family, otherwise the family is misconfigured.
pub const KNOWN_STRUCTURAL_SUFFIXES: [&str; 9] = [
    "suttaṃ",
    "vaggo",
    "nipāto",
    "saṃyuttaṃ",
    "vatthu",
    "jātakaṃ",
    "suttapañcakaṃ",
    "suttadasakaṃ",
    "peyyālo",
];

/// Thresholds for recognizing unnumbered titles by their formatting.
///
/// The defaults are the values that worked for the observed volumes and are
/// expected to be tuned per family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleHeuristic {
    pub enabled: bool,
    /// Lines this long or longer are never titles
    pub max_chars: usize,
    pub max_words: usize,
    /// Title endings accepted in place of bold formatting
    pub suffixes: Vec<String>,
    /// Small words that mark ordinary prose
    pub function_words: Vec<String>,
    pub max_function_words: usize,
    /// A line at least this much larger than body text counts as emphasized
    pub min_relative_size: f32,
}

impl Default for TitleHeuristic {
    fn default() -> Self {
        TitleHeuristic {
            enabled: false,
            max_chars: 100,
            max_words: 6,
            suffixes: vec![
                "vatthu".to_string(),
                "kathā".to_string(),
            ],
            function_words: [
                "ca", "vā", "pana", "hi", "kho", "pi", "api", "ti", "iti", "evaṃ",
                "tena", "so", "sā", "taṃ", "me", "yo", "yaṃ", "na", "atha", "tato",
            ].iter().map(|w| w.to_string()).collect(),
            max_function_words: 1,
            min_relative_size: 1.2,
        }
    }
}

/// Declarative rules for one book family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookFamily {
    /// Normalized family key (e.g. "samyutta")
    pub name: String,
    /// Prefix of every chapter id (e.g. "sn")
    pub id_prefix: String,
    /// Title used when a book has no detectable chapter headings
    pub default_title: String,
    pub chapter_suffixes: Vec<String>,
    pub subgroup_suffixes: Vec<String>,
    /// Chapters contain a nested vagga layer
    pub has_subgroup_layer: bool,
    /// Suffixes marking content-unit titles (e.g. "suttaṃ")
    pub content_title_suffixes: Vec<String>,
    /// Headings that group chapters without being chapters (e.g. "nipāto")
    pub division_suffixes: Vec<String>,
    /// Divisions numbered above this have no vaggas and are chapters themselves
    pub nipata_cutoff: Option<u32>,
    pub renumber_per_chapter: bool,
    /// Known heading suffixes this family reads as ordinary text
    pub ignored_suffixes: Vec<String>,
    /// Regex patterns for running headers, page footers and credit lines
    pub boilerplate_patterns: Vec<String>,
    pub title_heuristic: TitleHeuristic,
}

impl Default for BookFamily {
    fn default() -> Self {
        BookFamily {
            name: String::new(),
            id_prefix: String::new(),
            default_title: String::new(),
            chapter_suffixes: Vec::new(),
            subgroup_suffixes: Vec::new(),
            has_subgroup_layer: false,
            content_title_suffixes: Vec::new(),
            division_suffixes: Vec::new(),
            nipata_cutoff: None,
            renumber_per_chapter: false,
            ignored_suffixes: Vec::new(),
            boilerplate_patterns: default_boilerplate_patterns(),
            title_heuristic: TitleHeuristic::default(),
        }
    }
}

/// Page furniture found in the Chaṭṭha Saṅgāyana PDF volumes.
pub fn default_boilerplate_patterns() -> Vec<String> {
    vec![
        r"(?i)^page\s+\d+(\s+of\s+\d+)?$".to_string(),
        r"^[-–—]\s*\d+\s*[-–—]$".to_string(),
        r"(?i)www\.tipitaka\.org".to_string(),
        r"(?i)vipassana research institute".to_string(),
        r"(?i)^chaṭṭha\s+saṅgāyana\s+tipiṭaka".to_string(),
    ]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl BookFamily {
    /// Normalize a collection name from various Pāli forms to a family key
    ///
    /// Handles "o" and "e" endings and niggahita variants:
    /// - "Dīghanikāyo" or "Dīghanikāye" → Some("digha")
    /// - "Saṃyuttanikāyo" or "Saṁyuttanikāye" → Some("samyutta")
    /// - "Jātakapāḷi" → Some("jataka"), checked before "khuddaka"
    ///   because Jātaka volumes also name the Khuddakanikāya
    pub fn normalize_name(name: &str) -> Option<String> {
        let normalized = fold_for_match(name.trim());

        if normalized.contains("jātaka") || normalized.contains("jataka") {
            Some("jataka".to_string())
        } else if normalized.contains("dīgha") || normalized.contains("digha") {
            Some("digha".to_string())
        } else if normalized.contains("majjhima") {
            Some("majjhima".to_string())
        } else if normalized.contains("saṁyutta") || normalized.contains("samyutta") {
            Some("samyutta".to_string())
        } else if normalized.contains("aṅguttara") || normalized.contains("anguttara") {
            Some("anguttara".to_string())
        } else if normalized.contains("khuddaka") {
            Some("khuddaka".to_string())
        } else {
            None
        }
    }

    /// Get the built-in configuration for a normalized family key
    ///
    /// - digha: chapter = sutta, content = numbered paragraph, vaggo divides
    /// - majjhima: chapter = vagga, sutta titles carried to their first paragraph
    /// - samyutta: chapter = saṃyutta, with a nested vagga layer
    /// - anguttara: chapter = vagga, nipāto divides
    /// - jataka: chapter = vagga, or the nipāta itself past the seventh nipāta
    /// - khuddaka: chapter = vagga, unnumbered vatthu/kathā titles
    pub fn from_family_name(name: &str) -> Option<BookFamily> {
        match name {
            "digha" => Some(BookFamily {
                name: "digha".to_string(),
                id_prefix: "dn".to_string(),
                default_title: "Dīghanikāyo".to_string(),
                chapter_suffixes: strings(&["suttaṃ"]),
                division_suffixes: strings(&["vaggo"]),
                ..Default::default()
            }),
            "majjhima" => Some(BookFamily {
                name: "majjhima".to_string(),
                id_prefix: "mn".to_string(),
                default_title: "Majjhimanikāyo".to_string(),
                chapter_suffixes: strings(&["vaggo"]),
                content_title_suffixes: strings(&["suttaṃ"]),
                ..Default::default()
            }),
            "samyutta" => Some(BookFamily {
                name: "samyutta".to_string(),
                id_prefix: "sn".to_string(),
                default_title: "Saṃyuttanikāyo".to_string(),
                chapter_suffixes: strings(&["saṃyuttaṃ"]),
                subgroup_suffixes: strings(&["vaggo"]),
                has_subgroup_layer: true,
                content_title_suffixes: strings(&["suttaṃ", "suttapañcakaṃ", "suttadasakaṃ", "peyyālo"]),
                ..Default::default()
            }),
            "anguttara" => Some(BookFamily {
                name: "anguttara".to_string(),
                id_prefix: "an".to_string(),
                default_title: "Aṅguttaranikāyo".to_string(),
                chapter_suffixes: strings(&["vaggo"]),
                content_title_suffixes: strings(&["suttaṃ", "peyyālo"]),
                division_suffixes: strings(&["nipāto"]),
                ..Default::default()
            }),
            "jataka" => Some(BookFamily {
                name: "jataka".to_string(),
                id_prefix: "ja".to_string(),
                default_title: "Jātakapāḷi".to_string(),
                chapter_suffixes: strings(&["vaggo"]),
                content_title_suffixes: strings(&["jātakaṃ"]),
                division_suffixes: strings(&["nipāto"]),
                nipata_cutoff: Some(7),
                ..Default::default()
            }),
            "khuddaka" => Some(BookFamily {
                name: "khuddaka".to_string(),
                id_prefix: "kn".to_string(),
                default_title: "Khuddakanikāyo".to_string(),
                chapter_suffixes: strings(&["vaggo"]),
                content_title_suffixes: strings(&["vatthu", "suttaṃ"]),
                title_heuristic: TitleHeuristic {
                    enabled: true,
                    ..Default::default()
                },
                ..Default::default()
            }),
            _ => None,
        }
    }

    /// Look up a built-in family, accepting either a key or a Pāli collection name.
    pub fn builtin(name: &str) -> Result<BookFamily> {
        let key = if BUILTIN_FAMILIES.contains(&name) {
            Some(name.to_string())
        } else {
            BookFamily::normalize_name(name)
        };

        key.and_then(|k| BookFamily::from_family_name(&k))
            .ok_or_else(|| StructureError::UnknownFamily(name.to_string()))
    }

    pub fn all_builtin() -> Vec<BookFamily> {
        BUILTIN_FAMILIES.iter()
            .filter_map(|name| BookFamily::from_family_name(name))
            .collect()
    }

    /// Load a custom family from a JSON file. Missing fields take their defaults.
    pub fn load_from_json(path: &Path) -> Result<BookFamily> {
        let content = fs::read_to_string(path)?;
        let family: BookFamily = serde_json::from_str(&content)?;
        family.validate()?;
        Ok(family)
    }

    /// Set the id prefix for this family
    pub fn with_id_prefix(mut self, prefix: &str) -> Self {
        self.id_prefix = prefix.to_string();
        self
    }

    pub fn suffix_table(&self, level: HierarchyLevel) -> &[String] {
        match level {
            HierarchyLevel::ChapterUnit => &self.chapter_suffixes,
            HierarchyLevel::SubGroup => &self.subgroup_suffixes,
            HierarchyLevel::ContentUnit => &self.content_title_suffixes,
        }
    }

    /// Levels expected inside a chapter slice.
    pub fn content_levels(&self) -> Vec<HierarchyLevel> {
        if self.has_subgroup_layer {
            vec![HierarchyLevel::SubGroup, HierarchyLevel::ContentUnit]
        } else {
            vec![HierarchyLevel::ContentUnit]
        }
    }

    /// Every suffix this family declares, in any table.
    pub fn declared_suffixes(&self) -> Vec<String> {
        let mut all = Vec::new();
        all.extend(self.chapter_suffixes.iter().cloned());
        all.extend(self.subgroup_suffixes.iter().cloned());
        all.extend(self.content_title_suffixes.iter().cloned());
        all.extend(self.division_suffixes.iter().cloned());
        all.extend(self.ignored_suffixes.iter().cloned());
        if self.title_heuristic.enabled {
            all.extend(self.title_heuristic.suffixes.iter().cloned());
        }
        all
    }

    /// Check the family is usable before any line is read.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| StructureError::InvalidConfig {
            family: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if self.id_prefix.trim().is_empty() {
            return Err(invalid("id_prefix is empty"));
        }
        if self.has_subgroup_layer && self.subgroup_suffixes.iter().all(|s| s.trim().is_empty()) {
            return Err(invalid("has_subgroup_layer is set but subgroup_suffixes is empty"));
        }
        if self.nipata_cutoff.is_some() && self.division_suffixes.is_empty() {
            return Err(invalid("nipata_cutoff is set but division_suffixes is empty"));
        }
        if self.title_heuristic.enabled && self.title_heuristic.max_words == 0 {
            return Err(invalid("title_heuristic.max_words must be at least 1"));
        }
        for pattern in &self.boilerplate_patterns {
            Regex::new(pattern)?;
        }

        Ok(())
    }
}
