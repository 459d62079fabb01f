use regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    // 12. Mahāsīhanādasuttaṃ
    static ref RE_NUMBERED_LINE: Regex = Regex::new(r"^([0-9]+)\.\s+(\S.*)$").unwrap();
    // 617-621. Rūpaanabhisamayādisuttapañcakaṃ
    static ref RE_RANGED_LINE: Regex = Regex::new(r"^([0-9]+)\s*[-–]\s*([0-9]+)\.\s+(\S.*)$").unwrap();
    static ref RE_MANY_SPACES: Regex = Regex::new(r"\s{2,}").unwrap();
}

/// Characters that mark a line as running prose rather than a title.
pub const SENTENCE_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '–', '—', '"', '“', '”'];

pub fn consistent_niggahita(text: &str) -> String {
    // Use only ṁ when comparing.
    //
    // CST4 and SuttaCentral use ṁ,
    // PTS books and most printed editions use ṃ,
    // some older fonts render it as ŋ.
    text.replace('ṃ', "ṁ").replace('ŋ', "ṁ")
}

/// Fold text for suffix and name comparison: lowercase, then consistent niggahita.
pub fn fold_for_match(text: &str) -> String {
    consistent_niggahita(&text.to_lowercase())
}

/// Fold every entry of a suffix table, dropping empty ones.
pub fn fold_suffixes(suffixes: &[String]) -> Vec<String> {
    suffixes.iter()
        .map(|s| fold_for_match(s.trim()))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Return the first suffix from `folded_suffixes` that `folded_name` ends with.
pub fn matching_suffix<'a>(folded_name: &str, folded_suffixes: &'a [String]) -> Option<&'a str> {
    folded_suffixes.iter()
        .find(|suffix| folded_name.ends_with(suffix.as_str()))
        .map(|suffix| suffix.as_str())
}

/// A line opening with a number or an inclusive number range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine<'a> {
    pub number: u32,
    /// Canonical "a-b" text, only for range-numbered lines
    pub range: Option<String>,
    /// Text after the number, trimmed
    pub rest: &'a str,
}

/// Parse "12. Text" or "617-621. Text".
///
/// A range whose lower bound exceeds its upper bound is not a valid range,
/// and the line is treated as unnumbered.
pub fn parse_numbered_line(text: &str) -> Option<NumberedLine<'_>> {
    let text = text.trim();

    if let Some(caps) = RE_NUMBERED_LINE.captures(text) {
        let number: u32 = caps.get(1)?.as_str().parse().ok()?;
        let rest = caps.get(2)?.as_str().trim();
        return Some(NumberedLine { number, range: None, rest });
    }

    if let Some(caps) = RE_RANGED_LINE.captures(text) {
        let low: u32 = caps.get(1)?.as_str().parse().ok()?;
        let high: u32 = caps.get(2)?.as_str().parse().ok()?;
        if low > high {
            return None;
        }
        let rest = caps.get(3)?.as_str().trim();
        return Some(NumberedLine { number: low, range: Some(format!("{}-{}", low, high)), rest });
    }

    None
}

pub fn is_pure_digits(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

pub fn has_sentence_punctuation(text: &str) -> bool {
    text.contains(SENTENCE_PUNCTUATION)
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Trim and collapse runs of whitespace left over from page-text extraction.
pub fn compact_line(text: &str) -> String {
    RE_MANY_SPACES.replace_all(text.trim(), " ").to_string()
}
