use pitaka_structure::types::{SourceLine, VolumeContinuationState, VolumeTree};
use pitaka_structure::{extract_volume, BookFamily};

pub fn family(name: &str) -> BookFamily {
    BookFamily::builtin(name).unwrap()
}

#[allow(dead_code)]
pub fn extract_fresh(family: &BookFamily, lines: &[&str]) -> VolumeTree {
    let source = SourceLine::from_lines(lines);
    extract_volume(family, &source, VolumeContinuationState::default()).unwrap().0
}

#[allow(dead_code)]
pub fn chapter_titles(tree: &VolumeTree) -> Vec<&str> {
    tree.chapters.iter().map(|c| c.title.as_str()).collect()
}

#[allow(dead_code)]
pub fn unit_numbers(tree: &VolumeTree, chapter: usize) -> Vec<u32> {
    tree.chapters[chapter].content_units.iter().map(|u| u.number).collect()
}

/// First volume of a Saṃyutta-style work, with two saṃyuttas.
#[allow(dead_code)]
pub const SAMYUTTA_VOLUME_1: &[&str] = &[
    "Saṃyuttanikāyo",
    "Sagāthāvaggo",
    "1. Devatāsaṃyuttaṃ",
    "1. Naḷavaggo",
    "1. Oghataraṇasuttaṃ",
    "1. Evaṃ me sutaṃ – ekaṃ samayaṃ bhagavā sāvatthiyaṃ viharati.",
    "Atha kho aññatarā devatā abhikkantāya rattiyā.",
    "2. Nimokkhasuttaṃ",
    "2. Sāvatthinidānaṃ.",
    "2. Nandanavaggo",
    "11. Nandanasuttaṃ",
    "11. Evaṃ me sutaṃ.",
    "2. Devaputtasaṃyuttaṃ",
    "1. Paṭhamavaggo",
    "82. Paṭhamakassapasuttaṃ",
    "82. Sāvatthinidānaṃ.",
];

/// Second volume of the same work.
#[allow(dead_code)]
pub const SAMYUTTA_VOLUME_2: &[&str] = &[
    "Saṃyuttanikāyo",
    "Nidānavaggo",
    "12. Nidānasaṃyuttaṃ",
    "1. Buddhavaggo",
    "1. Paṭiccasamuppādasuttaṃ",
    "1. Evaṃ me sutaṃ.",
    "617-621. Rūpaanabhisamayādisuttapañcakaṃ",
    "617-621. Sāvatthinidānaṃ.",
];

#[allow(dead_code)]
pub const JATAKA_VOLUME: &[&str] = &[
    "Khuddakanikāye",
    "Jātakapāḷi",
    "(Paṭhamo bhāgo)",
    "1. Ekakanipāto",
    "1. Apaṇṇakavaggo",
    "1. Apaṇṇakajātakaṃ",
    "1. Apaṇṇakaṃ ṭhānameke, dutiyaṃ āhu takkikā;",
    "Etadaññāya medhāvī, taṃ gaṇhe yadapaṇṇakaṃ.",
    "2. Vaṇṇupathajātakaṃ",
    "2. Akilāsuno vaṇṇupathe khaṇantā, udaṅgaṇe tattha papaṃ avinduṃ;",
    "2. Sīlavaggo",
    "11. Lakkhaṇajātakaṃ",
    "11. Hoti sīlavataṃ attho, paṭisanthāravuttinaṃ.",
    "8. Aṭṭhakanipāto",
    "417. Kaccānijātakaṃ",
    "1. Odātavatthā suddhavasanā, allakesā kaccāni.",
];
