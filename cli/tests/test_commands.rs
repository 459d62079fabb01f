//! Tests for family selection and the state file of the `extract` command

use std::fs;
use std::path::{Path, PathBuf};

use pitaka_structure::export::read_continuation_state;
use pitaka_structure_cli::{extract, resolve_family, ExtractOptions};

const SAMYUTTA_VOLUME_1: &[&str] = &[
    "Saṃyuttanikāyo",
    "1. Devatāsaṃyuttaṃ",
    "1. Naḷavaggo",
    "1. Oghataraṇasuttaṃ",
    "1. Evaṃ me sutaṃ.",
    "2. Devaputtasaṃyuttaṃ",
    "1. Paṭhamavaggo",
    "82. Paṭhamakassapasuttaṃ",
    "82. Sāvatthinidānaṃ.",
];

const SAMYUTTA_VOLUME_2: &[&str] = &[
    "Saṃyuttanikāyo",
    "Nidānavaggo",
    "12. Nidānasaṃyuttaṃ",
    "1. Buddhavaggo",
    "1. Paṭiccasamuppādasuttaṃ",
    "1. Evaṃ me sutaṃ.",
];

const THERA_FAMILY: &str = r#"{
    "name": "theragatha",
    "id_prefix": "thag",
    "default_title": "Theragāthāpāḷi",
    "chapter_suffixes": ["nipāto"],
    "content_title_suffixes": ["vaggo"]
}"#;

fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

#[test]
fn test_config_wins_over_family_name() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("thera.json");
    fs::write(&config, THERA_FAMILY).unwrap();
    let volume = write_lines(dir.path(), "s0301m.txt", SAMYUTTA_VOLUME_1);

    let family = resolve_family(Some("majjhima"), Some(&config), Some(&volume)).unwrap();
    assert_eq!(family.name, "theragatha");
}

#[test]
fn test_family_name_wins_over_detection() {
    let dir = tempfile::tempdir().unwrap();
    let volume = write_lines(dir.path(), "s0301m.txt", SAMYUTTA_VOLUME_1);

    let family = resolve_family(Some("majjhima"), None, Some(&volume)).unwrap();
    assert_eq!(family.name, "majjhima");
}

#[test]
fn test_family_detected_from_first_volume() {
    let dir = tempfile::tempdir().unwrap();
    let volume = write_lines(dir.path(), "s0301m.txt", SAMYUTTA_VOLUME_1);

    let family = resolve_family(None, None, Some(&volume)).unwrap();
    assert_eq!(family.name, "samyutta");
}

#[test]
fn test_no_family_source_is_an_error() {
    assert!(resolve_family(None, None, None).is_err());
    assert!(resolve_family(Some("vinaya"), None, None).is_err());
}

#[test]
fn test_state_file_carries_numbering_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let state_file = dir.path().join("sn.state.json");
    let output = dir.path().join("out").join("sn.json");

    let work = extract(ExtractOptions {
        state_file: Some(state_file.clone()),
        output: Some(output.clone()),
        volumes: vec![write_lines(dir.path(), "vol1.txt", SAMYUTTA_VOLUME_1)],
        ..Default::default()
    }).unwrap();
    assert_eq!(work.volumes[0].chapters[1].id, "sn.2");
    assert!(output.exists());
    assert_eq!(read_continuation_state(&state_file).unwrap().last_assigned_number, 2);

    let work = extract(ExtractOptions {
        state_file: Some(state_file.clone()),
        output: Some(output.clone()),
        volumes: vec![write_lines(dir.path(), "vol2.txt", SAMYUTTA_VOLUME_2)],
        ..Default::default()
    }).unwrap();
    assert_eq!(work.volumes[0].chapters[0].id, "sn.3");
    assert_eq!(read_continuation_state(&state_file).unwrap().last_assigned_number, 3);
}

#[test]
fn test_continue_from_overrides_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let state_file = dir.path().join("sn.state.json");
    fs::write(&state_file, r#"{"last_assigned_number": 2}"#).unwrap();

    let work = extract(ExtractOptions {
        continue_from: Some(10),
        state_file: Some(state_file.clone()),
        output_dir: Some(dir.path().join("json")),
        volumes: vec![write_lines(dir.path(), "vol2.txt", SAMYUTTA_VOLUME_2)],
        ..Default::default()
    }).unwrap();

    assert_eq!(work.volumes[0].chapters[0].id, "sn.11");
    assert!(dir.path().join("json").join("sn.json").exists());
    assert_eq!(read_continuation_state(&state_file).unwrap().last_assigned_number, 11);
}

#[test]
fn test_continuation_overflow_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let result = extract(ExtractOptions {
        continue_from: Some(u32::MAX),
        output: Some(dir.path().join("sn.json")),
        volumes: vec![write_lines(dir.path(), "vol2.txt", SAMYUTTA_VOLUME_2)],
        ..Default::default()
    });
    assert!(result.is_err());
}
