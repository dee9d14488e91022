use std::path::PathBuf;

use converse::config::{ConversationConfig, DEFAULT_LOCALE};
use converse::test_utils::{TableCase, run_table_tests};
use converse::ConverseError;

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn config_from_fixture_files() -> Result<(), String> {
    let cases = vec![
        TableCase {
            name: "full",
            input: "tests/fixtures/configs/converse.toml",
            expected: (
                "amzn1.ask.skill.fixture".to_string(),
                "en-GB".to_string(),
                true,
                0.85f64,
                true,
            ),
        },
        TableCase {
            name: "minimal",
            input: "tests/fixtures/configs/minimal.toml",
            expected: (
                "amzn1.ask.skill.minimal".to_string(),
                DEFAULT_LOCALE.to_string(),
                false,
                0.93f64,
                false,
            ),
        },
    ];

    run_table_tests(cases, |relative_path| {
        let raw = std::fs::read_to_string(fixture_path(relative_path)).expect("read fixture");
        let config = ConversationConfig::from_toml(&raw).expect("parse config");
        (
            config.app_id,
            config.locale,
            config.fix_spaces,
            config.fuzzy_threshold,
            config.context_override.is_some(),
        )
    })
}

#[test]
fn load_prefers_explicit_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("converse.toml"), "app_id = \"from-project\"\n").expect("write");
    let explicit = dir.path().join("explicit.toml");
    std::fs::write(&explicit, "app_id = \"from-explicit\"\nlocale = \"fr-FR\"\n").expect("write");

    let config = ConversationConfig::load(Some(&explicit), dir.path()).expect("load");
    assert_eq!(config.app_id, "from-explicit");
    assert_eq!(config.locale, "fr-FR");
}

#[test]
fn load_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.toml");
    let err = ConversationConfig::load(Some(&missing), dir.path()).unwrap_err();
    assert!(matches!(err, ConverseError::MissingConfig(_)));
}

#[test]
fn load_rejects_malformed_toml() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "app_id = [unterminated").expect("write");
    let err = ConversationConfig::load(Some(&path), dir.path()).unwrap_err();
    assert!(matches!(err, ConverseError::Config(_)));
}

#[test]
fn load_unreadable_config_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ConversationConfig::load(Some(dir.path()), dir.path()).unwrap_err();
    assert!(matches!(err, ConverseError::Io(_)));
}
