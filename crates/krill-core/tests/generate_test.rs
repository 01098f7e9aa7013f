//! End-to-end tests: generate an index from Python source, then resolve.

mod common;

use std::sync::Arc;

use krill_core::errors::{ConfigError, ExtractionError, GenerateError, SerializationError};
use krill_core::{
    find, generate, EnvMarkedScheme, EnvPlacement, GenerateOptions, Generator, Index,
    KrillConfig, LevelFilter, Level, Lookup, Miss,
};

use common::{python_fixture, tempdir, write_source};

const NO_FILTER: &[&str] = &[];

#[test]
fn test_five_levels_without_filter() {
    let dir = tempdir();
    let output = dir.path().join("index.json");

    let summary = generate(
        python_fixture("five_levels.py"),
        "API_ROOT_ID",
        &output,
        "",
        NO_FILTER,
        false,
    )
    .unwrap();
    assert_eq!(summary.entries.len(), 5);
    assert_eq!(summary.filtered_out, 0);

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "{\n  \"API_ROOT_ID\": {\n    \"info msg\": \"001\",\n    \"debug msg\": \"002\",\n    \
         \"warning msg\": \"003\",\n    \"error msg\": \"004\",\n    \"critical msg\": \"005\"\n  }\n}\n"
    );

    let lookup = find(&output, "API_ROOT_ID", "critical msg").unwrap();
    assert_eq!(lookup.identifier().unwrap(), "005");
}

#[test]
fn test_level_filter_keeps_source_order() {
    let dir = tempdir();
    let output = dir.path().join("index.json");

    let summary = generate(
        python_fixture("five_levels.py"),
        "API_ROOT_ID",
        &output,
        "",
        &["info", "debug"],
        false,
    )
    .unwrap();
    assert_eq!(summary.filtered_out, 3);

    let index = Index::from_json_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let root = index.root("API_ROOT_ID").unwrap();
    let pairs: Vec<(&str, &str)> = root.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(pairs, vec![("info msg", "001"), ("debug msg", "002")]);
}

#[test]
fn test_level_names_are_case_insensitive() {
    let dir = tempdir();
    let output = dir.path().join("index.json");
    generate(python_fixture("five_levels.py"), "K", &output, "", &["CRITICAL"], false).unwrap();
    assert_eq!(find(&output, "K", "critical msg").unwrap().identifier().unwrap(), "001");
}

#[test]
fn test_unknown_level_name_is_rejected_before_writing() {
    let dir = tempdir();
    let output = dir.path().join("index.json");
    let err = generate(python_fixture("five_levels.py"), "K", &output, "", &["verbose"], false)
        .unwrap_err();
    assert!(matches!(err, GenerateError::Config(ConfigError::InvalidValue { .. })));
    assert!(!output.exists());
}

#[test]
fn test_prefix_is_prepended() {
    let dir = tempdir();
    let output = dir.path().join("index.json");
    generate(python_fixture("five_levels.py"), "K", &output, "app_", NO_FILTER, false).unwrap();
    assert_eq!(find(&output, "K", "warning msg").unwrap().identifier().unwrap(), "app_003");
}

#[test]
fn test_every_message_round_trips() {
    let dir = tempdir();
    let output = dir.path().join("index.json");
    let summary = generate(python_fixture("mixed.py"), "MIXED", &output, "m", NO_FILTER, false)
        .unwrap();

    let subkeys: Vec<&str> = summary.entries.iter().map(|e| e.subkey.as_str()).collect();
    assert_eq!(
        subkeys,
        vec![
            "starting job",
            "f\"job failed: {exc}\"",
            "worker stopped",
            "run finished",
            "helper called",
            "name",
        ]
    );
    for entry in &summary.entries {
        let lookup = find(&output, "MIXED", &entry.subkey).unwrap();
        assert_eq!(lookup, Lookup::Found(entry.identifier.clone()));
    }
}

#[test]
fn test_unicode_messages() {
    let dir = tempdir();
    let output = dir.path().join("index.json");
    generate(python_fixture("unicode.py"), "API_ROOT", &output, "", NO_FILTER, false).unwrap();
    assert_eq!(find(&output, "API_ROOT", "ログテスト").unwrap().identifier().unwrap(), "001");
    assert_eq!(
        find(&output, "API_ROOT", "クリティカルメッセージ").unwrap().identifier().unwrap(),
        "005"
    );
}

#[test]
fn test_regeneration_is_byte_identical() {
    let dir = tempdir();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    for output in [&first, &second] {
        generate(python_fixture("mixed.py"), "A", output, "x", NO_FILTER, false).unwrap();
        generate(python_fixture("five_levels.py"), "B", output, "y", NO_FILTER, false).unwrap();
    }
    // Regenerating into an existing index changes nothing either.
    generate(python_fixture("mixed.py"), "A", &first, "x", NO_FILTER, false).unwrap();

    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn test_other_root_keys_survive_regeneration() {
    let dir = tempdir();
    let output = dir.path().join("index.json");
    generate(python_fixture("five_levels.py"), "A", &output, "", NO_FILTER, false).unwrap();
    generate(python_fixture("declared_root.py"), "B", &output, "", NO_FILTER, false).unwrap();
    generate(python_fixture("five_levels.py"), "A", &output, "", &["error"], false).unwrap();

    assert_eq!(find(&output, "B", "empty request").unwrap().identifier().unwrap(), "002");
    assert_eq!(find(&output, "A", "error msg").unwrap().identifier().unwrap(), "001");
    // Stale subkeys of the regenerated root are kept.
    assert_eq!(find(&output, "A", "info msg").unwrap().identifier().unwrap(), "001");
}

#[test]
fn test_missing_output_directory_is_created() {
    let dir = tempdir();
    let output = dir.path().join("build").join("ids").join("index.json");
    generate(python_fixture("five_levels.py"), "K", &output, "", NO_FILTER, false).unwrap();
    assert!(output.exists());
}

#[test]
fn test_extraction_failure_leaves_index_untouched() {
    let dir = tempdir();
    let output = dir.path().join("index.json");
    generate(python_fixture("five_levels.py"), "K", &output, "", NO_FILTER, false).unwrap();
    let before = std::fs::read(&output).unwrap();

    let err = generate(python_fixture("unbalanced.py"), "K", &output, "", NO_FILTER, false)
        .unwrap_err();
    assert!(matches!(err, GenerateError::Extraction(ExtractionError::UnbalancedCall { .. })));
    assert_eq!(std::fs::read(&output).unwrap(), before);
}

#[test]
fn test_missing_source_file() {
    let dir = tempdir();
    let err = generate(
        dir.path().join("absent.py"),
        "K",
        dir.path().join("index.json"),
        "",
        NO_FILTER,
        false,
    )
    .unwrap_err();
    assert!(matches!(err, GenerateError::Extraction(ExtractionError::Unreadable { .. })));
}

#[test]
fn test_corrupt_index_is_not_overwritten() {
    let dir = tempdir();
    let output = dir.path().join("index.json");
    std::fs::write(&output, "[\"not\", \"an\", \"index\"]").unwrap();
    let err = generate(python_fixture("five_levels.py"), "K", &output, "", NO_FILTER, false)
        .unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Serialization(SerializationError::CorruptIndex { .. })
    ));
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "[\"not\", \"an\", \"index\"]"
    );
}

#[test]
fn test_declared_root_key() {
    let dir = tempdir();
    let output = dir.path().join("index.json");
    let generator = Generator::default();
    let summary = generator
        .generate_declared(
            &python_fixture("declared_root.py"),
            &output,
            &GenerateOptions::default(),
        )
        .unwrap();
    assert_eq!(summary.root_key, "API_ROOT_ID_2");
    assert_eq!(
        find(&output, "API_ROOT_ID_2", "request handled").unwrap().identifier().unwrap(),
        "003"
    );
}

#[test]
fn test_declared_root_key_missing() {
    let dir = tempdir();
    let output = dir.path().join("index.json");
    let err = Generator::default()
        .generate_declared(&python_fixture("five_levels.py"), &output, &GenerateOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Extraction(ExtractionError::MissingRootKey { ref variable })
            if variable == "CKRILL_API_KEY"
    ));
    assert!(!output.exists());
}

#[test]
fn test_configured_root_key_variable() {
    let dir = tempdir();
    let source = write_source(&dir, "svc.py", "LOG_ROOT = 'SVC'\nlog.info('up')\n");
    let output = dir.path().join("index.json");
    let mut config = KrillConfig::default();
    config.extract.root_key_variable = Some("LOG_ROOT".into());

    Generator::new(config)
        .generate_declared(&source, &output, &GenerateOptions::default())
        .unwrap();
    assert_eq!(find(&output, "SVC", "up").unwrap().identifier().unwrap(), "001");
}

#[test]
fn test_env_scheme_must_be_configured() {
    let dir = tempdir();
    let output = dir.path().join("index.json");
    let options = GenerateOptions::new("p").with_env_identifier(true);
    let err = Generator::default()
        .generate(&python_fixture("five_levels.py"), "K", &output, &options)
        .unwrap_err();
    assert!(matches!(err, GenerateError::Config(ConfigError::MissingValue { .. })));
    assert!(!output.exists());
}

#[test]
fn test_injected_env_scheme() {
    let dir = tempdir();
    let output = dir.path().join("index.json");
    let scheme = EnvMarkedScheme::new("stg", EnvPlacement::Suffix, "_");
    let options = GenerateOptions::new("svc")
        .with_levels([Level::Error, Level::Critical].into_iter().collect::<LevelFilter>())
        .with_env_identifier(true);

    Generator::default()
        .with_env_scheme(Arc::new(scheme))
        .generate(&python_fixture("five_levels.py"), "K", &output, &options)
        .unwrap();

    assert_eq!(find(&output, "K", "error msg").unwrap().identifier().unwrap(), "svc001_stg");
    assert_eq!(find(&output, "K", "critical msg").unwrap().identifier().unwrap(), "svc002_stg");
    assert_eq!(find(&output, "K", "info msg").unwrap(), Lookup::NotFound(Miss::UnknownSubkey));
}

#[test]
fn test_duplicate_message_last_wins() {
    let dir = tempdir();
    let source = write_source(
        &dir,
        "dup.py",
        "logger.info('same')\nlogger.error('other')\nlogger.debug('same')\n",
    );
    let output = dir.path().join("index.json");
    let summary = generate(&source, "K", &output, "", NO_FILTER, false).unwrap();
    assert_eq!(summary.entries.len(), 3);
    assert_eq!(find(&output, "K", "same").unwrap().identifier().unwrap(), "003");
    assert_eq!(find(&output, "K", "other").unwrap().identifier().unwrap(), "002");
}

#[test]
fn test_file_without_log_calls_creates_empty_root() {
    let dir = tempdir();
    let source = write_source(&dir, "quiet.py", "def f():\n    return 1\n");
    let output = dir.path().join("index.json");
    let summary = generate(&source, "QUIET", &output, "", NO_FILTER, false).unwrap();
    assert!(summary.entries.is_empty());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "{\n  \"QUIET\": {}\n}\n");
}

#[test]
fn test_unclosed_non_logging_call_fails_generation() {
    let dir = tempdir();
    let source = write_source(
        &dir,
        "broken.py",
        "logger.info('first')\nfoo(\nlogger.debug('second')\nlogger.error('third')\n",
    );
    let output = dir.path().join("index.json");
    let err = generate(&source, "K", &output, "", NO_FILTER, false).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Extraction(ExtractionError::UnbalancedCall { ref method, .. }) if method == "foo"
    ));
    assert!(!output.exists());
}

#[test]
fn test_chained_calls_are_numbered_in_source_order() {
    let dir = tempdir();
    let source = write_source(
        &dir,
        "chained.py",
        "logger.info('first').warning('second')\nlogger.error('third')\n",
    );
    let output = dir.path().join("index.json");
    generate(&source, "K", &output, "", NO_FILTER, false).unwrap();
    for (message, id) in [("first", "001"), ("second", "002"), ("third", "003")] {
        assert_eq!(find(&output, "K", message).unwrap().identifier().unwrap(), id);
    }
}
