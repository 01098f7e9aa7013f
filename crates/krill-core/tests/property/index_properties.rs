use krill_core::index::write_index;
use krill_core::{find, GenerateOptions, Generator, Level, LevelFilter};
use proptest::prelude::*;

fn level_strategy() -> impl Strategy<Value = Level> {
    prop::sample::select(Level::ALL.to_vec())
}

fn calls_strategy() -> impl Strategy<Value = Vec<(Level, String)>> {
    prop::collection::vec((level_strategy(), "[a-z][a-z0-9 ]{0,15}"), 0..30)
}

fn python_source(calls: &[(Level, String)]) -> String {
    calls
        .iter()
        .map(|(level, message)| format!("logger.{}(\"{}\")\n", level.as_str(), message))
        .collect()
}

proptest! {
    #[test]
    fn identifiers_count_up_without_gaps(
        calls in calls_strategy(),
        levels in prop::collection::vec(level_strategy(), 0..3),
    ) {
        let filter: LevelFilter = levels.into_iter().collect();
        let options = GenerateOptions::new("p").with_levels(filter);
        let allocation = Generator::default()
            .build_entries(&python_source(&calls), "K", &options)
            .unwrap();

        let admitted: Vec<&String> = calls
            .iter()
            .filter(|(level, _)| filter.admits(*level))
            .map(|(_, message)| message)
            .collect();
        prop_assert_eq!(allocation.entries.len(), admitted.len());
        prop_assert_eq!(allocation.filtered_out, calls.len() - admitted.len());
        for (i, (entry, message)) in allocation.entries.iter().zip(admitted).enumerate() {
            prop_assert_eq!(entry.identifier.as_str(), format!("p{:03}", i + 1));
            prop_assert_eq!(&entry.subkey, message);
        }
    }

    #[test]
    fn regeneration_is_byte_identical(calls in calls_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let source = python_source(&calls);
        let generator = Generator::default();
        let options = GenerateOptions::default();

        let mut outputs = Vec::new();
        for name in ["a.json", "b.json"] {
            let path = dir.path().join(name);
            let allocation = generator.build_entries(&source, "K", &options).unwrap();
            write_index(&path, "K", &allocation.entries).unwrap();
            outputs.push(std::fs::read(&path).unwrap());
        }
        prop_assert_eq!(&outputs[0], &outputs[1]);
    }

    #[test]
    fn every_entry_resolves(calls in calls_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let allocation = Generator::default()
            .build_entries(&python_source(&calls), "K", &GenerateOptions::default())
            .unwrap();
        write_index(&path, "K", &allocation.entries).unwrap();

        for entry in &allocation.entries {
            // Duplicate messages resolve to their last occurrence.
            let expected = allocation
                .entries
                .iter()
                .rev()
                .find(|e| e.subkey == entry.subkey)
                .map(|e| e.identifier.clone());
            let lookup = find(&path, "K", &entry.subkey).unwrap();
            prop_assert_eq!(lookup.into_identifier(), expected);
        }
    }
}
