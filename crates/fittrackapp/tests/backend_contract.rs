use chrono::{Duration, NaiveDate};
use fittrackapp::model::{operation, today, BackendKind, HistoryEntry, ProfileSnapshot, SortField};
use fittrackapp::store::file::FileStore;
use fittrackapp::store::memory::MemStore;
use fittrackapp::store::sqlite::SqliteStore;
use fittrackapp::store::DataStore;
use tempfile::TempDir;

const KINDS: [BackendKind; 3] = [BackendKind::Memory, BackendKind::File, BackendKind::Relational];

/// A fresh, empty store of `kind`. The TempDir must outlive the store.
fn open(kind: BackendKind) -> (TempDir, Box<dyn DataStore>) {
    let dir = TempDir::new().unwrap();
    let store: Box<dyn DataStore> = match kind {
        BackendKind::Memory => Box::new(MemStore::new()),
        BackendKind::File => Box::new(FileStore::open(dir.path()).unwrap()),
        BackendKind::Relational => Box::new(SqliteStore::open(dir.path().join("fit.db")).unwrap()),
    };
    (dir, store)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn details(entries: &[HistoryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.details.as_str()).collect()
}

#[test]
fn test_saved_entry_is_listed_active() {
    for kind in KINDS {
        let (_dir, mut store) = open(kind);
        let saved = store
            .save_history_entry(operation::UNIT_CONVERSION, "5.00 mi = 8.05 km")
            .unwrap();

        let listed = store.list_history().unwrap();
        assert_eq!(listed, vec![saved.clone()], "{}", kind);
        assert!(listed[0].active, "{}", kind);
        assert_eq!(listed[0].date, today(), "{}", kind);
        assert!(saved.id > 0, "{}", kind);
    }
}

#[test]
fn test_deactivate_keeps_other_fields() {
    for kind in KINDS {
        let (_dir, mut store) = open(kind);
        let saved = store
            .save_history_entry_dated(date(2024, 3, 1), "custom", "with, comma")
            .unwrap();

        assert!(store.set_history_active(saved.id, false).unwrap(), "{}", kind);

        let stored = store.get_history_entry(saved.id).unwrap().unwrap();
        assert_eq!(stored, HistoryEntry { active: false, ..saved }, "{}", kind);
    }
}

#[test]
fn test_relational_ordering_scenario_on_every_backend() {
    for kind in KINDS {
        let (_dir, mut store) = open(kind);
        store
            .save_history_entry_dated(date(2024, 1, 1), operation::PROGRESS_CALCULATION, "a")
            .unwrap();
        store
            .save_history_entry_dated(date(2024, 2, 1), operation::UNIT_CONVERSION, "b")
            .unwrap();

        let listed = store.list_history().unwrap();
        assert_eq!(listed[0].operation_type, operation::UNIT_CONVERSION, "{}", kind);
        assert_eq!(listed[1].operation_type, operation::PROGRESS_CALCULATION, "{}", kind);
    }
}

#[test]
fn test_sort_by_date_is_stable() {
    for kind in KINDS {
        let (_dir, mut store) = open(kind);
        for (day, text) in [(5, "first"), (1, "second"), (5, "third"), (3, "fourth")] {
            store
                .save_history_entry_dated(date(2024, 4, day), "custom", text)
                .unwrap();
        }

        let asc = store.sort_history(SortField::Date, true).unwrap();
        assert!(asc.windows(2).all(|w| w[0].date <= w[1].date), "{}", kind);
        assert_eq!(details(&asc), vec!["second", "fourth", "first", "third"], "{}", kind);

        let desc = store.sort_history(SortField::Date, false).unwrap();
        assert_eq!(details(&desc), vec!["first", "third", "fourth", "second"], "{}", kind);
    }
}

#[test]
fn test_sort_strings_ignore_case() {
    for kind in KINDS {
        let (_dir, mut store) = open(kind);
        for op in ["beta", "Alpha", "alpha", "Gamma"] {
            store.save_history_entry_dated(date(2024, 1, 1), op, op).unwrap();
        }

        let asc = store.sort_history(SortField::OperationType, true).unwrap();
        assert_eq!(details(&asc), vec!["Alpha", "alpha", "beta", "Gamma"], "{}", kind);

        let desc = store.sort_history(SortField::Details, false).unwrap();
        assert_eq!(details(&desc), vec!["Gamma", "beta", "Alpha", "alpha"], "{}", kind);
    }
}

#[test]
fn test_search_matches_type_or_details_ignoring_case() {
    for kind in KINDS {
        let (_dir, mut store) = open(kind);
        store
            .save_history_entry_dated(date(2024, 1, 1), operation::PROGRESS_CALCULATION, "lose 0.50 kg/week")
            .unwrap();
        store
            .save_history_entry_dated(date(2024, 1, 2), operation::UNIT_CONVERSION, "1.00 mi = 1.61 KM")
            .unwrap();
        store
            .save_history_entry_dated(date(2024, 1, 3), operation::OVERTRAINING_CHECK, "Optimal load!")
            .unwrap();

        assert_eq!(details(&store.search_history("PROGRESS").unwrap()), vec!["lose 0.50 kg/week"], "{}", kind);
        assert_eq!(details(&store.search_history("km").unwrap()), vec!["1.00 mi = 1.61 KM"], "{}", kind);
        assert_eq!(store.search_history("").unwrap().len(), 3, "{}", kind);
        assert!(store.search_history("marathon").unwrap().is_empty(), "{}", kind);
    }
}

#[test]
fn test_filter_is_exact() {
    for kind in KINDS {
        let (_dir, mut store) = open(kind);
        store
            .save_history_entry(operation::PROGRESS_CALCULATION, "match")
            .unwrap();
        store.save_history_entry(operation::UNIT_CONVERSION, "other").unwrap();
        store.save_history_entry("Progress Calculation", "case").unwrap();

        let filtered = store
            .filter_history_by_type(operation::PROGRESS_CALCULATION)
            .unwrap();
        assert_eq!(details(&filtered), vec!["match"], "{}", kind);
    }
}

#[test]
fn test_update_and_delete_by_id() {
    for kind in KINDS {
        let (_dir, mut store) = open(kind);
        let first = store.save_history_entry("custom", "one").unwrap();
        let second = store.save_history_entry("custom", "two").unwrap();

        let edit = HistoryEntry::new(0, date(2023, 1, 1), "renamed", "line one\nline two");
        assert!(store.update_history_entry(first.id, &edit).unwrap(), "{}", kind);
        let stored = store.get_history_entry(first.id).unwrap().unwrap();
        assert_eq!(stored.id, first.id, "{}", kind);
        assert_eq!(stored.details, "line one\nline two", "{}", kind);

        assert!(store.delete_history_entry(second.id).unwrap(), "{}", kind);
        assert!(!store.delete_history_entry(second.id).unwrap(), "{}", kind);
        assert!(store.get_history_entry(second.id).unwrap().is_none(), "{}", kind);

        let third = store.save_history_entry("custom", "three").unwrap();
        assert!(third.id > second.id, "{}", kind);
    }
}

#[test]
fn test_unknown_ids_are_reported_not_raised() {
    for kind in KINDS {
        let (_dir, mut store) = open(kind);
        let entry = HistoryEntry::new(0, today(), "custom", "x");
        assert!(store.get_history_entry(42).unwrap().is_none(), "{}", kind);
        assert!(!store.update_history_entry(42, &entry).unwrap(), "{}", kind);
        assert!(!store.delete_history_entry(42).unwrap(), "{}", kind);
        assert!(!store.set_history_active(42, true).unwrap(), "{}", kind);
    }
}

#[test]
fn test_current_profile_round_trip() {
    for kind in KINDS {
        let (_dir, mut store) = open(kind);
        let profile = ProfileSnapshot::new(80.0, 75.0, today() + Duration::days(30), 3, 45);

        assert_eq!(store.get_profile(0).unwrap(), None, "{}", kind);
        store.save_profile(&profile).unwrap();
        assert_eq!(store.get_profile(0).unwrap(), Some(profile.clone()), "{}", kind);

        let moved = ProfileSnapshot {
            current_weight: 78.4,
            ..profile
        };
        assert!(store.update_profile(0, &moved).unwrap(), "{}", kind);
        assert_eq!(store.get_profile(0).unwrap(), Some(moved), "{}", kind);

        assert!(store.delete_profile(0).unwrap(), "{}", kind);
        assert_eq!(store.get_profile(0).unwrap(), None, "{}", kind);
    }
}

#[test]
fn test_invalid_input_is_rejected_everywhere() {
    for kind in KINDS {
        let (_dir, mut store) = open(kind);
        assert!(store.save_history_entry("a,b", "x").is_err(), "{}", kind);
        assert!(store.save_history_entry(" ", "x").is_err(), "{}", kind);
        let bad = ProfileSnapshot::new(-1.0, 75.0, today(), 3, 45);
        assert!(store.save_profile(&bad).is_err(), "{}", kind);
        assert!(store.list_history().unwrap().is_empty(), "{}", kind);
        assert_eq!(store.get_profile(0).unwrap(), None, "{}", kind);
    }
}

#[test]
fn test_file_store_round_trip_across_instances() {
    let dir = TempDir::new().unwrap();
    let written: Vec<HistoryEntry> = {
        let mut store = FileStore::open(dir.path()).unwrap();
        (1..=5)
            .map(|i| {
                store
                    .save_history_entry_dated(
                        date(2024, 5, i),
                        operation::UNIT_CONVERSION,
                        &format!("{}.00 mi, rounded\\ok", i),
                    )
                    .unwrap()
            })
            .collect()
    };

    let reopened = FileStore::open(dir.path()).unwrap();
    let mut read = reopened.list_history().unwrap();
    read.reverse();
    assert_eq!(read, written);
}
