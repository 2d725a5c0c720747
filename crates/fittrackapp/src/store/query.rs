//! In-memory query algorithms shared by the memory and file backends.
//!
//! Every function takes the entries in insertion order and returns a new vector;
//! nothing here mutates the caller's data. The SQLite backend expresses the same
//! rules in SQL (see `sqlite.rs`), and the contract tests hold all three to it.

use crate::model::{HistoryEntry, SortField};
use std::cmp::Ordering;

/// Newest date first; entries sharing a date keep their insertion order.
pub fn newest_first(mut entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    // sort_by is stable
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

/// Case-insensitive substring match on operation type or details.
pub fn search(entries: Vec<HistoryEntry>, term: &str) -> Vec<HistoryEntry> {
    if term.is_empty() {
        return newest_first(entries);
    }
    let needle = term.to_lowercase();
    let matched = entries
        .into_iter()
        .filter(|e| {
            e.operation_type.to_lowercase().contains(&needle)
                || e.details.to_lowercase().contains(&needle)
        })
        .collect();
    newest_first(matched)
}

/// Exact, case-sensitive operation type match.
pub fn filter_by_type(entries: Vec<HistoryEntry>, operation_type: &str) -> Vec<HistoryEntry> {
    let matched = entries
        .into_iter()
        .filter(|e| e.operation_type == operation_type)
        .collect();
    newest_first(matched)
}

/// Stable sort by `field`. Equal keys keep their insertion order in both directions.
pub fn sort(mut entries: Vec<HistoryEntry>, field: SortField, ascending: bool) -> Vec<HistoryEntry> {
    if ascending {
        entries.sort_by(|a, b| compare(a, b, field));
    } else {
        entries.sort_by(|a, b| compare(b, a, field));
    }
    entries
}

/// Orders two entries by a single field.
pub fn compare(a: &HistoryEntry, b: &HistoryEntry, field: SortField) -> Ordering {
    match field {
        SortField::Date => a.date.cmp(&b.date),
        SortField::OperationType => caseless_cmp(&a.operation_type, &b.operation_type),
        SortField::Details => caseless_cmp(&a.details, &b.details),
    }
}

fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(id: i64, day: u32, op: &str, details: &str) -> HistoryEntry {
        HistoryEntry::new(
            id,
            NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            op,
            details,
        )
    }

    fn ids(entries: &[HistoryEntry]) -> Vec<i64> {
        entries.iter().map(|e| e.id).collect()
    }

    fn sample() -> Vec<HistoryEntry> {
        vec![
            entry(1, 2, "unit conversion", "5.00 mi = 8.05 km"),
            entry(2, 1, "Progress Calculation", "lose 0.50 kg/week"),
            entry(3, 2, "overtraining check", "Optimal load"),
            entry(4, 3, "progress calculation", "lose 1.20 kg/week"),
        ]
    }

    #[test]
    fn test_newest_first_keeps_insertion_order_on_ties() {
        let listed = newest_first(sample());
        assert_eq!(ids(&listed), vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_both_fields() {
        assert_eq!(ids(&search(sample(), "PROGRESS")), vec![4, 2]);
        assert_eq!(ids(&search(sample(), "km")), vec![1]);
        assert_eq!(ids(&search(sample(), "optimal")), vec![3]);
        assert!(search(sample(), "marathon").is_empty());
    }

    #[test]
    fn test_search_handles_non_ascii_case() {
        let entries = vec![entry(1, 1, "конвертация", "Оптимальная нагрузка")];
        assert_eq!(ids(&search(entries, "ОПТИМАЛЬНАЯ")), vec![1]);
    }

    #[test]
    fn test_empty_search_returns_everything() {
        assert_eq!(search(sample(), "").len(), 4);
    }

    #[test]
    fn test_filter_is_exact_and_case_sensitive() {
        assert_eq!(ids(&filter_by_type(sample(), "progress calculation")), vec![4]);
        assert_eq!(ids(&filter_by_type(sample(), "Progress Calculation")), vec![2]);
        assert!(filter_by_type(sample(), "progress").is_empty());
    }

    #[test]
    fn test_sort_by_date_is_stable_in_both_directions() {
        assert_eq!(ids(&sort(sample(), SortField::Date, true)), vec![2, 1, 3, 4]);
        assert_eq!(ids(&sort(sample(), SortField::Date, false)), vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_sort_strings_ignore_case() {
        let asc = sort(sample(), SortField::OperationType, true);
        assert_eq!(ids(&asc), vec![3, 2, 4, 1]);

        let desc = sort(sample(), SortField::OperationType, false);
        assert_eq!(ids(&desc), vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_sort_by_details() {
        let asc = sort(sample(), SortField::Details, true);
        assert_eq!(ids(&asc), vec![1, 2, 4, 3]);
    }
}
