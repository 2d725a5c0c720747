use crate::commands::{entry_not_found, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{EntryId, HistoryEntry, SortField};
use crate::store::DataStore;
use chrono::NaiveDate;

fn listing(entries: Vec<HistoryEntry>) -> CmdResult {
    let mut result = CmdResult::default();
    if entries.is_empty() {
        result.add_message(CmdMessage::info("No history entries"));
    }
    result.with_entries(entries)
}

pub fn list<S: DataStore + ?Sized>(store: &S) -> Result<CmdResult> {
    Ok(listing(store.list_history()?))
}

pub fn search<S: DataStore + ?Sized>(store: &S, term: &str) -> Result<CmdResult> {
    Ok(listing(store.search_history(term)?))
}

pub fn sort<S: DataStore + ?Sized>(store: &S, field: SortField, ascending: bool) -> Result<CmdResult> {
    Ok(listing(store.sort_history(field, ascending)?))
}

pub fn filter<S: DataStore + ?Sized>(store: &S, operation_type: &str) -> Result<CmdResult> {
    Ok(listing(store.filter_history_by_type(operation_type)?))
}

pub fn show<S: DataStore + ?Sized>(store: &S, id: EntryId) -> Result<CmdResult> {
    let entry = store.get_history_entry(id)?.ok_or_else(|| entry_not_found(id))?;
    Ok(CmdResult::default().with_entries(vec![entry]))
}

/// Fields to change on an entry. `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct EntryEdit {
    pub date: Option<NaiveDate>,
    pub operation_type: Option<String>,
    pub details: Option<String>,
    pub active: Option<bool>,
}

impl EntryEdit {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.operation_type.is_none()
            && self.details.is_none()
            && self.active.is_none()
    }
}

pub fn edit<S: DataStore + ?Sized>(store: &mut S, id: EntryId, changes: EntryEdit) -> Result<CmdResult> {
    let mut entry = store.get_history_entry(id)?.ok_or_else(|| entry_not_found(id))?;
    if changes.is_empty() {
        let mut result = CmdResult::default().with_entries(vec![entry]);
        result.add_message(CmdMessage::warning("Nothing to change"));
        return Ok(result);
    }

    if let Some(date) = changes.date {
        entry.date = date;
    }
    if let Some(operation_type) = changes.operation_type {
        entry.operation_type = operation_type;
    }
    if let Some(details) = changes.details {
        entry.details = details;
    }
    if let Some(active) = changes.active {
        entry.active = active;
    }

    if !store.update_history_entry(id, &entry)? {
        return Err(entry_not_found(id));
    }
    let mut result = CmdResult::default().with_entries(vec![entry]);
    result.add_message(CmdMessage::success(format!("History entry {} updated", id)));
    Ok(result)
}

pub fn delete<S: DataStore + ?Sized>(store: &mut S, id: EntryId) -> Result<CmdResult> {
    if !store.delete_history_entry(id)? {
        return Err(entry_not_found(id));
    }
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("History entry {} deleted", id)));
    Ok(result)
}

pub fn set_active<S: DataStore + ?Sized>(store: &mut S, id: EntryId, active: bool) -> Result<CmdResult> {
    if !store.set_history_active(id, active)? {
        return Err(entry_not_found(id));
    }
    let entry = store.get_history_entry(id)?.ok_or_else(|| entry_not_found(id))?;
    let mut result = CmdResult::default().with_entries(vec![entry]);
    result.add_message(CmdMessage::success(format!(
        "History entry {} {}",
        id,
        if active { "activated" } else { "deactivated" }
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FitError;
    use crate::model::operation;
    use crate::store::memory::fixtures::StoreFixture;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn list_reports_empty_history() {
        let store = StoreFixture::new().store;
        let result = list(&store).unwrap();
        assert!(result.entries.is_empty());
        assert_eq!(result.messages[0].content, "No history entries");
    }

    #[test]
    fn filter_returns_exact_type_only() {
        let store = StoreFixture::new()
            .with_entry_on(date(2024, 1, 1), operation::PROGRESS_CALCULATION, "a")
            .with_entry_on(date(2024, 1, 2), operation::UNIT_CONVERSION, "b")
            .store;

        let result = filter(&store, operation::PROGRESS_CALCULATION).unwrap();
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].details, "a");
    }

    #[test]
    fn search_and_sort_delegate_to_store() {
        let store = StoreFixture::new()
            .with_entry_on(date(2024, 1, 3), "custom", "Beta")
            .with_entry_on(date(2024, 1, 1), "custom", "alpha")
            .store;

        assert_eq!(search(&store, "ALPHA").unwrap().entries.len(), 1);
        let sorted = sort(&store, SortField::Details, true).unwrap();
        assert_eq!(sorted.entries[0].details, "alpha");
    }

    #[test]
    fn missing_ids_are_not_found() {
        let mut store = StoreFixture::new().with_entries(1).store;

        assert!(matches!(show(&store, 9), Err(FitError::NotFound(_))));
        assert!(matches!(delete(&mut store, 9), Err(FitError::NotFound(_))));
        assert!(matches!(
            set_active(&mut store, 9, false),
            Err(FitError::NotFound(_))
        ));
        assert!(matches!(
            edit(&mut store, 9, EntryEdit::default()),
            Err(FitError::NotFound(_))
        ));
    }

    #[test]
    fn edit_changes_only_given_fields() {
        let mut store = StoreFixture::new().with_entries(1).store;
        let before = store.get_history_entry(1).unwrap().unwrap();

        let changes = EntryEdit {
            details: Some("corrected".to_string()),
            ..Default::default()
        };
        edit(&mut store, 1, changes).unwrap();

        let after = store.get_history_entry(1).unwrap().unwrap();
        assert_eq!(after.details, "corrected");
        assert_eq!(after.date, before.date);
        assert_eq!(after.operation_type, before.operation_type);
        assert!(after.active);
    }

    #[test]
    fn edit_rejects_bad_operation_type() {
        let mut store = StoreFixture::new().with_entries(1).store;
        let changes = EntryEdit {
            operation_type: Some("a,b".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            edit(&mut store, 1, changes),
            Err(FitError::Validation(_))
        ));
    }

    #[test]
    fn deactivate_keeps_other_fields() {
        let mut store = StoreFixture::new().with_entries(2).store;
        let before = store.get_history_entry(2).unwrap().unwrap();

        let result = set_active(&mut store, 2, false).unwrap();

        let after = &result.entries[0];
        assert!(!after.active);
        assert_eq!(after.details, before.details);
        assert!(store.get_history_entry(1).unwrap().unwrap().active);
    }

    #[test]
    fn delete_removes_entry() {
        let mut store = StoreFixture::new().with_entries(2).store;
        delete(&mut store, 1).unwrap();
        assert!(store.get_history_entry(1).unwrap().is_none());
        assert_eq!(store.list_history().unwrap().len(), 1);
    }
}
