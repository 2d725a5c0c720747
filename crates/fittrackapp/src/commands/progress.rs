use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::fitness;
use crate::model::{operation, ProfileSnapshot};
use crate::store::DataStore;
use chrono::NaiveDate;

/// Compute the pace towards the goal, store the snapshot and log the result.
///
/// Nothing is written if the snapshot or the target date is invalid.
pub fn run<S: DataStore + ?Sized>(
    store: &mut S,
    snapshot: &ProfileSnapshot,
    today: NaiveDate,
) -> Result<CmdResult> {
    let text = fitness::progress(snapshot, today)?;

    store.save_profile(snapshot)?;
    let entry = store.save_history_entry_dated(today, operation::PROGRESS_CALCULATION, &text)?;

    let mut result = CmdResult::default()
        .with_entries(vec![entry])
        .with_profile(Some(snapshot.clone()));
    result.add_message(CmdMessage::success(text));
    Ok(result)
}
