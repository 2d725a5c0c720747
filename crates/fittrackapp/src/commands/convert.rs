use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::fitness;
use crate::model::operation;
use crate::store::DataStore;
use chrono::NaiveDate;

pub fn run<S: DataStore + ?Sized>(store: &mut S, miles: f64, today: NaiveDate) -> Result<CmdResult> {
    let text = fitness::miles_to_km(miles)?;
    let entry = store.save_history_entry_dated(today, operation::UNIT_CONVERSION, &text)?;

    let mut result = CmdResult::default().with_entries(vec![entry]);
    result.add_message(CmdMessage::success(text));
    Ok(result)
}
