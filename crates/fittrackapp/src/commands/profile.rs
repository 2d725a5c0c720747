use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FitError, Result};
use crate::model::CURRENT_PROFILE;
use crate::store::DataStore;

pub fn show<S: DataStore + ?Sized>(store: &S) -> Result<CmdResult> {
    let profile = store
        .get_profile(CURRENT_PROFILE)?
        .ok_or_else(|| FitError::NotFound("no profile saved yet".to_string()))?;
    Ok(CmdResult::default().with_profile(Some(profile)))
}

pub fn delete<S: DataStore + ?Sized>(store: &mut S) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if store.delete_profile(CURRENT_PROFILE)? {
        result.add_message(CmdMessage::success("Profile deleted"));
    } else {
        result.add_message(CmdMessage::warning("No profile to delete"));
    }
    Ok(result)
}
