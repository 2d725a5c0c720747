use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::BackendKind;
use crate::store::selector::BackendSelector;

/// Switch the active backend and return its reloaded history.
pub fn select(selector: &mut BackendSelector, kind: BackendKind) -> Result<CmdResult> {
    let switch = selector.select(kind)?;

    let mut result = CmdResult::default();
    if switch.changed() {
        result.add_message(CmdMessage::success(format!(
            "Switched storage from {} to {}",
            switch.from, switch.to
        )));
    } else {
        result.add_message(CmdMessage::info(format!("Reloaded {} storage", switch.to)));
    }
    if switch.history.is_empty() {
        result.add_message(CmdMessage::info("No history entries"));
    }
    result.backend = Some(switch.to);
    Ok(result.with_entries(switch.history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use tempfile::TempDir;

    #[test]
    fn reports_switch_and_history() {
        let dir = TempDir::new().unwrap();
        let mut selector = BackendSelector::new(StorageConfig::in_dir(dir.path()));
        selector.active_mut().save_history_entry("custom", "x").unwrap();

        let result = select(&mut selector, BackendKind::Relational).unwrap();
        assert_eq!(result.backend, Some(BackendKind::Relational));
        assert!(result.entries.is_empty());
        assert_eq!(
            result.messages[0].content,
            "Switched storage from memory to relational"
        );

        let back = select(&mut selector, BackendKind::Memory).unwrap();
        assert_eq!(back.entries.len(), 1);
    }
}
