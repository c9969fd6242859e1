//! Persisted undo state: the most recent mutating operation's record,
//! kept as JSON so `backoffice undo` works in a later invocation.

use std::path::Path;

use anyhow::{Context, Result};
use pdfbatch_core::UndoRecord;
use tracing::warn;

pub const STATE_FILE: &str = "last_operation.json";

pub fn save_record(data_dir: &Path, record: &UndoRecord) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;
    let path = data_dir.join(STATE_FILE);
    std::fs::write(&path, serde_json::to_string_pretty(record)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load_record(data_dir: &Path) -> Option<UndoRecord> {
    let path = data_dir.join(STATE_FILE);
    let text = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&text) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "undo state unreadable");
            None
        }
    }
}

pub fn clear_record(data_dir: &Path) {
    let _ = std::fs::remove_file(data_dir.join(STATE_FILE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_record(dir.path()).is_none());

        let record = UndoRecord::MergeFiles {
            created: PathBuf::from("/tmp/out.pdf"),
        };
        save_record(dir.path(), &record).unwrap();

        let loaded = load_record(dir.path()).unwrap();
        assert!(matches!(loaded, UndoRecord::MergeFiles { .. }));

        clear_record(dir.path());
        assert!(load_record(dir.path()).is_none());
    }
}
