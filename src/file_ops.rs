use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::task;

use crate::storage;
use crate::store::RecordStore;

/// Write a snapshot of the roster to `path` on a blocking worker thread.
/// The GUI calls this through `Task::perform` so the window keeps repainting.
pub async fn export_snapshot(path: PathBuf, snapshot: RecordStore) -> Result<PathBuf> {
    let target = path.clone();
    task::spawn_blocking(move || storage::save(&target, &snapshot))
        .await
        .context("export worker did not finish")?
        .with_context(|| format!("exporting roster to {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn export_writes_same_format_as_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.txt");
        let mut store = RecordStore::new();
        store.add_record(2, "Grace").unwrap();
        store.append_grade(2, 88).unwrap();

        let written = export_snapshot(path.clone(), store).await.unwrap();
        assert_eq!(written, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2 Grace 1 88\n");
    }

    #[tokio::test]
    async fn export_failure_carries_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("export.txt");

        let err = export_snapshot(path, RecordStore::new()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("exporting roster to"));
    }
}
