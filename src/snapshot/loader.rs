use super::writer::report_dir;
use super::{Metadata, ReportKind};
use crate::error::{CodestatsError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub path: PathBuf,
    pub metadata: Metadata,
    pub payload: T,
}

/// Loads every snapshot of `kind` under `root`, oldest commit first.
///
/// Files that are not valid snapshots are logged and skipped. A missing
/// report directory yields an empty list.
///
/// # Errors
/// Returns error if the report directory exists but cannot be listed.
pub fn load_snapshots<T: DeserializeOwned>(
    root: &Path,
    kind: ReportKind,
) -> Result<Vec<Snapshot<T>>> {
    let dir = report_dir(root, kind);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(&dir).map_err(|e| CodestatsError::io(e, &dir))?;
    let mut snapshots: Vec<Snapshot<T>> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|p| match read_snapshot(&p, kind) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", p.display());
                None
            }
        })
        .collect();

    snapshots.sort_by(|a, b| {
        a.metadata
            .artemis
            .commit_date
            .cmp(&b.metadata.artemis.commit_date)
            .then_with(|| a.path.cmp(&b.path))
    });
    Ok(snapshots)
}

fn read_snapshot<T: DeserializeOwned>(path: &Path, kind: ReportKind) -> Result<Snapshot<T>> {
    let content = fs::read_to_string(path).map_err(|e| CodestatsError::io(e, path))?;
    let mut value: Value = serde_json::from_str(&content)?;
    let mut take = |key: &str| {
        value
            .get_mut(key)
            .map(Value::take)
            .ok_or_else(|| CodestatsError::InvalidSnapshot(format!("missing '{key}' key")))
    };
    let metadata: Metadata = serde_json::from_value(take("metadata")?)?;
    let payload = serde_json::from_value(take(kind.tag())?)?;
    Ok(Snapshot {
        path: path.to_path_buf(),
        metadata,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::parse_log_line;
    use crate::snapshot::SnapshotWriter;
    use crate::stats::{ComponentInventory, ModuleTable};
    use tempfile::TempDir;

    #[test]
    fn test_loads_sorted_by_commit_date() -> Result<()> {
        let dir = TempDir::new()?;
        let writer = SnapshotWriter::new(dir.path());
        let modules = vec!["core".to_string()];
        let table: ModuleTable<ComponentInventory> = ModuleTable::new(&modules);

        for line in [
            "bbbbbbbb|2025-05-01T00:00:00Z|A|later",
            "aaaaaaaa|2025-04-01T00:00:00Z|A|earlier",
        ] {
            if let Some(c) = parse_log_line(line) {
                writer.write(ReportKind::ComponentInventory, &table, &c, None)?;
            }
        }
        fs::write(
            writer.report_dir(ReportKind::ComponentInventory).join("junk.json"),
            "not json",
        )?;

        let loaded: Vec<Snapshot<ModuleTable<ComponentInventory>>> =
            load_snapshots(dir.path(), ReportKind::ComponentInventory)?;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].metadata.artemis.commit_message, "earlier");
        assert_eq!(loaded[1].metadata.artemis.commit_message, "later");
        assert_eq!(loaded[0].payload.modules(), vec!["core"]);
        Ok(())
    }

    #[test]
    fn test_missing_dir_is_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let loaded: Vec<Snapshot<Value>> = load_snapshots(dir.path(), ReportKind::DtoViolations)?;
        assert!(loaded.is_empty());
        Ok(())
    }
}
