// src/snapshot/writer.rs
use super::{Metadata, ReportKind};
use crate::error::{CodestatsError, Result};
use crate::git::CommitInfo;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

const MAX_VERSIONS: u32 = 1000;

/// Writes snapshot files under `<root>/<client|server>/<tag>/`.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    root: PathBuf,
}

/// `{ "metadata": ..., "<tag>": payload }`, metadata first.
struct Envelope<'a, T> {
    metadata: &'a Metadata,
    tag: &'static str,
    payload: &'a T,
}

impl<T: Serialize> Serialize for Envelope<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("metadata", self.metadata)?;
        map.serialize_entry(self.tag, self.payload)?;
        map.end()
    }
}

impl SnapshotWriter {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn report_dir(&self, kind: ReportKind) -> PathBuf {
        report_dir(&self.root, kind)
    }

    /// `<tag>_<YYYY-MM-DD_HH-MM-SS>_<hash8>`, timestamp in UTC.
    #[must_use]
    pub fn file_stem(kind: ReportKind, provenance: &CommitInfo) -> String {
        format!(
            "{}_{}_{}",
            kind.tag(),
            provenance.commit_date.format("%Y-%m-%d_%H-%M-%S"),
            provenance.short_hash()
        )
    }

    /// Serializes one snapshot and returns the path written.
    ///
    /// Never overwrites: if the name is taken, `_2`, `_3`, ... is appended.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created or the file written.
    pub fn write<T: Serialize>(
        &self,
        kind: ReportKind,
        payload: &T,
        provenance: &CommitInfo,
        data_source: Option<&str>,
    ) -> Result<PathBuf> {
        let dir = self.report_dir(kind);
        fs::create_dir_all(&dir).map_err(|e| CodestatsError::io(e, &dir))?;

        let metadata = Metadata {
            report_type: kind.tag().to_string(),
            artemis: provenance.clone(),
            data_source: data_source.map(ToString::to_string),
        };
        let envelope = Envelope {
            metadata: &metadata,
            tag: kind.tag(),
            payload,
        };

        let (path, file) = create_unique(&dir, &Self::file_stem(kind, provenance))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, &envelope)?;
        out.write_all(b"\n")
            .and_then(|()| out.flush())
            .map_err(|e| CodestatsError::io(e, &path))?;

        tracing::debug!("Wrote {}", path.display());
        Ok(path)
    }
}

#[must_use]
pub fn report_dir(root: &Path, kind: ReportKind) -> PathBuf {
    root.join(kind.side().dir_name()).join(kind.tag())
}

fn create_unique(dir: &Path, stem: &str) -> Result<(PathBuf, fs::File)> {
    for version in 1..=MAX_VERSIONS {
        let name = if version == 1 {
            format!("{stem}.json")
        } else {
            format!("{stem}_{version}.json")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                if version > 1 {
                    tracing::warn!("Snapshot name taken, wrote {}", path.display());
                }
                return Ok((path, file));
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(CodestatsError::io(e, path)),
        }
    }
    Err(CodestatsError::io(
        std::io::Error::new(ErrorKind::AlreadyExists, "too many snapshot versions"),
        dir.join(stem),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::parse_log_line;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn commit(hash: &str, date: &str) -> CommitInfo {
        parse_log_line(&format!("{hash}|{date}|Ada|Add things")).unwrap_or_else(CommitInfo::unknown)
    }

    #[test]
    fn test_file_stem_format() {
        let c = commit("deadbeefcafebabe", "2025-04-02T10:15:30.123+02:00");
        assert_eq!(
            SnapshotWriter::file_stem(ReportKind::ChangeDetection, &c),
            "changeDetection_2025-04-02_08-15-30_deadbeef"
        );
    }

    #[test]
    fn test_same_second_distinct_hashes() {
        let a = commit("aaaaaaaa11111111", "2025-04-02T10:15:30Z");
        let b = commit("bbbbbbbb11111111", "2025-04-02T10:15:30Z");
        assert_ne!(
            SnapshotWriter::file_stem(ReportKind::ComponentInventory, &a),
            SnapshotWriter::file_stem(ReportKind::ComponentInventory, &b)
        );
    }

    #[test]
    fn test_write_layout_and_envelope() -> Result<()> {
        let dir = TempDir::new()?;
        let writer = SnapshotWriter::new(dir.path());
        let c = commit("0123456789abcdef", "2025-04-02T10:15:30Z");

        let path = writer.write(ReportKind::DtoViolations, &json!({"x": 1}), &c, Some("test"))?;
        assert!(path.ends_with(
            "server/dtoViolations/dtoViolations_2025-04-02_10-15-30_01234567.json"
        ));

        let value: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(value["metadata"]["type"], "dtoViolations");
        assert_eq!(value["metadata"]["artemis"]["commitHash"], "0123456789abcdef");
        assert_eq!(value["metadata"]["dataSource"], "test");
        assert_eq!(value["dtoViolations"]["x"], 1);
        Ok(())
    }

    #[test]
    fn test_collision_is_versioned_not_overwritten() -> Result<()> {
        let dir = TempDir::new()?;
        let writer = SnapshotWriter::new(dir.path());
        let c = commit("0123456789abcdef", "2025-04-02T10:15:30Z");

        let first = writer.write(ReportKind::ChangeDetection, &json!({"run": 1}), &c, None)?;
        let second = writer.write(ReportKind::ChangeDetection, &json!({"run": 2}), &c, None)?;

        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("_01234567_2.json"));
        let original: Value = serde_json::from_str(&fs::read_to_string(&first)?)?;
        assert_eq!(original["changeDetection"]["run"], 1);
        assert!(original["metadata"].get("dataSource").is_none());
        Ok(())
    }
}
