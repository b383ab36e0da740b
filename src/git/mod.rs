// src/git/mod.rs
//! Git provenance and the exclusively owned working tree of the analysed repo.

pub mod worktree;

pub use self::worktree::{GitWorkingTree, WorkingTreeHandle};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `git log` format matched by [`parse_log_line`].
pub const LOG_FORMAT: &str = "--format=%H|%cI|%an|%s";

/// Upper bound on commits fetched per history query.
pub const LOG_LIMIT: usize = 1000;

/// Identity of the commit a snapshot was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub commit_hash: String,
    pub commit_date: DateTime<Utc>,
    pub commit_author: String,
    pub commit_message: String,
}

impl CommitInfo {
    /// Placeholder provenance when the repository cannot be queried.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            commit_hash: "unknown".into(),
            commit_date: Utc::now(),
            commit_author: "unknown".into(),
            commit_message: "unknown".into(),
        }
    }

    /// First 8 characters of the hash, or the whole hash if shorter.
    #[must_use]
    pub fn short_hash(&self) -> &str {
        let end = self
            .commit_hash
            .char_indices()
            .nth(8)
            .map_or(self.commit_hash.len(), |(i, _)| i);
        &self.commit_hash[..end]
    }
}

/// Parses one `%H|%cI|%an|%s` line. The subject may itself contain `|`.
///
/// An unparseable date falls back to the current time so the commit is still
/// walked; a line without hash or date fields yields `None`.
#[must_use]
pub fn parse_log_line(line: &str) -> Option<CommitInfo> {
    let mut parts = line.splitn(4, '|');
    let hash = parts.next()?.trim();
    let date = parts.next()?.trim();
    let author = parts.next().unwrap_or_default();
    let message = parts.next().unwrap_or_default();
    if hash.is_empty() {
        return None;
    }

    let commit_date = DateTime::parse_from_rfc3339(date).map_or_else(
        |_| {
            tracing::warn!("Unparseable commit date '{date}' for {hash}");
            Utc::now()
        },
        |d| d.with_timezone(&Utc),
    );

    Some(CommitInfo {
        commit_hash: hash.to_string(),
        commit_date,
        commit_author: author.to_string(),
        commit_message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_line() {
        let commit = parse_log_line(concat!(
            "0123456789abcdef0123456789abcdef01234567",
            "|2025-04-02T10:15:30+02:00|Jane Doe|Fix a|b split",
        ));
        let Some(commit) = commit else {
            panic!("line should parse");
        };
        assert_eq!(commit.short_hash(), "01234567");
        assert_eq!(commit.commit_author, "Jane Doe");
        assert_eq!(commit.commit_message, "Fix a|b split");
        assert_eq!(commit.commit_date.to_rfc3339(), "2025-04-02T08:15:30+00:00");
    }

    #[test]
    fn test_parse_rejects_empty_lines() {
        assert!(parse_log_line("").is_none());
        assert!(parse_log_line("abc").is_none());
    }

    #[test]
    fn test_short_hash_of_short_value() {
        assert_eq!(CommitInfo::unknown().short_hash(), "unknown");
    }

    #[test]
    fn test_serialized_field_names() -> serde_json::Result<()> {
        let commit = parse_log_line("abc|2025-04-02T10:15:30Z|A|M");
        let value = serde_json::to_value(commit)?;
        assert_eq!(value["commitHash"], "abc");
        assert_eq!(value["commitDate"], "2025-04-02T10:15:30Z");
        assert_eq!(value["commitAuthor"], "A");
        assert_eq!(value["commitMessage"], "M");
        Ok(())
    }
}
