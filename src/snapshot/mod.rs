// src/snapshot/mod.rs
//! Timestamped JSON snapshots, one per (report type × commit).

pub mod loader;
pub mod writer;

pub use self::loader::{load_snapshots, Snapshot};
pub use self::writer::SnapshotWriter;

use crate::git::CommitInfo;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level partition of the snapshot tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Client,
    Server,
}

impl Side {
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    ComponentInventory,
    ChangeDetection,
    DecoratorlessApi,
    DtoViolations,
}

impl ReportKind {
    pub const ALL: [Self; 4] = [
        Self::ComponentInventory,
        Self::ChangeDetection,
        Self::DecoratorlessApi,
        Self::DtoViolations,
    ];

    /// Tag used for the directory, the file prefix and the payload key.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::ComponentInventory => "componentInventory",
            Self::ChangeDetection => "changeDetection",
            Self::DecoratorlessApi => "decoratorlessAPI",
            Self::DtoViolations => "dtoViolations",
        }
    }

    #[must_use]
    pub fn side(self) -> Side {
        match self {
            Self::DtoViolations => Side::Server,
            _ => Side::Client,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|k| k.tag()).collect();
                format!("unknown report '{s}' (expected one of: {})", valid.join(", "))
            })
    }
}

/// `metadata` block of every snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(rename = "type")]
    pub report_type: String,
    /// Provenance; the key name is what existing dashboards read.
    pub artemis: CommitInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}
