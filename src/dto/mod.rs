// src/dto/mod.rs
//! Server-side report: entities leaking through REST endpoints and DTOs.

pub mod extractor;
pub mod thresholds;

pub use self::extractor::Extractor;
pub use self::thresholds::parse_thresholds;

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::stats::Tally;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub const STATIC_SOURCE: &str = "Static source code analysis with JavaParser (full coverage)";
pub const THRESHOLD_SOURCE: &str = "Parsed from ArchUnit test thresholds (counts only, no details)";

/// Where DTO violation numbers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtoMode {
    /// Run the external extractor for counts and details.
    Static,
    /// Read the allowed maxima from architecture tests.
    Thresholds,
}

impl DtoMode {
    #[must_use]
    pub fn data_source(self) -> &'static str {
        match self {
            Self::Static => STATIC_SOURCE,
            Self::Thresholds => THRESHOLD_SOURCE,
        }
    }
}

/// Violation counts of one server module. Details are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoModuleViolations {
    #[serde(default)]
    pub entity_return_violations: u64,
    #[serde(default)]
    pub entity_input_violations: u64,
    #[serde(default)]
    pub dto_entity_field_violations: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_return_details: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_input_details: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dto_entity_field_details: Option<Vec<Value>>,
}

impl DtoModuleViolations {
    #[must_use]
    pub fn counts(entity_return: u64, entity_input: u64, dto_entity_field: u64) -> Self {
        Self {
            entity_return_violations: entity_return,
            entity_input_violations: entity_input,
            dto_entity_field_violations: dto_entity_field,
            ..Self::default()
        }
    }
}

impl Tally for DtoModuleViolations {
    fn total(&self) -> u64 {
        self.entity_return_violations
            + self.entity_input_violations
            + self.dto_entity_field_violations
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoTotals {
    pub entity_return_violations: u64,
    pub entity_input_violations: u64,
    pub dto_entity_field_violations: u64,
}

impl Tally for DtoTotals {
    fn total(&self) -> u64 {
        self.entity_return_violations
            + self.entity_input_violations
            + self.dto_entity_field_violations
    }
}

/// Per-module violations. `totals` is derived on write and ignored on read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DtoViolations {
    #[serde(default)]
    pub modules: BTreeMap<String, DtoModuleViolations>,
}

impl DtoViolations {
    #[must_use]
    pub fn totals(&self) -> DtoTotals {
        self.modules.values().fold(DtoTotals::default(), |acc, m| DtoTotals {
            entity_return_violations: acc.entity_return_violations + m.entity_return_violations,
            entity_input_violations: acc.entity_input_violations + m.entity_input_violations,
            dto_entity_field_violations: acc.dto_entity_field_violations
                + m.dto_entity_field_violations,
        })
    }
}

impl Serialize for DtoViolations {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Out<'a> {
            modules: &'a BTreeMap<String, DtoModuleViolations>,
            totals: DtoTotals,
        }
        Out {
            modules: &self.modules,
            totals: self.totals(),
        }
        .serialize(serializer)
    }
}

/// Produces the DTO report for the tree currently checked out in `repo_dir`.
///
/// # Errors
/// Returns error if the extractor fails or its output cannot be read.
pub fn collect(
    repo_dir: &Path,
    mode: DtoMode,
    extractor: &ExtractorConfig,
) -> Result<DtoViolations> {
    let report = match mode {
        DtoMode::Thresholds => parse_thresholds(repo_dir)?,
        DtoMode::Static => Extractor::from_config(extractor, repo_dir).run()?,
    };
    let totals = report.totals();
    tracing::info!(
        "DTO violations: return={} input={} dtoField={} total={} across {} modules",
        totals.entity_return_violations,
        totals.entity_input_violations,
        totals.dto_entity_field_violations,
        totals.total(),
        report.modules.len()
    );
    Ok(report)
}
