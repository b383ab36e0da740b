// src/history/range.rs
//! Turns `--start` / `--relative` into a commit list.

use crate::error::{CodestatsError, Result};
use crate::git::CommitInfo;
use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

static RELATIVE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\d+)([hdwmy])$").ok());

/// How far back a history run reaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeStart {
    Date(String),
    Relative(String),
}

impl RangeStart {
    /// Resolves to an absolute instant, relative ones measured back from `now`.
    ///
    /// # Errors
    /// Returns `InvalidDate` or `InvalidDuration` on malformed input.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        match self {
            Self::Date(text) => parse_start_date(text),
            Self::Relative(text) => parse_relative(text, now),
        }
    }
}

/// Parses `Nh`, `Nd`, `Nw`, `Nm` or `Ny` into the instant that far before `now`.
///
/// Hours, days and weeks are fixed spans. Months and years step back by
/// calendar months, clamping to the last day of shorter months.
///
/// # Errors
/// Returns `InvalidDuration` when the text does not match or overflows.
pub fn parse_relative(text: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let invalid = || CodestatsError::InvalidDuration(text.to_string());
    let caps = RELATIVE
        .as_ref()
        .and_then(|re| re.captures(text.trim()))
        .ok_or_else(invalid)?;
    let value: u32 = caps[1].parse().map_err(|_| invalid())?;

    let start = match &caps[2] {
        "h" => now.checked_sub_signed(Duration::hours(i64::from(value))),
        "d" => now.checked_sub_signed(Duration::days(i64::from(value))),
        "w" => now.checked_sub_signed(Duration::weeks(i64::from(value))),
        "m" => now.checked_sub_months(Months::new(value)),
        "y" => value
            .checked_mul(12)
            .and_then(|months| now.checked_sub_months(Months::new(months))),
        _ => None,
    };
    start.ok_or_else(invalid)
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
///
/// # Errors
/// Returns `InvalidDate` otherwise.
pub fn parse_start_date(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(text)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| CodestatsError::InvalidDate(text.to_string()))
}

/// Drops commits dated strictly before `cutoff`. Returns how many were dropped.
pub fn apply_cutoff(commits: &mut Vec<CommitInfo>, cutoff: DateTime<Utc>) -> usize {
    let before = commits.len();
    commits.retain(|c| c.commit_date >= cutoff);
    let dropped = before - commits.len();
    if dropped > 0 {
        tracing::info!("Filtered out {dropped} commits earlier than {}", cutoff.date_naive());
    }
    dropped
}

/// Keeps every `interval`-th commit starting with the first, then at most `limit`.
#[must_use]
pub fn downsample(
    commits: Vec<CommitInfo>,
    interval: usize,
    limit: Option<usize>,
) -> Vec<CommitInfo> {
    let interval = interval.max(1);
    commits
        .into_iter()
        .enumerate()
        .filter(|(i, _)| i % interval == 0)
        .map(|(_, c)| c)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}
