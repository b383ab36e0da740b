// src/history/mod.rs
//! Replays the analysis over a range of past commits.

pub mod range;
pub mod walker;

pub use self::range::{apply_cutoff, downsample, parse_relative, parse_start_date, RangeStart};
pub use self::walker::{select_commits, walk, WalkPlan, WalkSummary};
