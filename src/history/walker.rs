// src/history/walker.rs
use super::range::{apply_cutoff, downsample};
use crate::error::{CodestatsError, Result};
use crate::git::{CommitInfo, WorkingTreeHandle};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Which commits a history run visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkPlan {
    pub since: DateTime<Utc>,
    pub cutoff: DateTime<Utc>,
    pub interval: usize,
    pub limit: Option<usize>,
}

/// Outcome of a history run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub planned: usize,
    pub succeeded: usize,
    /// `(commit hash, reason)` for every commit that produced no snapshot.
    pub failed: Vec<(String, String)>,
    pub written: Vec<PathBuf>,
}

impl WalkSummary {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Queries, filters and down-samples the commits of `plan`.
///
/// # Errors
/// Returns `NoCommits` when nothing survives filtering, or the history query error.
pub fn select_commits<W: WorkingTreeHandle>(tree: &W, plan: &WalkPlan) -> Result<Vec<CommitInfo>> {
    let mut commits = tree.commits_since(plan.since)?;
    apply_cutoff(&mut commits, plan.cutoff);
    let found = commits.len();
    let commits = downsample(commits, plan.interval, plan.limit);
    if commits.is_empty() {
        return Err(CodestatsError::NoCommits(plan.since.to_rfc3339()));
    }
    tracing::info!(
        "Found {found} commits, analysing {} with interval {}",
        commits.len(),
        plan.interval
    );
    Ok(commits)
}

/// Restores the working tree when the walk ends, however it ends.
struct RestoreGuard<'t, W: WorkingTreeHandle> {
    tree: &'t mut W,
}

impl<W: WorkingTreeHandle> Drop for RestoreGuard<'_, W> {
    fn drop(&mut self) {
        if let Err(e) = self.tree.restore() {
            tracing::error!("Could not restore working tree: {e}");
        }
    }
}

/// Checks out each commit in turn and runs `job` against it.
///
/// Checkout and job failures are recorded and the walk moves on. The tree is
/// restored afterwards even if `job` panics.
pub fn walk<W, F>(tree: &mut W, commits: &[CommitInfo], mut job: F) -> WalkSummary
where
    W: WorkingTreeHandle,
    F: FnMut(&CommitInfo) -> Result<Vec<PathBuf>>,
{
    let mut guard = RestoreGuard { tree };
    let mut summary = WalkSummary {
        planned: commits.len(),
        ..WalkSummary::default()
    };

    for (i, commit) in commits.iter().enumerate() {
        tracing::info!(
            "[{}/{}] {} ({})",
            i + 1,
            commits.len(),
            commit.short_hash(),
            commit.commit_date.to_rfc3339()
        );

        if let Err(e) = guard.tree.checkout(&commit.commit_hash) {
            tracing::warn!("Checkout of {} failed: {e}", commit.short_hash());
            summary.failed.push((commit.commit_hash.clone(), e.to_string()));
            continue;
        }

        match job(commit) {
            Ok(paths) => {
                summary.succeeded += 1;
                summary.written.extend(paths);
            }
            Err(e) => {
                tracing::warn!("Commit {} failed: {e}", commit.short_hash());
                summary.failed.push((commit.commit_hash.clone(), e.to_string()));
            }
        }
    }

    drop(guard);
    summary
}
