// src/git/worktree.rs
use super::{parse_log_line, CommitInfo, LOG_FORMAT, LOG_LIMIT};
use crate::error::{CodestatsError, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::process::Command;

/// The one checkout a walker is allowed to move around.
///
/// Holding `&mut` to a handle is what grants permission to change the checked
/// out commit; nothing else in the crate touches the working directory's HEAD.
pub trait WorkingTreeHandle {
    /// Commits at or after `since`, oldest first.
    ///
    /// # Errors
    /// Returns error if the history cannot be queried.
    fn commits_since(&self, since: DateTime<Utc>) -> Result<Vec<CommitInfo>>;

    /// Discards local modifications, then checks out `hash`.
    ///
    /// # Errors
    /// Returns error if cleaning or checkout fails.
    fn checkout(&mut self, hash: &str) -> Result<()>;

    /// Branch name, or `HEAD` when detached.
    ///
    /// # Errors
    /// Returns error if git cannot be queried.
    fn current_ref(&self) -> Result<String>;

    /// Returns to the ref that was checked out when the handle was acquired.
    ///
    /// # Errors
    /// Returns error if no suitable ref can be checked out.
    fn restore(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    Branch(String),
    Detached(String),
}

/// [`WorkingTreeHandle`] backed by the `git` executable.
#[derive(Debug)]
pub struct GitWorkingTree {
    dir: PathBuf,
    origin: Origin,
    fallback_branches: Vec<String>,
}

impl GitWorkingTree {
    /// Opens the repository at `dir` and records the current ref for [`restore`].
    ///
    /// [`restore`]: WorkingTreeHandle::restore
    ///
    /// # Errors
    /// Returns error if `dir` is not inside a git repository.
    pub fn acquire(dir: impl Into<PathBuf>, fallback_branches: &[String]) -> Result<Self> {
        let dir = dir.into();
        run_git(&dir, &["rev-parse", "--git-dir"])?;

        let branch = run_git(&dir, &["rev-parse", "--abbrev-ref", "HEAD"])?;
        let origin = if branch == "HEAD" {
            Origin::Detached(run_git(&dir, &["rev-parse", "HEAD"])?)
        } else {
            Origin::Branch(branch)
        };
        tracing::debug!("Acquired working tree {} at {origin:?}", dir.display());

        Ok(Self {
            dir,
            origin,
            fallback_branches: fallback_branches.to_vec(),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Provenance of the commit currently checked out.
    ///
    /// # Errors
    /// Returns error if git cannot be queried.
    pub fn head_commit(&self) -> Result<CommitInfo> {
        let line = run_git(&self.dir, &["show", "-s", LOG_FORMAT, "HEAD"])?;
        parse_log_line(&line).ok_or_else(|| CodestatsError::Git {
            args: "show -s HEAD".into(),
            stderr: format!("unexpected output '{line}'"),
        })
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(!run_git(&self.dir, &["status", "--porcelain"])?.is_empty())
    }

    fn branch_exists(&self, name: &str) -> bool {
        let reference = format!("refs/heads/{name}");
        run_git(&self.dir, &["rev-parse", "--verify", "--quiet", &reference]).is_ok()
    }
}

impl WorkingTreeHandle for GitWorkingTree {
    fn commits_since(&self, since: DateTime<Utc>) -> Result<Vec<CommitInfo>> {
        let since_arg = format!("--since={}", since.to_rfc3339());
        let limit = format!("-n{LOG_LIMIT}");
        let output = run_git(
            &self.dir,
            &["log", &since_arg, LOG_FORMAT, &limit, "--reverse"],
        )?;
        Ok(output.lines().filter_map(parse_log_line).collect())
    }

    fn checkout(&mut self, hash: &str) -> Result<()> {
        if self.is_dirty()? {
            tracing::warn!("Discarding uncommitted changes in {}", self.dir.display());
            run_git(&self.dir, &["reset", "--hard"])?;
            run_git(&self.dir, &["clean", "-fd"])?;
        }
        run_git(&self.dir, &["checkout", "--quiet", hash])?;
        Ok(())
    }

    fn current_ref(&self) -> Result<String> {
        run_git(&self.dir, &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn restore(&mut self) -> Result<()> {
        let target = match &self.origin {
            Origin::Branch(name) => name.clone(),
            Origin::Detached(hash) => self
                .fallback_branches
                .iter()
                .find(|b| self.branch_exists(b))
                .cloned()
                .unwrap_or_else(|| hash.clone()),
        };
        tracing::info!("Restoring working tree to {target}");
        self.checkout(&target)
    }
}

/// Runs git in `dir` and returns trimmed stdout.
fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| CodestatsError::io(e, dir))?;

    if !output.status.success() {
        return Err(CodestatsError::Git {
            args: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
