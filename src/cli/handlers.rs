// src/cli/handlers.rs
use crate::aggregate::ClientAggregator;
use crate::cli::args::RangeArgs;
use crate::config::Config;
use crate::dto::{self, DtoMode};
use crate::error::CodestatsError;
use crate::exit::CodestatsExit;
use crate::git::{CommitInfo, GitWorkingTree};
use crate::history::{self, WalkPlan, WalkSummary};
use crate::resolve::ModuleResolver;
use crate::snapshot::{ReportKind, SnapshotWriter};
use crate::source::TsProject;
use crate::summary;
use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Handles `codestats client`.
///
/// # Errors
/// Returns error on invalid ranges, empty history or unwritable output.
pub fn handle_client(config: &Config, range: &RangeArgs) -> Result<CodestatsExit> {
    let project = TsProject::new(&config.repo_dir, &config.base_path, &config.modules);
    let aggregator = ClientAggregator::new(ModuleResolver::new(
        &config.base_path,
        &config.modules,
        config.resolution,
    ));
    let writer = SnapshotWriter::new(&config.output_root);

    run(config, range, |commit| aggregator.run(&project).write_all(&writer, commit))
}

/// Handles `codestats dto`.
///
/// # Errors
/// Returns error on invalid ranges, empty history, extractor failure or
/// unwritable output.
pub fn handle_dto(config: &Config, thresholds: bool, range: &RangeArgs) -> Result<CodestatsExit> {
    let mode = if thresholds {
        DtoMode::Thresholds
    } else {
        DtoMode::Static
    };
    let writer = SnapshotWriter::new(&config.output_root);

    run(config, range, |commit| {
        let report = dto::collect(&config.repo_dir, mode, &config.extractor)?;
        let path = writer.write(
            ReportKind::DtoViolations,
            &report,
            commit,
            Some(mode.data_source()),
        )?;
        Ok(vec![path])
    })
}

/// Handles `codestats summary`.
///
/// # Errors
/// Returns error if a snapshot directory cannot be read.
pub fn handle_summary(
    config: &Config,
    report: Option<ReportKind>,
    top: usize,
) -> Result<CodestatsExit> {
    let kinds = report.map_or_else(|| ReportKind::ALL.to_vec(), |k| vec![k]);
    for kind in kinds {
        match summary::render(&config.output_root, kind, top)? {
            Some(text) => println!("{text}"),
            None => println!(
                "{}",
                format!("No {kind} snapshots under {}", config.output_root.display()).dimmed()
            ),
        }
    }
    Ok(CodestatsExit::Success)
}

/// Single snapshot of the current checkout, or a walk over `range`.
fn run<F>(config: &Config, range: &RangeArgs, mut job: F) -> Result<CodestatsExit>
where
    F: FnMut(&CommitInfo) -> crate::error::Result<Vec<PathBuf>>,
{
    let Some(start) = range.range_start() else {
        let provenance = current_commit(config);
        let paths = job(&provenance).context("Snapshot failed")?;
        print_written(&paths);
        return Ok(CodestatsExit::Success);
    };

    let plan = WalkPlan {
        since: start.resolve(Utc::now())?,
        cutoff: config.cutoff()?,
        interval: usize::try_from(range.interval).unwrap_or(usize::MAX),
        limit: range.commits.map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
    };
    ensure_output_outside_repo(config)?;
    let mut tree = GitWorkingTree::acquire(&config.repo_dir, &config.fallback_branches)
        .with_context(|| format!("Cannot open repository {}", config.repo_dir.display()))?;

    let commits = history::select_commits(&tree, &plan)?;
    println!(
        "{} Analysing {} commits since {}",
        "::".blue().bold(),
        commits.len(),
        plan.since.format("%Y-%m-%d %H:%M")
    );

    let summary = history::walk(&mut tree, &commits, job);
    print_walk(&summary);
    Ok(CodestatsExit::from_walk(&summary))
}

/// Checkouts clean untracked files, so snapshots must not live in the walked tree.
fn ensure_output_outside_repo(config: &Config) -> crate::error::Result<()> {
    let repo = real_path(&config.repo_dir);
    let out = real_path(&config.output_root);
    if out.starts_with(&repo) {
        return Err(CodestatsError::Config(format!(
            "output root {} is inside repository {}; checkouts would delete its snapshots",
            config.output_root.display(),
            config.repo_dir.display()
        )));
    }
    Ok(())
}

/// Canonical form of the longest existing prefix, with the rest appended.
fn real_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut missing = Vec::new();
    let mut existing = absolute.as_path();
    loop {
        if let Ok(real) = fs::canonicalize(existing) {
            return missing.iter().rev().fold(real, |acc: PathBuf, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return absolute,
        }
    }
}

fn current_commit(config: &Config) -> CommitInfo {
    GitWorkingTree::acquire(&config.repo_dir, &config.fallback_branches)
        .and_then(|tree| tree.head_commit())
        .unwrap_or_else(|e| {
            tracing::warn!("No commit info for {}: {e}", config.repo_dir.display());
            CommitInfo::unknown()
        })
}

fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("{} {}", "wrote".green(), path.display());
    }
}

fn print_walk(summary: &WalkSummary) {
    print_written(&summary.written);
    if summary.is_complete() {
        println!(
            "{}",
            format!("[OK] {} of {} commits analysed.", summary.succeeded, summary.planned)
                .green()
                .bold()
        );
        return;
    }
    println!(
        "{}",
        format!(
            "[PARTIAL] {} of {} commits analysed, {} failed:",
            summary.succeeded,
            summary.planned,
            summary.failed.len()
        )
        .yellow()
        .bold()
    );
    for (hash, reason) in &summary.failed {
        println!("  {} {reason}", hash.get(..8).unwrap_or(hash).red());
    }
}
