//! Terminal summary of the latest snapshot of each report.
//!
//! Reads what the writer produced, so it works on any `data/` tree,
//! including one populated by an earlier history run.

use crate::dto::DtoViolations;
use crate::snapshot::{load_snapshots, ReportKind, Snapshot};
use crate::stats::{ChangeDetection, ComponentInventory, DecoratorlessApi, ModuleTable, Tally};
use anyhow::Result;
use colored::Colorize;
use serde::de::DeserializeOwned;
use std::cmp::Ordering;
use std::fmt::Write;
use std::path::Path;

const NAME_WIDTH: usize = 16;
const CELL_WIDTH: usize = 12;

/// Renders the summary for `kind`, or `None` when no snapshot exists yet.
///
/// # Errors
/// Returns error if the snapshot directory cannot be listed.
pub fn render(root: &Path, kind: ReportKind, top: usize) -> Result<Option<String>> {
    let text = match kind {
        ReportKind::ComponentInventory => latest::<ModuleTable<ComponentInventory>>(root, kind)?
            .map(|(l, p)| inventory(&l, p.as_ref())),
        ReportKind::ChangeDetection => latest::<ModuleTable<ChangeDetection>>(root, kind)?
            .map(|(l, p)| change_detection(&l, p.as_ref())),
        ReportKind::DecoratorlessApi => latest::<ModuleTable<DecoratorlessApi>>(root, kind)?
            .map(|(l, p)| decoratorless(&l, p.as_ref(), top)),
        ReportKind::DtoViolations => {
            latest::<DtoViolations>(root, kind)?.map(|(l, p)| dto(&l, p.as_ref(), top))
        }
    };
    text.transpose()
}

type Pair<T> = (Snapshot<T>, Option<Snapshot<T>>);

fn latest<T: DeserializeOwned>(root: &Path, kind: ReportKind) -> Result<Option<Pair<T>>> {
    let mut snapshots = load_snapshots::<T>(root, kind)?;
    let Some(last) = snapshots.pop() else {
        return Ok(None);
    };
    Ok(Some((last, snapshots.pop())))
}

fn inventory(
    latest: &Snapshot<ModuleTable<ComponentInventory>>,
    previous: Option<&Snapshot<ModuleTable<ComponentInventory>>>,
) -> Result<String> {
    let mut out = String::new();
    write_header(&mut out, ReportKind::ComponentInventory, latest)?;
    write_row(&mut out, "module", &["components", "directives", "pipes", "injectables", "total"])?;
    for (module, s) in latest.payload.iter() {
        write_row(
            &mut out,
            module,
            &[s.components, s.directives, s.pipes, s.injectables, s.total()].map(|n| n.to_string()),
        )?;
    }
    write_delta(
        &mut out,
        latest.payload.grand_total(),
        previous.map(|p| p.payload.grand_total()),
    )?;
    Ok(out)
}

fn change_detection(
    latest: &Snapshot<ModuleTable<ChangeDetection>>,
    previous: Option<&Snapshot<ModuleTable<ChangeDetection>>>,
) -> Result<String> {
    let mut out = String::new();
    write_header(&mut out, ReportKind::ChangeDetection, latest)?;
    write_row(&mut out, "module", &["onPush", "default", "implicit", "total", "onPush %"])?;

    let mut overall = ChangeDetection::default();
    for (module, s) in latest.payload.iter() {
        overall.explicit_on_push += s.explicit_on_push;
        overall.explicit_default += s.explicit_default;
        overall.implicit_default += s.implicit_default;
        write_row(
            &mut out,
            module,
            &[
                s.explicit_on_push.to_string(),
                s.explicit_default.to_string(),
                s.implicit_default.to_string(),
                s.total().to_string(),
                percent(s.on_push_ratio()),
            ],
        )?;
    }
    writeln!(out, "OnPush share overall: {}", percent(overall.on_push_ratio()).bold())?;
    write_delta(
        &mut out,
        latest.payload.grand_total(),
        previous.map(|p| p.payload.grand_total()),
    )?;
    Ok(out)
}

fn decoratorless(
    latest: &Snapshot<ModuleTable<DecoratorlessApi>>,
    previous: Option<&Snapshot<ModuleTable<DecoratorlessApi>>>,
    top: usize,
) -> Result<String> {
    let mut out = String::new();
    write_header(&mut out, ReportKind::DecoratorlessApi, latest)?;
    write_row(&mut out, "module", &["function", "decorator", "progress"])?;
    for (module, s) in latest.payload.iter() {
        write_row(
            &mut out,
            module,
            &[
                s.function_style().to_string(),
                s.decorator_style().to_string(),
                percent(s.migration_ratio()),
            ],
        )?;
    }

    let mut board: Vec<(&str, f64)> = latest
        .payload
        .iter()
        .filter_map(|(m, s)| s.migration_ratio().map(|r| (m, r)))
        .collect();
    board.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(b.0)));

    writeln!(out)?;
    writeln!(out, "{}", "Migration leaderboard".bold())?;
    for (rank, (module, ratio)) in board.iter().take(top).enumerate() {
        writeln!(out, "{:>3}. {module:<NAME_WIDTH$} {}", rank + 1, percent(Some(*ratio)))?;
    }

    let function_total = |t: &ModuleTable<DecoratorlessApi>| -> u64 {
        t.iter().map(|(_, s)| s.function_style()).sum()
    };
    write_delta(
        &mut out,
        function_total(&latest.payload),
        previous.map(|p| function_total(&p.payload)),
    )?;
    Ok(out)
}

fn dto(
    latest: &Snapshot<DtoViolations>,
    previous: Option<&Snapshot<DtoViolations>>,
    top: usize,
) -> Result<String> {
    let mut out = String::new();
    write_header(&mut out, ReportKind::DtoViolations, latest)?;
    if let Some(source) = &latest.metadata.data_source {
        writeln!(out, "{}", source.dimmed())?;
    }
    write_row(&mut out, "module", &["return", "input", "dtoField", "total"])?;

    let mut ranked: Vec<_> = latest.payload.modules.iter().collect();
    ranked.sort_by(|a, b| b.1.total().cmp(&a.1.total()).then(a.0.cmp(b.0)));
    for (module, m) in ranked.into_iter().take(top) {
        write_row(
            &mut out,
            module,
            &[
                m.entity_return_violations,
                m.entity_input_violations,
                m.dto_entity_field_violations,
                m.total(),
            ]
            .map(|n| n.to_string()),
        )?;
    }
    write_delta(
        &mut out,
        latest.payload.totals().total(),
        previous.map(|p| p.payload.totals().total()),
    )?;
    Ok(out)
}

fn write_header<T>(out: &mut String, kind: ReportKind, snap: &Snapshot<T>) -> Result<()> {
    let c = &snap.metadata.artemis;
    writeln!(
        out,
        "{} @ {} ({}) by {}",
        kind.tag().bold(),
        c.short_hash().yellow(),
        c.commit_date.format("%Y-%m-%d %H:%M"),
        c.commit_author
    )?;
    Ok(())
}

fn write_row<S: AsRef<str>>(out: &mut String, name: &str, cells: &[S]) -> Result<()> {
    write!(out, "{name:<NAME_WIDTH$}")?;
    for cell in cells {
        write!(out, "{:>CELL_WIDTH$}", cell.as_ref())?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_delta(out: &mut String, current: u64, previous: Option<u64>) -> Result<()> {
    let Some(previous) = previous else {
        writeln!(out, "Total: {current}")?;
        return Ok(());
    };
    let delta = i128::from(current) - i128::from(previous);
    let label = format!("{delta:+}");
    let label = match delta.cmp(&0) {
        Ordering::Greater => label.green(),
        Ordering::Less => label.red(),
        Ordering::Equal => label.dimmed(),
    };
    writeln!(out, "Total: {current} ({label} since previous snapshot)")?;
    Ok(())
}

fn percent(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "-".to_string(), |r| format!("{:.1}%", r * 100.0))
}
