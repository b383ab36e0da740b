use crate::history::RangeStart;
use crate::snapshot::ReportKind;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codestats", version, about = "Angular code base statistics over time")]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Config file (default: ./codestats.toml)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
    /// Repository to analyse, overrides `repo_dir`
    #[arg(long, value_name = "DIR", global = true)]
    pub repo: Option<PathBuf>,
    /// Snapshot output root, overrides `output_root`
    #[arg(long, value_name = "DIR", global = true)]
    pub out: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Component inventory, change detection and decoratorless API reports
    Client {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Server DTO violation report
    Dto {
        /// Read maxima from architecture tests instead of running the extractor
        #[arg(long)]
        thresholds: bool,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Print the latest snapshots
    Summary {
        /// Only this report
        #[arg(long, value_name = "KIND")]
        report: Option<ReportKind>,
        /// Leaderboard and ranking length
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Walk history from this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, short, value_name = "DATE", conflicts_with = "relative")]
    pub start: Option<String>,
    /// Walk history over a trailing period, e.g. 24h, 7d, 2w, 1m, 1y
    #[arg(long, short, value_name = "PERIOD")]
    pub relative: Option<String>,
    /// Analyse at most this many commits
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..))]
    pub commits: Option<u64>,
    /// Analyse every Nth commit
    #[arg(long, short, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,
}

impl RangeArgs {
    /// `None` means a single snapshot of the current checkout.
    #[must_use]
    pub fn range_start(&self) -> Option<RangeStart> {
        match (&self.start, &self.relative) {
            (Some(date), _) => Some(RangeStart::Date(date.clone())),
            (None, Some(period)) => Some(RangeStart::Relative(period.clone())),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_relative_conflict() {
        let parsed = Cli::try_parse_from([
            "codestats", "client", "--start", "2025-04-01", "--relative", "7d",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_history_flags() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from([
            "codestats", "-vv", "--out", "snapshots", "dto", "--thresholds", "-r", "2w", "-n", "5",
            "-i", "3",
        ])?;
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.out, Some(PathBuf::from("snapshots")));
        let Commands::Dto { thresholds, range } = cli.command else {
            panic!("expected dto");
        };
        assert!(thresholds);
        assert_eq!(range.range_start(), Some(RangeStart::Relative("2w".into())));
        assert_eq!(range.commits, Some(5));
        assert_eq!(range.interval, 3);
        Ok(())
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(Cli::try_parse_from(["codestats", "client", "--interval", "0"]).is_err());
    }

    #[test]
    fn test_summary_report_kind() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["codestats", "summary", "--report", "decoratorlessAPI"])?;
        assert!(matches!(
            cli.command,
            Commands::Summary { report: Some(ReportKind::DecoratorlessApi), top: 10 }
        ));
        Ok(())
    }
}
