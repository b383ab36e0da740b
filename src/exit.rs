// src/exit.rs
//! Process exit codes for `codestats`.
//!
//! Scripts driving nightly snapshot runs branch on these.

use crate::error::CodestatsError;
use crate::history::WalkSummary;
use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CodestatsExit {
    /// Every planned snapshot was written.
    Success = 0,
    /// Generic error (I/O, git, extractor, config file).
    Error = 1,
    /// Bad date, duration or config value.
    InvalidInput = 2,
    /// The requested range contains no commits.
    NoCommits = 3,
    /// The history walk finished but some commits produced no snapshot.
    PartialFailure = 4,
}

impl CodestatsExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    /// Maps a failed run to its exit code, looking through `anyhow` context.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<CodestatsError>() {
            Some(CodestatsError::NoCommits(_)) => Self::NoCommits,
            Some(e) if e.is_invalid_input() => Self::InvalidInput,
            _ => Self::Error,
        }
    }

    #[must_use]
    pub fn from_walk(summary: &WalkSummary) -> Self {
        if summary.is_complete() {
            Self::Success
        } else {
            Self::PartialFailure
        }
    }
}

impl Termination for CodestatsExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_mapping_sees_through_context() {
        let err = Err::<(), _>(CodestatsError::InvalidDuration("7x".into()))
            .context("resolving range")
            .unwrap_err();
        assert_eq!(CodestatsExit::from_error(&err), CodestatsExit::InvalidInput);

        let err = anyhow::Error::from(CodestatsError::NoCommits("2025-04-01".into()));
        assert_eq!(CodestatsExit::from_error(&err), CodestatsExit::NoCommits);

        let err = anyhow::anyhow!("boom");
        assert_eq!(CodestatsExit::from_error(&err), CodestatsExit::Error);
    }

    #[test]
    fn test_walk_mapping() {
        let mut summary = WalkSummary {
            planned: 2,
            succeeded: 2,
            ..WalkSummary::default()
        };
        assert_eq!(CodestatsExit::from_walk(&summary), CodestatsExit::Success);
        summary.failed.push(("abc".into(), "checkout failed".into()));
        assert_eq!(CodestatsExit::from_walk(&summary), CodestatsExit::PartialFailure);
        assert_eq!(CodestatsExit::PartialFailure.code(), 4);
    }
}
