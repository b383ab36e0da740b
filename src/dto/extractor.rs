// src/dto/extractor.rs
use super::DtoViolations;
use crate::config::ExtractorConfig;
use crate::error::{CodestatsError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One invocation of the external static analyser.
#[derive(Debug, Clone)]
pub struct Extractor {
    prepare: Vec<Vec<String>>,
    program: String,
    args: Vec<String>,
    output: PathBuf,
    timeout: Duration,
}

impl Extractor {
    /// Substitutes `{source}` and `{output}` in the configured arguments.
    #[must_use]
    pub fn from_config(config: &ExtractorConfig, repo_dir: &Path) -> Self {
        let source = repo_dir.join(&config.source_dir);
        let source = source.to_string_lossy();
        let output = config.output_file.to_string_lossy();
        let args = config
            .args
            .iter()
            .map(|a| a.replace("{source}", &source).replace("{output}", &output))
            .collect();
        Self {
            prepare: config.prepare.clone(),
            program: config.program.clone(),
            args,
            output: config.output_file.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Runs the prepare steps and the extractor, then reads its JSON output.
    ///
    /// # Errors
    /// `ExtractorTimeout` if the steps together outlive the timeout (the
    /// running child is killed), `ExtractorFailed` on spawn failure, nonzero
    /// exit or missing output.
    pub fn run(&self) -> Result<DtoViolations> {
        // Never read output left behind by a previous run.
        if self.output.exists() {
            fs::remove_file(&self.output).map_err(|e| CodestatsError::io(e, &self.output))?;
        }

        let deadline = Instant::now() + self.timeout;
        for step in &self.prepare {
            let Some((program, args)) = step.split_first() else {
                continue;
            };
            tracing::info!("Preparing extractor: {}", step.join(" "));
            let status = self.run_until(program, args, deadline)?;
            if !status.success() {
                return Err(CodestatsError::ExtractorFailed(format!("{program}: {status}")));
            }
        }

        tracing::info!("Running static analysis: {} {}", self.program, self.args.join(" "));
        let status = self.run_until(&self.program, &self.args, deadline)?;
        if !status.success() {
            return Err(CodestatsError::ExtractorFailed(status.to_string()));
        }
        if !self.output.exists() {
            return Err(CodestatsError::ExtractorFailed(format!(
                "output file {} not found",
                self.output.display()
            )));
        }

        let content =
            fs::read_to_string(&self.output).map_err(|e| CodestatsError::io(e, &self.output))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Waits for `program`, killing it once `deadline` passes.
    fn run_until(&self, program: &str, args: &[String], deadline: Instant) -> Result<ExitStatus> {
        let mut child = Command::new(program)
            .args(args)
            .spawn()
            .map_err(|e| CodestatsError::ExtractorFailed(format!("{program}: {e}")))?;

        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                tracing::warn!("{program} exceeded {:?}, killing it", self.timeout);
                if let Err(e) = child.kill() {
                    tracing::warn!("Could not kill {program}: {e}");
                }
                if let Err(e) = child.wait() {
                    tracing::warn!("Could not reap {program}: {e}");
                }
                return Err(CodestatsError::ExtractorTimeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}
