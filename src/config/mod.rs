// src/config/mod.rs
pub mod types;

pub use self::types::{Config, ExtractorConfig};

use crate::error::{CodestatsError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "codestats.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path`, or `codestats.toml` in the working directory when `None`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(CONFIG_FILE));
        if !path.exists() {
            tracing::debug!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| CodestatsError::io(e, path))?;
        let config = Self::parse_toml(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns `Config` error on malformed TOML or invalid values.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| CodestatsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration.
    ///
    /// # Errors
    /// Returns `Config` error when the module list is empty or the cutoff is not a date.
    pub fn validate(&self) -> Result<()> {
        if self.modules.is_empty() {
            return Err(CodestatsError::Config("`modules` must not be empty".into()));
        }
        if self.extractor.timeout_secs == 0 {
            return Err(CodestatsError::Config(
                "`extractor.timeout_secs` must be positive".into(),
            ));
        }
        if self.extractor.prepare.iter().any(Vec::is_empty) {
            return Err(CodestatsError::Config(
                "`extractor.prepare` steps must name a program".into(),
            ));
        }
        self.cutoff()?;
        Ok(())
    }

    /// The cutoff date as midnight UTC.
    ///
    /// # Errors
    /// Returns `Config` error if `cutoff_date` is not `YYYY-MM-DD`.
    pub fn cutoff(&self) -> Result<DateTime<Utc>> {
        NaiveDate::parse_from_str(&self.cutoff_date, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .ok_or_else(|| {
                CodestatsError::Config(format!(
                    "`cutoff_date` must be YYYY-MM-DD, got '{}'",
                    self.cutoff_date
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Resolution;

    #[test]
    fn test_empty_document_uses_defaults() -> Result<()> {
        let config = Config::parse_toml("")?;
        assert_eq!(config.modules.len(), 19);
        assert_eq!(config.base_path, "src/main/webapp/app");
        assert_eq!(config.resolution, Resolution::Substring);
        assert_eq!(config.extractor.timeout_secs, 300);
        Ok(())
    }

    #[test]
    fn test_overrides() -> Result<()> {
        let config = Config::parse_toml(
            r#"
            modules = ["core", "shared"]
            resolution = "segment"
            cutoff_date = "2024-01-01"

            [extractor]
            timeout_secs = 10
            "#,
        )?;
        assert_eq!(config.modules, vec!["core", "shared"]);
        assert_eq!(config.resolution, Resolution::Segment);
        assert_eq!(config.cutoff()?.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(config.extractor.timeout_secs, 10);
        assert_eq!(config.extractor.program, "java");
        Ok(())
    }

    #[test]
    fn test_rejects_empty_modules() {
        let err = Config::parse_toml("modules = []");
        assert!(matches!(err, Err(CodestatsError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_cutoff() {
        let err = Config::parse_toml("cutoff_date = \"last tuesday\"");
        assert!(matches!(err, Err(CodestatsError::Config(_))));
    }

    #[test]
    fn test_prepare_steps() -> Result<()> {
        let config = Config::parse_toml(
            r#"
            [extractor]
            prepare = [["sh", "report/server/setup.sh"], ["javac", "-d", "out", "X.java"]]
            "#,
        )?;
        assert_eq!(config.extractor.prepare.len(), 2);
        assert_eq!(config.extractor.prepare[0], vec!["sh", "report/server/setup.sh"]);

        let err = Config::parse_toml("[extractor]\nprepare = [[]]");
        assert!(matches!(err, Err(CodestatsError::Config(_))));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_default() -> Result<()> {
        let config = Config::load(Some(Path::new("/definitely/not/here/codestats.toml")))?;
        assert_eq!(config.output_root, Path::new("data"));
        Ok(())
    }
}
