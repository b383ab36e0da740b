// src/dto/thresholds.rs
use super::{DtoModuleViolations, DtoViolations};
use crate::error::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

const TEST_SUFFIX: &str = "EntityUsageArchitectureTest.java";
const SKIPPED_MODULES: &[&str] = &["abstractmodule", "incoming"];

struct Patterns {
    class: Regex,
    entity_return: Regex,
    entity_input: Regex,
    dto_field: Regex,
}

impl Patterns {
    fn new() -> Result<Self> {
        let max = |name: &str| {
            Regex::new(&format!(
                r"getMax{name}Violations\s*\(\s*\)\s*\{{[^}}]*return\s+(\d+)"
            ))
        };
        Ok(Self {
            class: Regex::new(r"class\s+(\w+)EntityUsageArchitectureTest")?,
            entity_return: max("EntityReturn")?,
            entity_input: max("EntityInput")?,
            dto_field: max("DtoEntityField")?,
        })
    }
}

/// Reads the permitted violation maxima from `*EntityUsageArchitectureTest.java`
/// files under `<repo>/src/test/java`.
///
/// # Errors
/// Returns error only if the patterns fail to compile; unreadable files are skipped.
pub fn parse_thresholds(repo_dir: &Path) -> Result<DtoViolations> {
    let patterns = Patterns::new()?;
    let test_root = repo_dir.join("src/test/java");
    let mut report = DtoViolations::default();

    let files = WalkDir::new(&test_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(TEST_SUFFIX));

    for entry in files {
        let content = match fs::read_to_string(entry.path()) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", entry.path().display());
                continue;
            }
        };
        if let Some((module, counts)) = parse_test_source(&patterns, &content) {
            tracing::debug!(
                "{module}: return={} input={} dtoField={}",
                counts.entity_return_violations,
                counts.entity_input_violations,
                counts.dto_entity_field_violations
            );
            report.modules.insert(module, counts);
        }
    }

    tracing::info!("Parsed thresholds for {} modules", report.modules.len());
    Ok(report)
}

fn parse_test_source(patterns: &Patterns, content: &str) -> Option<(String, DtoModuleViolations)> {
    let module = patterns.class.captures(content)?[1].to_lowercase();
    if SKIPPED_MODULES.contains(&module.as_str()) {
        return None;
    }
    let count = |re: &Regex| {
        re.captures(content)
            .and_then(|c| c[1].parse::<u64>().ok())
            .unwrap_or(0)
    };
    Some((
        module,
        DtoModuleViolations::counts(
            count(&patterns.entity_return),
            count(&patterns.entity_input),
            count(&patterns.dto_field),
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const QUIZ_TEST: &str = r"
package de.tum.cit.aet.artemis.quiz.architecture;

class QuizEntityUsageArchitectureTest extends AbstractModuleEntityUsageArchitectureTest {

    @Override
    protected int getMaxEntityReturnViolations() {
        return 12;
    }

    @Override
    protected int getMaxEntityInputViolations() {
        // still migrating
        return 3;
    }
}
";

    #[test]
    fn test_parse_counts_and_missing_default() -> Result<()> {
        let patterns = Patterns::new()?;
        let parsed = parse_test_source(&patterns, QUIZ_TEST);
        assert_eq!(
            parsed,
            Some(("quiz".to_string(), DtoModuleViolations::counts(12, 3, 0)))
        );
        Ok(())
    }

    #[test]
    fn test_skips_abstract_and_incoming() -> Result<()> {
        let patterns = Patterns::new()?;
        let src = "abstract class AbstractModuleEntityUsageArchitectureTest {}";
        assert!(parse_test_source(&patterns, src).is_none());
        let src = "class IncomingEntityUsageArchitectureTest {}";
        assert!(parse_test_source(&patterns, src).is_none());
        Ok(())
    }

    #[test]
    fn test_scans_repository() -> Result<()> {
        let dir = TempDir::new()?;
        let pkg = dir.path().join("src/test/java/de/tum/quiz");
        fs::create_dir_all(&pkg)?;
        fs::write(pkg.join("QuizEntityUsageArchitectureTest.java"), QUIZ_TEST)?;
        fs::write(pkg.join("QuizServiceTest.java"), "class QuizServiceTest {}")?;

        let report = parse_thresholds(dir.path())?;
        assert_eq!(report.modules.len(), 1);
        assert_eq!(report.modules["quiz"].entity_return_violations, 12);
        Ok(())
    }

    #[test]
    fn test_missing_test_dir_is_empty() -> Result<()> {
        let dir = TempDir::new()?;
        assert!(parse_thresholds(dir.path())?.modules.is_empty());
        Ok(())
    }
}
