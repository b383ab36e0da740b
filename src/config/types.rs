use crate::resolve::Resolution;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Checkout of the analysed code base.
    #[serde(default = "default_repo_dir")]
    pub repo_dir: PathBuf,
    /// Client source root, relative to `repo_dir`.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    #[serde(default = "default_modules")]
    pub modules: Vec<String>,
    #[serde(default)]
    pub resolution: Resolution,
    /// Commits older than this are never analysed.
    #[serde(default = "default_cutoff_date")]
    pub cutoff_date: String,
    #[serde(default = "default_fallback_branches")]
    pub fallback_branches: Vec<String>,
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_dir: default_repo_dir(),
            base_path: default_base_path(),
            output_root: default_output_root(),
            modules: default_modules(),
            resolution: Resolution::default(),
            cutoff_date: default_cutoff_date(),
            fallback_branches: default_fallback_branches(),
            extractor: ExtractorConfig::default(),
        }
    }
}

/// External DTO violation extractor invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Commands run before the extractor, e.g. fetching jars and compiling it.
    /// Each is `[program, args...]` and shares the extractor's timeout.
    #[serde(default)]
    pub prepare: Vec<Vec<String>>,
    #[serde(default = "default_extractor_program")]
    pub program: String,
    /// `{source}` and `{output}` are substituted before spawning.
    #[serde(default = "default_extractor_args")]
    pub args: Vec<String>,
    /// Server source root, relative to `repo_dir`.
    #[serde(default = "default_extractor_source")]
    pub source_dir: String,
    #[serde(default = "default_extractor_output")]
    pub output_file: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            prepare: Vec::new(),
            program: default_extractor_program(),
            args: default_extractor_args(),
            source_dir: default_extractor_source(),
            output_file: default_extractor_output(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_repo_dir() -> PathBuf { PathBuf::from("artemis") }
fn default_base_path() -> String { "src/main/webapp/app".to_string() }
fn default_output_root() -> PathBuf { PathBuf::from("data") }
fn default_cutoff_date() -> String { "2025-03-28".to_string() }
const fn default_timeout_secs() -> u64 { 300 }

fn default_modules() -> Vec<String> {
    [
        "admin",
        "assessment",
        "atlas",
        "buildagent",
        "communication",
        "core",
        "exam",
        "exercise",
        "fileupload",
        "iris",
        "lecture",
        "lti",
        "modeling",
        "plagiarism",
        "programming",
        "quiz",
        "shared",
        "text",
        "tutorialgroup",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_fallback_branches() -> Vec<String> {
    vec!["develop".into(), "main".into(), "master".into()]
}

fn default_extractor_program() -> String { "java".to_string() }

fn default_extractor_args() -> Vec<String> {
    vec![
        "-cp".into(),
        "report/server/out:report/server/lib/*".into(),
        "-Dartemis.source={source}".into(),
        "-Doutput.file={output}".into(),
        "de.tum.cit.aet.codestats.DtoViolationExtractor".into(),
    ]
}

fn default_extractor_source() -> String { "src/main/java".to_string() }
fn default_extractor_output() -> PathBuf { PathBuf::from("violations.json") }
