use super::parse::parse_source;
use super::{SourceFile, SourceIndex};
use crate::discovery::{discover_sources, normalize_path};
use std::fs;
use std::path::{Path, PathBuf};

/// The client source tree of a checkout, parsed lazily file by file.
#[derive(Debug, Clone)]
pub struct TsProject {
    root: PathBuf,
    base_path: String,
    modules: Vec<String>,
}

impl TsProject {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_path: &str, modules: &[String]) -> Self {
        Self {
            root: root.into(),
            base_path: base_path.to_string(),
            modules: modules.to_vec(),
        }
    }

    fn load(path: &Path) -> Option<SourceFile> {
        let shown = normalize_path(path);
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Skipping unreadable file {shown}: {e}");
                return None;
            }
        };
        let parsed = parse_source(&shown, &content);
        if parsed.is_none() {
            tracing::warn!("Skipping unparseable file {shown}");
        }
        parsed
    }
}

impl SourceIndex for TsProject {
    fn files(&self) -> Box<dyn Iterator<Item = SourceFile> + '_> {
        let paths = discover_sources(&self.root, &self.base_path, &self.modules);
        tracing::debug!("Discovered {} source files", paths.len());
        Box::new(paths.into_iter().filter_map(|p| Self::load(&p)))
    }
}
