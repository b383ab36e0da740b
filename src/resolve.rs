//! Mapping of file paths to their owning module.
//!
//! Default behaviour is raw substring containment of `"<base>/<module>"` in
//! the file path, first configured module wins, so a module named `core` also
//! claims `.../app/corelib/...`. `Resolution::Segment` requires an exact path
//! segment instead.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    #[default]
    Substring,
    Segment,
}

/// Returns the first module whose `"<base_path>/<module>"` occurs in `file_path`.
#[must_use]
pub fn resolve<'m>(file_path: &str, base_path: &str, modules: &'m [String]) -> Option<&'m str> {
    let path = file_path.replace('\\', "/");
    let base = trim_slashes(base_path);
    modules
        .iter()
        .find(|module| path.contains(&join(&base, module)))
        .map(String::as_str)
}

/// Like [`resolve`] but the module must be a whole path segment directly
/// after the base path segments.
#[must_use]
pub fn resolve_segment<'m>(
    file_path: &str,
    base_path: &str,
    modules: &'m [String],
) -> Option<&'m str> {
    let path = file_path.replace('\\', "/");
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let base = trim_slashes(base_path);
    let base_segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();

    let owner = segments
        .windows(base_segments.len() + 1)
        .find(|w| w[..base_segments.len()] == base_segments[..])
        .and_then(|w| w.last().copied())?;

    modules
        .iter()
        .find(|module| module.as_str() == owner)
        .map(String::as_str)
}

fn trim_slashes(s: &str) -> String {
    s.replace('\\', "/").trim_matches('/').to_string()
}

fn join(base: &str, module: &str) -> String {
    if base.is_empty() {
        module.to_string()
    } else {
        format!("{base}/{module}")
    }
}

/// Fixed module list plus the resolution strategy, built once per run.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    base_path: String,
    modules: Vec<String>,
    mode: Resolution,
}

impl ModuleResolver {
    #[must_use]
    pub fn new(base_path: &str, modules: &[String], mode: Resolution) -> Self {
        Self {
            base_path: base_path.to_string(),
            modules: modules.to_vec(),
            mode,
        }
    }

    #[must_use]
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    #[must_use]
    pub fn resolve(&self, file_path: &str) -> Option<&str> {
        match self.mode {
            Resolution::Substring => resolve(file_path, &self.base_path, &self.modules),
            Resolution::Segment => resolve_segment(file_path, &self.base_path, &self.modules),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "src/main/webapp/app";

    fn mods(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_resolves_by_containment() {
        let modules = mods(&["admin", "core"]);
        assert_eq!(
            resolve("/repo/src/main/webapp/app/core/auth/x.ts", BASE, &modules),
            Some("core")
        );
        assert_eq!(resolve("/repo/src/test/core/x.ts", BASE, &modules), None);
    }

    #[test]
    fn test_first_match_wins_in_configured_order() {
        let path = "/repo/src/main/webapp/app/corelib/x.ts";

        let core_first = mods(&["core", "corelib"]);
        assert_eq!(resolve(path, BASE, &core_first), Some("core"));

        let corelib_first = mods(&["corelib", "core"]);
        assert_eq!(resolve(path, BASE, &corelib_first), Some("corelib"));
    }

    #[test]
    fn test_segment_mode_requires_exact_segment() {
        let path = "/repo/src/main/webapp/app/corelib/x.ts";
        let modules = mods(&["core", "corelib"]);
        assert_eq!(resolve_segment(path, BASE, &modules), Some("corelib"));

        let only_core = mods(&["core"]);
        assert_eq!(resolve_segment(path, BASE, &only_core), None);
        assert_eq!(
            resolve_segment("/repo/src/main/webapp/app/core/x.ts", BASE, &only_core),
            Some("core")
        );
    }

    #[test]
    fn test_windows_separators() {
        let modules = mods(&["shared"]);
        assert_eq!(
            resolve(r"C:\repo\src\main\webapp\app\shared\x.ts", BASE, &modules),
            Some("shared")
        );
    }

    #[test]
    fn test_resolver_dispatches_on_mode() {
        let modules = mods(&["core"]);
        let path = "/r/src/main/webapp/app/corelib/x.ts";
        let substring = ModuleResolver::new(BASE, &modules, Resolution::Substring);
        let segment = ModuleResolver::new(BASE, &modules, Resolution::Segment);
        assert_eq!(substring.resolve(path), Some("core"));
        assert_eq!(segment.resolve(path), None);
    }
}
