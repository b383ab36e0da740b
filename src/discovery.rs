// src/discovery.rs
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never descended into.
pub const PRUNE_DIRS: &[&str] = &["node_modules", ".git", "dist", "target", ".angular"];

#[must_use]
pub fn should_prune(name: &str) -> bool {
    PRUNE_DIRS.contains(&name)
}

/// Lists every `.ts` file under `<root>/<base_path>/<module>` for each module
/// directory that exists. Missing module directories are skipped.
#[must_use]
pub fn discover_sources(root: &Path, base_path: &str, modules: &[String]) -> Vec<PathBuf> {
    let base = root.join(base_path);
    let mut files = Vec::new();
    let mut errors = 0;

    for module in modules {
        let dir = base.join(module);
        if !dir.is_dir() {
            tracing::debug!("Module directory {} does not exist", dir.display());
            continue;
        }
        let (mut paths, error_count) = walk_dir(&dir);
        files.append(&mut paths);
        errors += error_count;
    }

    if errors > 0 {
        tracing::warn!("Encountered {errors} errors during file walk");
    }
    files
}

fn walk_dir(dir: &Path) -> (Vec<PathBuf>, usize) {
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !should_prune(&e.file_name().to_string_lossy()));

    accumulate_walker(walker)
}

fn accumulate_walker<I>(walker: I) -> (Vec<PathBuf>, usize)
where
    I: Iterator<Item = walkdir::Result<walkdir::DirEntry>>,
{
    let mut paths = Vec::new();
    let mut errors = 0;
    for item in walker {
        match item {
            Ok(entry) => {
                if entry.file_type().is_file() && is_typescript(entry.path()) {
                    paths.push(entry.into_path());
                }
            }
            Err(_) => errors += 1,
        }
    }
    (paths, errors)
}

fn is_typescript(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "ts")
}

/// Normalizes a path to use forward slashes (cross-platform pattern matching).
#[must_use]
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discovers_only_module_typescript() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        let app = dir.path().join("src/app");
        fs::create_dir_all(app.join("core/util"))?;
        fs::create_dir_all(app.join("core/node_modules/pkg"))?;
        fs::create_dir_all(app.join("other"))?;
        fs::write(app.join("core/a.component.ts"), "")?;
        fs::write(app.join("core/util/b.ts"), "")?;
        fs::write(app.join("core/a.component.html"), "")?;
        fs::write(app.join("core/node_modules/pkg/index.ts"), "")?;
        fs::write(app.join("other/c.ts"), "")?;

        let modules = vec!["core".to_string(), "missing".to_string()];
        let mut found: Vec<String> = discover_sources(dir.path(), "src/app", &modules)
            .iter()
            .map(|p| normalize_path(p))
            .collect();
        found.sort();

        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("core/a.component.ts"));
        assert!(found[1].ends_with("core/util/b.ts"));
        Ok(())
    }
}
