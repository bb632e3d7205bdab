//! JWalk-based file walker with directory pruning.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use jwalk::{Parallelism, WalkDir};

use gdindex_core::{IndexError, IndexWarning, WarningKind};

use crate::ignore::IgnoreRules;

/// A file selected for indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Forward-slash path relative to the walk root.
    pub rel_path: String,
}

/// Result of a walk.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Files that survived the ignore rules, sorted by relative path.
    pub files: Vec<WalkedFile>,
    /// Entries that could not be enumerated.
    pub warnings: Vec<IndexWarning>,
    /// Number of directories skipped without descending.
    pub pruned_dirs: usize,
}

/// Recursive walker that prunes ignored directories before descending.
pub struct FileWalker {
    rules: Arc<IgnoreRules>,
    threads: usize,
}

impl FileWalker {
    /// Create a walker using the given rules.
    pub fn new(rules: IgnoreRules) -> Self {
        Self {
            rules: Arc::new(rules),
            threads: 0,
        }
    }

    /// Set the number of threads used for directory reads (0 = auto-detect).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Walk `root` and collect every non-ignored file.
    pub fn walk(&self, root: &Path) -> Result<WalkOutcome, IndexError> {
        let root = root.canonicalize().map_err(|e| IndexError::io(root, e))?;
        if !root.is_dir() {
            return Err(IndexError::NotADirectory { path: root });
        }

        let parallelism = match self.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: std::time::Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        let pruned = Arc::new(AtomicUsize::new(0));
        let rules = Arc::clone(&self.rules);
        let base = root.clone();
        let pruned_counter = Arc::clone(&pruned);

        // Children removed here are never yielded and never read.
        let walker = WalkDir::new(&root)
            .parallelism(parallelism)
            .skip_hidden(false)
            .follow_links(false)
            .sort(true)
            .process_read_dir(move |_depth, _dir, _state, children| {
                children.retain(|entry_result| {
                    let Ok(entry) = entry_result else {
                        return true;
                    };
                    let rel = relative_path(&base, &entry.path());
                    let is_dir = entry.file_type().is_dir();
                    if !rules.is_ignored(&rel, is_dir) {
                        return true;
                    }
                    if is_dir {
                        tracing::debug!(dir = %rel, "pruning ignored directory");
                        pruned_counter.fetch_add(1, Ordering::Relaxed);
                    }
                    false
                });
            });

        let mut outcome = WalkOutcome::default();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    tracing::warn!(path = %path.display(), error = %err, "walk error");
                    outcome.warnings.push(IndexWarning::new(
                        path,
                        err.to_string(),
                        WarningKind::WalkError,
                    ));
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let path = entry.path();
            let file_type = entry.file_type();
            let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
            if !is_file {
                continue;
            }

            let rel_path = relative_path(&root, &path);
            outcome.files.push(WalkedFile { path, rel_path });
        }

        outcome.files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        outcome.pruned_dirs = pruned.load(Ordering::Relaxed);

        tracing::info!(
            root = %root.display(),
            files = outcome.files.len(),
            pruned = outcome.pruned_dirs,
            "walk complete"
        );

        Ok(outcome)
    }
}

/// Forward-slash form of `path` relative to `root`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("scripts/enemies")).unwrap();
        fs::create_dir_all(root.join(".godot/imported")).unwrap();
        fs::create_dir_all(root.join("art")).unwrap();

        fs::write(root.join("project.godot"), "[application]").unwrap();
        fs::write(root.join("scripts/player.gd"), "extends Node2D").unwrap();
        fs::write(root.join("scripts/enemies/slime.gd"), "extends Node2D").unwrap();
        fs::write(root.join(".godot/imported/cache.md"), "# cached").unwrap();
        fs::write(root.join("art/hero.png"), [0u8, 1, 2]).unwrap();
        fs::write(root.join("art/notes.md"), "# art").unwrap();

        temp
    }

    fn rules(patterns: &[&str]) -> IgnoreRules {
        IgnoreRules::compile(
            patterns
                .iter()
                .map(|p| (PathBuf::from("<test>"), p.to_string())),
        )
    }

    fn rel_paths(outcome: &WalkOutcome) -> Vec<&str> {
        outcome.files.iter().map(|f| f.rel_path.as_str()).collect()
    }

    #[test]
    fn test_walk_without_rules() {
        let temp = create_test_tree();
        let outcome = FileWalker::new(IgnoreRules::empty())
            .walk(temp.path())
            .unwrap();

        assert_eq!(outcome.files.len(), 6);
        assert_eq!(outcome.pruned_dirs, 0);
    }

    #[test]
    fn test_walk_is_sorted() {
        let temp = create_test_tree();
        let outcome = FileWalker::new(IgnoreRules::empty())
            .walk(temp.path())
            .unwrap();

        let paths = rel_paths(&outcome);
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn test_walk_prunes_and_filters() {
        let temp = create_test_tree();
        let outcome = FileWalker::new(rules(&["**/.godot/**", "*.png"]))
            .walk(temp.path())
            .unwrap();

        assert_eq!(
            rel_paths(&outcome),
            vec![
                "art/notes.md",
                "project.godot",
                "scripts/enemies/slime.gd",
                "scripts/player.gd",
            ]
        );
        assert_eq!(outcome.pruned_dirs, 1);
    }

    #[test]
    fn test_pruned_dir_hides_unmatched_descendants() {
        let temp = create_test_tree();
        // `scripts` matches, `scripts/player.gd` would not match on its own.
        let outcome = FileWalker::new(rules(&["scripts"]))
            .walk(temp.path())
            .unwrap();

        assert!(rel_paths(&outcome).iter().all(|p| !p.starts_with("scripts/")));
    }

    #[test]
    fn test_walk_rejects_file_root() {
        let temp = create_test_tree();
        let result = FileWalker::new(IgnoreRules::empty()).walk(&temp.path().join("project.godot"));
        assert!(matches!(result, Err(IndexError::NotADirectory { .. })));
    }

    #[test]
    fn test_walk_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = FileWalker::new(IgnoreRules::empty()).walk(&temp.path().join("missing"));
        assert!(matches!(result, Err(IndexError::NotFound { .. })));
    }
}
