//! Glob-based exclusion rules.
//!
//! Patterns come from three places: the built-in defaults carried by
//! [`IndexConfig`], the project-local ignore file, and per-run extras. All
//! patterns are matched against forward-slash paths relative to the indexed
//! root. A `*` also matches across `/`, so `*.png` excludes PNGs at any depth.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use gdindex_core::{IndexConfig, IndexError, IndexWarning};

/// Compiled exclusion rules.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    patterns: Vec<String>,
    files: GlobSet,
    dirs: GlobSet,
    warnings: Vec<IndexWarning>,
}

impl IgnoreRules {
    /// Build rules for a run: defaults, ignore file, extras, and whatever the
    /// run itself writes under the root.
    pub fn from_config(config: &IndexConfig) -> Result<Self, IndexError> {
        let mut sources: Vec<(PathBuf, String)> = Vec::new();

        for pattern in &config.default_ignores {
            sources.push((PathBuf::from("<defaults>"), pattern.clone()));
        }

        if let Some(path) = config.ignore_file_path() {
            for pattern in load_ignore_file(&path)? {
                sources.push((path.clone(), pattern));
            }
        }

        for pattern in &config.extra_ignores {
            if let Some(pattern) = normalize_pattern(pattern) {
                sources.push((PathBuf::from("<extra>"), pattern));
            }
        }

        for pattern in config.output_exclusions() {
            sources.push((PathBuf::from("<output>"), pattern));
        }

        Ok(Self::compile(sources))
    }

    /// Compile `(origin, pattern)` pairs. Patterns that fail to compile are
    /// dropped and recorded as warnings.
    pub fn compile(sources: impl IntoIterator<Item = (PathBuf, String)>) -> Self {
        let mut patterns = Vec::new();
        let mut warnings = Vec::new();
        let mut files = GlobSetBuilder::new();
        let mut dirs = GlobSetBuilder::new();

        for (origin, pattern) in sources {
            let glob = match Glob::new(&pattern) {
                Ok(glob) => glob,
                Err(err) => {
                    tracing::debug!(pattern = %pattern, error = %err, "dropping ignore pattern");
                    warnings.push(IndexWarning::invalid_pattern(
                        origin,
                        &pattern,
                        &err.to_string(),
                    ));
                    continue;
                }
            };

            // `dir/**` never matches `dir` itself; prune on the prefix too.
            if let Some(prefix) = pattern.strip_suffix("/**").filter(|p| !p.is_empty()) {
                if let Ok(dir_glob) = Glob::new(prefix) {
                    dirs.add(dir_glob);
                }
            }
            dirs.add(glob.clone());
            files.add(glob);
            patterns.push(pattern);
        }

        Self {
            patterns,
            files: files.build().unwrap_or_else(|_| GlobSet::empty()),
            dirs: dirs.build().unwrap_or_else(|_| GlobSet::empty()),
            warnings,
        }
    }

    /// Rules that ignore nothing.
    pub fn empty() -> Self {
        Self::compile(std::iter::empty())
    }

    /// Check if a relative path should be skipped.
    pub fn is_ignored(&self, rel_path: &str, is_dir: bool) -> bool {
        if is_dir {
            self.dirs.is_match(rel_path)
        } else {
            self.files.is_match(rel_path)
        }
    }

    /// Accepted patterns, in the order they were given.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Patterns rejected at compile time.
    pub fn warnings(&self) -> &[IndexWarning] {
        &self.warnings
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::empty()
    }
}

/// Normalize one ignore-file line into a pattern.
///
/// Blank lines and `#` comments yield `None`. A trailing `/` becomes a
/// recursive directory pattern and a leading `./` or `/` is dropped.
pub fn normalize_pattern(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let line = line.replace('\\', "/");
    let line = line.trim_start_matches("./").trim_start_matches('/');
    if line.is_empty() {
        return None;
    }

    if line.ends_with('/') {
        Some(format!("{line}**"))
    } else {
        Some(line.to_string())
    }
}

/// Parse ignore-file contents into patterns.
pub fn parse_ignore_file(text: &str) -> Vec<String> {
    text.lines().filter_map(normalize_pattern).collect()
}

/// Load patterns from an ignore file. A missing file yields no patterns.
pub fn load_ignore_file(path: &Path) -> Result<Vec<String>, IndexError> {
    match fs::read(path) {
        Ok(bytes) => Ok(parse_ignore_file(&String::from_utf8_lossy(&bytes))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(IndexError::io(path, err)),
    }
}
