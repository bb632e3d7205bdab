//! Index run configuration.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Version of [`DEFAULT_IGNORES`]. Bump whenever the list changes.
pub const DEFAULT_IGNORES_VERSION: u32 = 1;

/// Built-in exclusion patterns.
///
/// Binary and media assets, version control metadata, engine caches and
/// import artifacts, build output, and the index's own output directory.
pub const DEFAULT_IGNORES: &[&str] = &[
    "**/.git/**",
    "**/.godot/**",
    "**/.import/**",
    ".export/**",
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.mp3",
    "*.ogg",
    "*.wav",
    "*.mp4",
    "*.avi",
    "*.zip",
    "*.7z",
    "*.tar",
    "*.rar",
    "*.log",
    "*.tmp",
    "*.cache",
    "*.import",
    "*.translation",
    "*.mo",
    "*.mono/**",
    "mono/**",
    "bin/**",
    "build/**",
    "addons/asset*/**",
    "_cw_index/**",
];

/// Name of the project-local ignore file.
pub const DEFAULT_IGNORE_FILE: &str = ".indexignore";

/// Output directory used when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "_cw_index";

/// Subdirectory of the output directory holding the loose index files.
pub const INDEX_SUBDIR: &str = "index";

/// Bundle archive, written next to `index/`.
pub const BUNDLE_FILE: &str = "index_bundle.zip";

/// Configuration for one indexing run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct IndexConfig {
    /// Root directory to index.
    pub root: PathBuf,

    /// Directory receiving `index/` and the bundle.
    pub output_dir: PathBuf,

    /// Built-in exclusion patterns.
    #[builder(default = "default_ignores()")]
    #[serde(default = "default_ignores")]
    pub default_ignores: Vec<String>,

    /// Extra exclusion patterns for this run only.
    #[builder(default)]
    #[serde(default)]
    pub extra_ignores: Vec<String>,

    /// Name of the ignore file read from the root (None = don't read one).
    #[builder(default = "Some(DEFAULT_IGNORE_FILE.to_string())")]
    #[serde(default = "default_ignore_file")]
    pub ignore_file: Option<String>,

    /// Number of extraction threads (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

fn default_ignores() -> Vec<String> {
    DEFAULT_IGNORES.iter().map(|p| p.to_string()).collect()
}

fn default_ignore_file() -> Option<String> {
    Some(DEFAULT_IGNORE_FILE.to_string())
}

impl IndexConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                Err("Root path cannot be empty".to_string())
            }
            Some(_) => Ok(()),
            None => Err("Root path is required".to_string()),
        }
    }
}

impl IndexConfig {
    /// Create a new config builder.
    pub fn builder() -> IndexConfigBuilder {
        IndexConfigBuilder::default()
    }

    /// Create a config indexing `root` into `output_dir` with default rules.
    pub fn new(root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_dir: output_dir.into(),
            default_ignores: default_ignores(),
            extra_ignores: Vec::new(),
            ignore_file: default_ignore_file(),
            threads: 0,
        }
    }

    /// Index `root` into `<root>/_cw_index`.
    pub fn in_place(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let output_dir = root.join(DEFAULT_OUTPUT_DIR);
        Self::new(root, output_dir)
    }

    /// Path of the `index/` subdirectory holding the loose output files.
    pub fn index_dir(&self) -> PathBuf {
        self.output_dir.join(INDEX_SUBDIR)
    }

    /// Path of the ignore file, if one is configured.
    pub fn ignore_file_path(&self) -> Option<PathBuf> {
        self.ignore_file.as_deref().map(|name| self.root.join(name))
    }

    /// Root-relative patterns covering what a run writes inside the root.
    ///
    /// Empty when the output directory lies outside the root. When it is the
    /// root itself, only the index directory and the bundle are covered.
    pub fn output_exclusions(&self) -> Vec<String> {
        let Ok(rel) = self.output_dir.strip_prefix(&self.root) else {
            return Vec::new();
        };
        let rel = rel.to_string_lossy().replace('\\', "/");
        if rel.is_empty() {
            vec![format!("{INDEX_SUBDIR}/**"), BUNDLE_FILE.to_string()]
        } else {
            vec![format!("{rel}/**")]
        }
    }
}
