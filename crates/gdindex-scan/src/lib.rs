//! File discovery for gdindex.
//!
//! This crate decides which files an indexing run looks at and fingerprints
//! their contents:
//!
//! - **Ignore rules** compiled from defaults, the project's `.indexignore`
//!   and per-run extras via globset
//! - **Walking** via jwalk, pruning ignored directories before they are read
//! - **Digests** of raw file bytes via BLAKE3
//!
//! # Example
//!
//! ```rust,no_run
//! use gdindex_core::IndexConfig;
//! use gdindex_scan::{FileWalker, IgnoreRules};
//!
//! let config = IndexConfig::in_place("/path/to/project");
//! let rules = IgnoreRules::from_config(&config).unwrap();
//! let outcome = FileWalker::new(rules).walk(&config.root).unwrap();
//!
//! for file in &outcome.files {
//!     println!("{}", file.rel_path);
//! }
//! ```

mod digest;
mod ignore;
mod walker;

pub use digest::{hash_bytes, hash_file};
pub use ignore::{IgnoreRules, load_ignore_file, normalize_pattern, parse_ignore_file};
pub use walker::{FileWalker, WalkOutcome, WalkedFile, relative_path};
