//! Core types and configuration for gdindex.
//!
//! This crate provides the data model shared by every stage of an indexing
//! run: the content classifier, the per-file records produced by the
//! extractors, the run configuration, and the error and warning types.

mod config;
mod error;
mod kind;
mod record;

pub use config::{
    BUNDLE_FILE, DEFAULT_IGNORE_FILE, DEFAULT_IGNORES, DEFAULT_IGNORES_VERSION,
    DEFAULT_OUTPUT_DIR, INDEX_SUBDIR, IndexConfig, IndexConfigBuilder,
};
pub use error::{IndexError, IndexWarning, WarningKind};
pub use kind::ContentKind;
pub use record::{
    Connection, ContentDigest, DecodeStatus, ImportEdge, ManifestEntry, SceneGraph, SceneNode,
    ScriptSymbols, StringEntry, StringOrigin, TodoEntry, TodoTag,
};
