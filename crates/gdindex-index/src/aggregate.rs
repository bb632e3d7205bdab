//! Aggregation of per-file records into the six output collections.

use serde::{Deserialize, Serialize};

use gdindex_core::{
    ContentKind, DecodeStatus, ImportEdge, ManifestEntry, SceneGraph, ScriptSymbols, StringEntry,
    TodoEntry,
};
use gdindex_extract::FileExtraction;

/// Everything produced for one file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub manifest: ManifestEntry,
    pub extraction: FileExtraction,
}

/// The collections of one run, in file-discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCollections {
    pub manifest: Vec<ManifestEntry>,
    pub symbols: Vec<ScriptSymbols>,
    pub scenes: Vec<SceneGraph>,
    pub strings: Vec<StringEntry>,
    /// Only scripts with at least one reference.
    pub imports: Vec<ImportEdge>,
    pub todos: Vec<TodoEntry>,
}

impl IndexCollections {
    /// Create empty collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one file's records. Nothing is merged or deduplicated.
    pub fn push(&mut self, record: FileRecord) {
        let FileRecord {
            manifest,
            extraction,
        } = record;

        self.manifest.push(manifest);
        self.symbols.extend(extraction.symbols);
        self.scenes.extend(extraction.scene);
        self.strings.extend(extraction.strings);
        self.imports.extend(extraction.imports);
        self.todos.extend(extraction.todos);
    }

    /// Stable-sort every collection by file path.
    ///
    /// Records of the same file keep their in-file order, so output is
    /// reproducible regardless of traversal or worker completion order.
    pub fn sort_by_path(&mut self) {
        self.manifest.sort_by(|a, b| a.path.cmp(&b.path));
        self.symbols.sort_by(|a, b| a.file.cmp(&b.file));
        self.scenes.sort_by(|a, b| a.file.cmp(&b.file));
        self.strings.sort_by(|a, b| a.path.cmp(&b.path));
        self.imports.sort_by(|a, b| a.from.cmp(&b.from));
        self.todos.sort_by(|a, b| a.path.cmp(&b.path));
    }

    /// Number of indexed files.
    pub fn file_count(&self) -> usize {
        self.manifest.len()
    }

    /// Number of indexed files of `kind`.
    pub fn count_kind(&self, kind: ContentKind) -> usize {
        self.manifest.iter().filter(|m| m.kind == kind).count()
    }

    /// Total size of all indexed files in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.manifest.iter().map(|m| m.size).sum()
    }

    /// Number of files whose bytes could not be decoded as text.
    pub fn undecodable_count(&self) -> usize {
        self.manifest
            .iter()
            .filter(|m| m.decode == DecodeStatus::Undecodable)
            .count()
    }

    /// Scripts that declare a `class_name`.
    pub fn named_classes(&self) -> impl Iterator<Item = &ScriptSymbols> {
        self.symbols.iter().filter(|s| s.class_name.is_some())
    }
}

impl FromIterator<FileRecord> for IndexCollections {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut collections = Self::new();
        for record in iter {
            collections.push(record);
        }
        collections
    }
}
