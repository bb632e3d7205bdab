//! Parallel indexing pipeline: walk, hash, decode, extract, aggregate.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use gdindex_core::{
    ContentKind, DecodeStatus, IndexConfig, IndexError, IndexWarning, ManifestEntry, WarningKind,
};
use gdindex_extract::{FileExtraction, decode_text, extract_file};
use gdindex_scan::{FileWalker, IgnoreRules, WalkedFile, hash_bytes, hash_file};

use crate::aggregate::{FileRecord, IndexCollections};

/// Files of unrecognised kind above this size are hashed but not decoded.
pub const MAX_DECODE_BYTES: u64 = 1024 * 1024;

/// Result of one indexing run, before anything is written.
#[derive(Debug)]
pub struct IndexRun {
    /// Canonical root that was indexed.
    pub root: PathBuf,
    /// Aggregated collections, sorted by path.
    pub collections: IndexCollections,
    /// Non-fatal problems collected along the way.
    pub warnings: Vec<IndexWarning>,
    /// Number of directories skipped by ignore rules.
    pub pruned_dirs: usize,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

/// Runs the indexing pipeline for one configuration.
pub struct Indexer {
    config: IndexConfig,
}

impl Indexer {
    /// Create an indexer for `config`.
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    /// Index the configured root.
    ///
    /// Per-file work runs on a rayon pool. Results are collected in walk
    /// order, so output does not depend on worker scheduling.
    pub fn run(&self) -> Result<IndexRun, IndexError> {
        let start = Instant::now();
        let root = self
            .config
            .root
            .canonicalize()
            .map_err(|e| IndexError::io(&self.config.root, e))?;

        let rules = IgnoreRules::from_config(&self.config)?;
        let mut warnings = rules.warnings().to_vec();
        for warning in &warnings {
            tracing::warn!(source = %warning.path.display(), "{}", warning.message);
        }

        let walker = FileWalker::new(rules).with_threads(self.config.threads);
        let outcome = walker.walk(&root)?;
        warnings.extend(outcome.warnings);

        let records = self.process_files(&outcome.files)?;

        for record in &records {
            if record.manifest.decode == DecodeStatus::Undecodable {
                tracing::warn!(path = %record.manifest.path, "file is not decodable text");
                warnings.push(IndexWarning::new(
                    &record.manifest.path,
                    "File is not valid UTF-8 or BOM-marked UTF-16; no metadata extracted",
                    WarningKind::DecodeFailed,
                ));
            }
        }

        let mut collections: IndexCollections = records.into_iter().collect();
        collections.sort_by_path();

        let elapsed = start.elapsed();
        tracing::info!(
            files = collections.file_count(),
            warnings = warnings.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "indexing complete"
        );

        Ok(IndexRun {
            root,
            collections,
            warnings,
            pruned_dirs: outcome.pruned_dirs,
            elapsed,
        })
    }

    /// Hash and extract every file, preserving input order.
    fn process_files(&self, files: &[WalkedFile]) -> Result<Vec<FileRecord>, IndexError> {
        let work = || {
            files
                .par_iter()
                .map(index_file)
                .collect::<Result<Vec<_>, _>>()
        };

        match self.config.threads {
            0 => work(),
            n => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| IndexError::InvalidConfig {
                        message: format!("Failed to build thread pool: {e}"),
                    })?;
                pool.install(work)
            }
        }
    }
}

/// Build the manifest entry and extraction for one file.
fn index_file(file: &WalkedFile) -> Result<FileRecord, IndexError> {
    let kind = ContentKind::from_path(&file.rel_path);
    let size = fs::metadata(&file.path)
        .map_err(|e| IndexError::io(&file.path, e))?
        .len();

    if kind == ContentKind::Other && size > MAX_DECODE_BYTES {
        tracing::debug!(path = %file.rel_path, size, "hashing large file without decoding");
        return Ok(FileRecord {
            manifest: ManifestEntry {
                path: file.rel_path.clone(),
                kind,
                size,
                digest: hash_file(&file.path)?,
                decode: DecodeStatus::Skipped,
            },
            extraction: FileExtraction::default(),
        });
    }

    let bytes = fs::read(&file.path).map_err(|e| IndexError::io(&file.path, e))?;
    let decoded = decode_text(&bytes);
    let extraction = if decoded.status.has_text() {
        extract_file(&file.rel_path, kind, &decoded.text)
    } else {
        FileExtraction::default()
    };

    tracing::debug!(
        path = %file.rel_path,
        kind = %kind,
        size = bytes.len(),
        decode = %decoded.status,
        "indexed file"
    );

    Ok(FileRecord {
        manifest: ManifestEntry {
            path: file.rel_path.clone(),
            kind,
            size: bytes.len() as u64,
            digest: hash_bytes(&bytes),
            decode: decoded.status,
        },
        extraction,
    })
}
