//! Indexing pipeline for gdindex.
//!
//! Ties the scanner and extractors together:
//!
//! - [`Indexer`] walks a project, hashes and extracts every file on a rayon
//!   pool, and aggregates the results into [`IndexCollections`]
//! - [`render_report`] renders the markdown digest
//! - [`publish`] writes the JSON collections, the report and the bundle
//! - [`IndexSource`] turns a folder or zip archive into a root to index
//!
//! # Example
//!
//! ```rust,no_run
//! use gdindex_core::IndexConfig;
//! use gdindex_index::index_and_publish;
//!
//! let config = IndexConfig::in_place("/path/to/project");
//! let outcome = index_and_publish(&config).unwrap();
//! println!("{}", outcome.published.bundle_path.display());
//! ```

mod aggregate;
mod indexer;
mod publish;
mod report;
mod source;

pub use aggregate::{FileRecord, IndexCollections};
pub use indexer::{IndexRun, Indexer, MAX_DECODE_BYTES};
pub use gdindex_core::{BUNDLE_FILE, INDEX_SUBDIR};
pub use publish::{
    IMPORTS_FILE, MANIFEST_FILE, PublishedIndex, REPORT_FILE, SCENES_FILE, STRINGS_FILE,
    SYMBOLS_FILE, TODOS_FILE, publish,
};
pub use report::{MAX_CLASS_ENTRIES, MAX_TODO_ENTRIES, render_report};
pub use source::{IndexSource, SCRATCH_DIR, effective_root, extract_archive};

use chrono::Utc;

use gdindex_core::{IndexConfig, IndexError};

/// Result of indexing and publishing one project.
#[derive(Debug)]
pub struct IndexOutcome {
    pub run: IndexRun,
    pub published: PublishedIndex,
}

/// Index `config.root` and publish the results under `config.output_dir`.
pub fn index_and_publish(config: &IndexConfig) -> Result<IndexOutcome, IndexError> {
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| IndexError::io(&config.output_dir, e))?;

    let run = Indexer::new(config.clone()).run()?;
    let report = render_report(&run.collections, Utc::now(), &run.warnings);
    let published = publish(&run.collections, &report, &config.output_dir)?;

    Ok(IndexOutcome { run, published })
}
