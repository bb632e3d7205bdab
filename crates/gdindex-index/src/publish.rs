//! Writing the index files and the bundle archive.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use gdindex_core::{BUNDLE_FILE, ContentDigest, INDEX_SUBDIR, IndexError};
use gdindex_scan::hash_file;

use crate::aggregate::IndexCollections;

/// Manifest of every indexed file.
pub const MANIFEST_FILE: &str = "manifest.json";
/// Per-script symbols.
pub const SYMBOLS_FILE: &str = "symbols.json";
/// Per-scene graphs.
pub const SCENES_FILE: &str = "scenes.json";
/// Localisation strings.
pub const STRINGS_FILE: &str = "strings.json";
/// Dependency edges.
pub const IMPORTS_FILE: &str = "imports.json";
/// TODO / FIXME / HACK notes.
pub const TODOS_FILE: &str = "docs_todos.json";
/// Markdown digest.
pub const REPORT_FILE: &str = "index_report.md";

/// What a publish wrote.
#[derive(Debug, Clone)]
pub struct PublishedIndex {
    /// Loose files written under `index/`.
    pub files: Vec<PathBuf>,
    /// Path of the bundle archive.
    pub bundle_path: PathBuf,
    /// Digest of the bundle archive.
    pub bundle_digest: ContentDigest,
}

/// Write the six collections and the report under `<output_dir>/index`, then
/// bundle them into `<output_dir>/index_bundle.zip`.
///
/// Existing files are overwritten. A failure leaves whatever was already
/// written in place.
pub fn publish(
    collections: &IndexCollections,
    report: &str,
    output_dir: &Path,
) -> Result<PublishedIndex, IndexError> {
    let index_dir = output_dir.join(INDEX_SUBDIR);
    fs::create_dir_all(&index_dir).map_err(|e| IndexError::io(&index_dir, e))?;

    let mut files = vec![
        write_json(&index_dir.join(MANIFEST_FILE), &collections.manifest)?,
        write_json(&index_dir.join(SYMBOLS_FILE), &collections.symbols)?,
        write_json(&index_dir.join(SCENES_FILE), &collections.scenes)?,
        write_json(&index_dir.join(STRINGS_FILE), &collections.strings)?,
        write_json(&index_dir.join(IMPORTS_FILE), &collections.imports)?,
        write_json(&index_dir.join(TODOS_FILE), &collections.todos)?,
    ];

    let report_path = index_dir.join(REPORT_FILE);
    fs::write(&report_path, report).map_err(|e| IndexError::io(&report_path, e))?;
    files.push(report_path);

    let bundle_path = output_dir.join(BUNDLE_FILE);
    write_bundle(&bundle_path, &index_dir)?;
    let bundle_digest = hash_file(&bundle_path)?;

    tracing::info!(
        bundle = %bundle_path.display(),
        digest = %bundle_digest,
        "index published"
    );

    Ok(PublishedIndex {
        files,
        bundle_path,
        bundle_digest,
    })
}

/// Serialize `value` as pretty-printed JSON to `path`.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf, IndexError> {
    let file = File::create(path).map_err(|e| IndexError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| IndexError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| IndexError::io(path, e))?;
    tracing::debug!(path = %path.display(), "wrote collection");
    Ok(path.to_path_buf())
}

/// Zip every regular file directly under `index_dir`, sorted by name, with
/// flat archive names.
fn write_bundle(bundle_path: &Path, index_dir: &Path) -> Result<(), IndexError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(index_dir)
        .map_err(|e| IndexError::io(index_dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let file = File::create(bundle_path).map_err(|e| IndexError::io(bundle_path, e))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &entries {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        writer
            .start_file(name, options)
            .map_err(|e| IndexError::archive(bundle_path, e))?;
        let mut source = File::open(path).map_err(|e| IndexError::io(path, e))?;
        io::copy(&mut source, &mut writer).map_err(|e| IndexError::io(bundle_path, e))?;
    }

    let mut inner = writer
        .finish()
        .map_err(|e| IndexError::archive(bundle_path, e))?;
    inner.flush().map_err(|e| IndexError::io(bundle_path, e))?;
    Ok(())
}
