//! Resolving the input (folder or zip archive) to a directory to index.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use gdindex_core::IndexError;

/// Scratch directory, under the output directory, that archives unpack into.
pub const SCRATCH_DIR: &str = "_unzipped";

/// Top-level archive entries skipped when locating the project root.
const METADATA_PREFIX: &str = "__MACOSX";

/// What to index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    /// A project directory on disk.
    Folder(PathBuf),
    /// A zip archive of a project.
    Archive(PathBuf),
}

impl IndexSource {
    /// Directory the indexer should walk.
    ///
    /// Archives are unpacked into `<output_dir>/_unzipped` first, replacing
    /// whatever a previous run left there.
    pub fn resolve_root(&self, output_dir: &Path) -> Result<PathBuf, IndexError> {
        match self {
            Self::Folder(path) => {
                let metadata = fs::metadata(path).map_err(|e| IndexError::io(path, e))?;
                if !metadata.is_dir() {
                    return Err(IndexError::NotADirectory { path: path.clone() });
                }
                Ok(path.clone())
            }
            Self::Archive(archive) => {
                let scratch = output_dir.join(SCRATCH_DIR);
                if scratch.exists() {
                    fs::remove_dir_all(&scratch).map_err(|e| IndexError::io(&scratch, e))?;
                }
                fs::create_dir_all(&scratch).map_err(|e| IndexError::io(&scratch, e))?;

                let count = extract_archive(archive, &scratch)?;
                let root = effective_root(&scratch)?;
                tracing::info!(
                    archive = %archive.display(),
                    files = count,
                    root = %root.display(),
                    "archive extracted"
                );
                Ok(root)
            }
        }
    }

    /// Path given by the operator.
    pub fn path(&self) -> &Path {
        match self {
            Self::Folder(path) | Self::Archive(path) => path,
        }
    }
}

/// Unpack `archive` into `dest`, returning the number of files written.
///
/// Entries whose names would escape `dest` are skipped.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<usize, IndexError> {
    let file = File::open(archive).map_err(|e| IndexError::io(archive, e))?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| IndexError::archive(archive, format!("Invalid or corrupt zip: {e}")))?;

    let mut count = 0;
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| IndexError::archive(archive, format!("Failed to read entry {i}: {e}")))?;

        let entry_path = match entry.enclosed_name() {
            Some(p) => p.to_path_buf(),
            None => {
                tracing::warn!(entry = entry.name(), "skipping archive entry with unsafe path");
                continue;
            }
        };

        let output_path = dest.join(&entry_path);
        if entry.is_dir() {
            fs::create_dir_all(&output_path).map_err(|e| IndexError::io(&output_path, e))?;
        } else {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent).map_err(|e| IndexError::io(parent, e))?;
            }
            let mut outfile =
                File::create(&output_path).map_err(|e| IndexError::io(&output_path, e))?;
            io::copy(&mut entry, &mut outfile).map_err(|e| IndexError::io(&output_path, e))?;
            count += 1;
        }
    }

    Ok(count)
}

/// The single top-level directory of `scratch`, or `scratch` itself when
/// there are several top-level entries.
pub fn effective_root(scratch: &Path) -> Result<PathBuf, IndexError> {
    let entries: Vec<PathBuf> = fs::read_dir(scratch)
        .map_err(|e| IndexError::io(scratch, e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with(METADATA_PREFIX))
        .map(|entry| entry.path())
        .collect();

    match entries.as_slice() {
        [only] if only.is_dir() => Ok(only.clone()),
        _ => Ok(scratch.to_path_buf()),
    }
}
