//! BLAKE3 content digests.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use blake3::Hasher;

use gdindex_core::{ContentDigest, IndexError};

/// Digest of an in-memory buffer.
pub fn hash_bytes(bytes: &[u8]) -> ContentDigest {
    ContentDigest::new(*blake3::hash(bytes).as_bytes())
}

/// Digest of a file, read in fixed-size chunks.
pub fn hash_file(path: &Path) -> Result<ContentDigest, IndexError> {
    let mut file = File::open(path).map_err(|e| IndexError::io(path, e))?;
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| IndexError::io(path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(ContentDigest::new(*hasher.finalize().as_bytes()))
}
