use crate::core::error::{Error, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads the document at `path`, returning `None` when it does not exist.
/// Content is returned as raw bytes; decoding is left to the caller.
pub fn read_document(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No document at {}", path.display());
            Ok(None)
        }
        Err(e) => Err(io_error(path, e)),
    }
}

/// Replaces the document at `path` with `contents`.
///
/// The bytes are written to a temp file next to the destination, synced and
/// then renamed over it, so readers only ever see the old or the new content.
/// The temp file is removed if any step fails.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| io_error(parent, e))?;
    temp.write_all(contents)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| io_error(temp.path(), e))?;

    temp.persist(path).map_err(|e| io_error(path, e.error))?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
