//! Whole-file JSON persistence shared by the drink log and reminder stores.
//!
//! Writes go to a temp file in the target directory which is synced and then
//! renamed over the original, so readers see either the old or the new
//! contents. Concurrent writers still race: the last rename wins.

use crate::{Error, Result};
use fs2::FileExt;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read a file's contents under a shared lock
///
/// Missing files surface as `io::ErrorKind::NotFound`.
pub(crate) fn read_locked(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    io::BufReader::new(&file).read_to_string(&mut contents)?;

    // Closing the descriptor releases the lock
    drop(file);
    Ok(contents)
}

/// Serialize `value` and atomically replace `path` with it
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = parent_dir(path);
    std::fs::create_dir_all(&dir)?;

    // Same directory as the target so the rename stays on one filesystem
    let temp = NamedTempFile::new_in(&dir)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = io::BufWriter::new(temp.as_file());
        serde_json::to_writer(&mut writer, value)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
