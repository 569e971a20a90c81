//! Disk I/O helpers: whole-file load and atomic write.
//!
//! The rename-over approach is close to atomic on most platforms. On NTFS
//! (Windows) it's reliable; on FAT32 or network shares there are no hard
//! guarantees. If that matters to you, keep backups or use a real database.

use crate::error::{Error, Result};
use crate::store::Database;
use std::io::Write;
use std::path::Path;

/// Reads and parses the backing file at `path`.
///
/// A missing file is not an error: it is created containing `{}` and an empty
/// database is returned. Creation uses create-new (`O_CREAT | O_EXCL`)
/// semantics, so exactly one of any number of concurrent first readers
/// creates the file and the rest re-read what the winner wrote.
pub fn load(path: &Path) -> Result<Database> {
    match std::fs::read(path) {
        Ok(bytes) => parse(&bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => init(path),
        Err(e) => Err(Error::Io(e.to_string())),
    }
}

fn parse(bytes: &[u8]) -> Result<Database> {
    // An empty file also covers the window where the creating caller has
    // opened the file but not yet written `{}`.
    if bytes.is_empty() {
        return Ok(Database::new());
    }
    serde_json::from_slice(bytes).map_err(Error::from)
}

fn init(path: &Path) -> Result<Database> {
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(mut file) => {
            file.write_all(b"{}").map_err(|e| Error::Io(e.to_string()))?;
            Ok(Database::new())
        }
        // Lost the creation race; the winner's contents are authoritative.
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            let bytes = std::fs::read(path).map_err(|e| Error::Io(e.to_string()))?;
            parse(&bytes)
        }
        Err(e) => Err(Error::Io(e.to_string())),
    }
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`. This avoids
/// leaving a half-written file if the process crashes mid-write, and keeps
/// concurrent readers from ever observing a partial database.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));
    std::fs::write(&tmp, bytes).map_err(|e| Error::Io(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| Error::Io(e.to_string()))?;
    Ok(())
}
