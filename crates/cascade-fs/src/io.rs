//! Text I/O helpers

use std::fs;

use crate::{Error, NormalizedPath, Result};

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// List the regular files directly inside a directory, sorted by name.
///
/// Hidden entries (leading `.`) are skipped.
pub fn list_files(dir: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let native_dir = dir.to_native();
    let entries = fs::read_dir(&native_dir).map_err(|e| Error::io(&native_dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native_dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            files.push(NormalizedPath::new(path));
        }
    }
    files.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    Ok(files)
}
