//! Workspace cleanup before and after a run.

use crate::error::Result;
use crate::output::write_line;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::{self, Write};

/// Remove every entry of `dist` except the file named `keep`.
///
/// Subdirectories are removed with their contents. A missing `dist` is left
/// missing. Returns the names removed, in sorted order.
///
/// # Errors
///
/// Returns [`crate::error::PackagerError::Io`] if the directory cannot be
/// listed or an entry cannot be removed.
pub fn clean_dist(dist: &Utf8Path, keep: &str, out: &mut dyn Write) -> Result<Vec<String>> {
    let entries = match dist.read_dir_utf8() {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::debug!("dist directory {dist} does not exist yet; nothing to clean");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };

    let mut stale = entries
        .map(|entry| entry.map(|entry| (entry.file_name().to_owned(), entry.path().to_owned())))
        .collect::<io::Result<Vec<_>>>()?;
    stale.retain(|(name, _)| name != keep);
    stale.sort();

    let mut removed = Vec::with_capacity(stale.len());
    for (name, path) in stale {
        if path.symlink_metadata()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        write_line(out, format!("Deleted old build file: {name}"));
        removed.push(name);
    }
    Ok(removed)
}

/// Remove the build tool's intermediate directories.
///
/// Directories that do not exist are skipped. Returns the directories that
/// were removed.
///
/// # Errors
///
/// Returns [`crate::error::PackagerError::Io`] for any failure other than a
/// directory being absent.
pub fn clean_build_artifacts(
    dirs: &[Utf8PathBuf],
    out: &mut dyn Write,
) -> Result<Vec<Utf8PathBuf>> {
    let mut removed = Vec::new();
    for dir in dirs {
        match fs::remove_dir_all(dir) {
            Ok(()) => {
                write_line(out, format!("Removed {dir}"));
                removed.push(dir.clone());
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("{dir} already absent");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(removed)
}
