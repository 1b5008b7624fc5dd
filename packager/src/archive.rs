//! Directory compression into `.tar.gz` or `.zip` archives.
//!
//! The container is chosen from the target filename alone. Every archive has
//! exactly one top-level directory, the root name, holding the source tree.
//! Entries are visited in sorted order and written without timestamps or
//! ownership, so compressing the same tree twice yields identical bytes.

use crate::error::{PackagerError, Result};
use camino::{Utf8Component, Utf8Path};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use walkdir::{DirEntry, WalkDir};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Archive container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ArchiveFormat {
    /// Gzip-compressed tarball.
    TarGz,
    /// Deflate-compressed zip archive.
    Zip,
}

impl ArchiveFormat {
    /// Filename extension, without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }

    /// Select the format from the suffix of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::UnsupportedArchiveFormat`] unless the
    /// filename ends in `.tar.gz` or `.zip` after a non-empty stem.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use redlines_packager::archive::ArchiveFormat;
    ///
    /// let format = ArchiveFormat::from_path(Utf8Path::new("dist/linux-x64-1.0.tar.gz"));
    /// assert_eq!(format.ok(), Some(ArchiveFormat::TarGz));
    /// assert!(ArchiveFormat::from_path(Utf8Path::new("dist/linux-x64-1.0.tar.bz2")).is_err());
    /// ```
    pub fn from_path(path: &Utf8Path) -> Result<Self> {
        let name = path.file_name().unwrap_or_default();
        [Self::TarGz, Self::Zip]
            .into_iter()
            .find(|format| {
                name.strip_suffix(format.extension())
                    .and_then(|stem| stem.strip_suffix('.'))
                    .is_some_and(|stem| !stem.is_empty())
            })
            .ok_or_else(|| PackagerError::UnsupportedArchiveFormat {
                path: path.to_owned(),
            })
    }
}

/// Compress the directory `source` into `target`.
///
/// The archive's single top-level directory is `root_name`, or the final
/// component of `source` when none is given. The format is checked before
/// anything is read or written, and the archive is assembled in a temporary
/// file beside `target` that only replaces `target` once complete.
///
/// # Errors
///
/// Returns [`PackagerError::UnsupportedArchiveFormat`] for an unknown suffix,
/// [`PackagerError::InvalidArchiveRoot`] if the root name is not a single
/// plain path component, or an I/O, walk or zip error if the tree cannot be
/// read or the archive cannot be written.
pub fn compress(source: &Utf8Path, target: &Utf8Path, root_name: Option<&str>) -> Result<()> {
    let format = ArchiveFormat::from_path(target)?;
    let root = match root_name {
        Some(name) => name,
        None => source.file_name().unwrap_or(source.as_str()),
    };
    validate_root_name(root)?;

    if !source.is_dir() {
        return Err(PackagerError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("archive source {source} is not a directory"),
        )));
    }

    let parent = target
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or(Utf8Path::new("."));
    let mut temp = archive_temp_file(parent)?;

    match format {
        ArchiveFormat::TarGz => write_tar_gz(source, root, temp.as_file_mut())?,
        ArchiveFormat::Zip => write_zip(source, root, temp.as_file_mut())?,
    }

    temp.persist(target).map_err(|err| PackagerError::Io(err.error))?;
    log::info!("wrote {} archive {target}", format.extension());
    Ok(())
}

/// Open the temporary file an archive is written to.
///
/// On unix it is created with mode `0o666`, which the process umask narrows
/// just as it would for a plainly created file.
fn archive_temp_file(dir: &Utf8Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

fn validate_root_name(name: &str) -> Result<()> {
    let mut components = Utf8Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(PackagerError::InvalidArchiveRoot {
            name: name.to_owned(),
        }),
    }
}

fn sorted_entries(source: &Utf8Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    WalkDir::new(source).follow_links(false).sort_by_file_name().into_iter()
}

/// Archive path of `entry`: the root followed by its `/`-joined path below
/// `source`.
fn entry_name(root: &str, source: &Utf8Path, entry: &DirEntry) -> Result<String> {
    let relative = entry
        .path()
        .strip_prefix(source.as_std_path())
        .map_err(io::Error::other)?;

    let mut name = root.to_owned();
    for component in relative.components() {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| non_utf8(entry.path()))?;
        name.push('/');
        name.push_str(part);
    }
    Ok(name)
}

fn non_utf8(path: &Path) -> PackagerError {
    PackagerError::NonUtf8Path {
        path: path.display().to_string(),
    }
}

fn write_tar_gz(source: &Utf8Path, root: &str, file: &mut File) -> Result<()> {
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.mode(tar::HeaderMode::Deterministic);
    builder.follow_symlinks(false);

    for entry in sorted_entries(source) {
        let entry = entry?;
        let name = entry_name(root, source, &entry)?;
        builder.append_path_with_name(entry.path(), &name)?;
    }

    builder.into_inner()?.finish()?;
    Ok(())
}

fn write_zip(source: &Utf8Path, root: &str, file: &mut File) -> Result<()> {
    let mut writer = zip::ZipWriter::new(file);
    let base = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    for entry in sorted_entries(source) {
        let entry = entry?;
        let name = entry_name(root, source, &entry)?;
        let options = with_permissions(base, &entry)?;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            writer.add_directory(name, options)?;
        } else if file_type.is_symlink() {
            let link = fs::read_link(entry.path())?;
            let link = link.to_str().ok_or_else(|| non_utf8(entry.path()))?;
            writer.add_symlink(name, link, options)?;
        } else {
            writer.start_file(name, options)?;
            io::copy(&mut File::open(entry.path())?, &mut writer)?;
        }
    }

    writer.finish()?;
    Ok(())
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, entry: &DirEntry) -> Result<SimpleFileOptions> {
    use std::os::unix::fs::PermissionsExt;

    let mode = entry.metadata()?.permissions().mode();
    Ok(options.unix_permissions(mode & 0o777))
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _entry: &DirEntry) -> Result<SimpleFileOptions> {
    Ok(options)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
