//! Test support utilities for packager integration tests.
//!
//! Provides a throwaway repository laid out like the redlines checkout and
//! helpers for reading archives back.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::GzDecoder;
use redlines_packager::config::PackagerConfig;
use std::collections::BTreeMap;
use std::fs::{self, File};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A temporary repository with a version file and dist directory.
pub struct Repo {
    _dir: TempDir,
    /// Repository root.
    pub root: Utf8PathBuf,
}

impl Repo {
    /// Create a repository whose `__about__.py` declares `version`.
    pub fn with_version(version: &str) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        let repo = Self { _dir: dir, root };
        let config = repo.config();
        fs::create_dir_all(&config.dist_dir).expect("create dist");
        fs::write(config.dist_dir.join(".gitignore"), "*\n!.gitignore\n").expect("write gitignore");
        fs::write(
            &config.version_file,
            format!("# SPDX-License-Identifier: MIT\n__version__ = \"{version}\"\n"),
        )
        .expect("write version file");
        repo
    }

    /// Default configuration rooted at this repository, without submodules.
    pub fn config(&self) -> PackagerConfig {
        let mut config = PackagerConfig::with_root(self.root.clone());
        config.skip_submodules = true;
        config
    }
}

/// Sorted entry names directly inside `dir`.
pub fn dir_names(dir: &Utf8Path) -> Vec<String> {
    let mut names: Vec<String> = dir
        .read_dir_utf8()
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_owned())
        .collect();
    names.sort();
    names
}

/// Relative path to contents for every regular file below `dir`.
pub fn file_tree(dir: &Utf8Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .map(|entry| entry.expect("walk"))
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(dir.as_std_path())
                .expect("below dir")
                .to_string_lossy()
                .replace('\\', "/");
            (relative, fs::read(entry.path()).expect("read file"))
        })
        .collect()
}

/// Unpack a `.tar.gz` archive into `dest`.
pub fn unpack_tar_gz(archive: &Utf8Path, dest: &Utf8Path) {
    let file = File::open(archive).expect("open archive");
    tar::Archive::new(GzDecoder::new(file))
        .unpack(dest)
        .expect("unpack archive");
}

/// Unpack a `.zip` archive into `dest`.
pub fn unpack_zip(archive: &Utf8Path, dest: &Utf8Path) {
    let file = File::open(archive).expect("open archive");
    zip::ZipArchive::new(file)
        .expect("read zip")
        .extract(dest)
        .expect("extract zip");
}
