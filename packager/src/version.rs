//! Package version extraction.
//!
//! The host package records its version as a single assignment such as
//! `__version__ = "2.3.1"` inside a source file. The file is never executed:
//! each line is parsed on its own as a TOML key/value pair and the first line
//! assigning the requested key wins, so surrounding code is ignored. A type
//! annotation between the key and `=` (`__version__: str = "2.3.1"`) is
//! allowed.
//!
//! The version ends up in the archive filename, so it is limited to the
//! characters a PEP 440 version uses.

use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use std::fmt;

/// Default key holding the version in the host package's about file.
pub const DEFAULT_VERSION_KEY: &str = "__version__";

/// A validated package version string.
///
/// # Examples
///
/// ```
/// use redlines_packager::version::Version;
///
/// assert_eq!(Version::try_from("2.3.1+local.1").expect("valid").as_str(), "2.3.1+local.1");
/// assert!(Version::try_from("1.0/../../evil").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(String);

impl Version {
    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Version {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        validate(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate(value: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(PackagerError::InvalidVersion {
            value: value.to_owned(),
            reason: reason.to_owned(),
        })
    };

    if !value.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return reject("must start with a letter or digit");
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '+' | '!')))
    {
        return reject(&format!("unexpected character {bad:?}"));
    }
    if value.contains("..") {
        return reject("must not contain \"..\"");
    }
    Ok(())
}

/// Read the version assigned to `key` in the file at `path`.
///
/// # Errors
///
/// Returns [`PackagerError::VersionFileNotFound`] if the file does not exist,
/// [`PackagerError::VersionNotFound`] if no line assigns a non-empty string to
/// `key`, [`PackagerError::InvalidVersion`] if the assigned value is not a
/// usable version, or [`PackagerError::Io`] if the file cannot be read.
pub fn read_version(path: &Utf8Path, key: &str) -> Result<Version> {
    if !path.is_file() {
        return Err(PackagerError::VersionFileNotFound {
            path: path.to_owned(),
        });
    }

    let contents = std::fs::read_to_string(path)?;
    parse_version(&contents, key)?.ok_or_else(|| PackagerError::VersionNotFound {
        path: path.to_owned(),
        key: key.to_owned(),
    })
}

/// Find the first `key = "value"` assignment in `contents`.
///
/// Lines that are not valid standalone TOML (imports, function definitions,
/// tuple assignments) are skipped. Returns `Ok(None)` when nothing assigns a
/// non-empty string to `key`.
///
/// # Errors
///
/// Returns [`PackagerError::InvalidVersion`] if the first assigned value is
/// not a usable version.
///
/// # Examples
///
/// ```
/// use redlines_packager::version::parse_version;
///
/// let source = "import os\n__version__ = '2.3.1'\n";
/// let version = parse_version(source, "__version__").expect("valid").expect("present");
/// assert_eq!(version.as_str(), "2.3.1");
/// ```
pub fn parse_version(contents: &str, key: &str) -> Result<Option<Version>> {
    contents
        .lines()
        .filter_map(|line| assignment(line.trim(), key))
        .filter_map(|line| line.parse::<toml::Table>().ok())
        .find_map(|table| {
            table
                .get(key)
                .and_then(toml::Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        })
        .map(|value| Version::try_from(value.as_str()))
        .transpose()
}

/// Return `line` as a plain `key = value` assignment, dropping any annotation.
fn assignment(line: &str, key: &str) -> Option<String> {
    let rest = line.strip_prefix(key)?;
    match rest.trim_start().strip_prefix(':') {
        Some(annotated) => {
            let (_, value) = annotated.split_once('=')?;
            Some(format!("{key} = {}", value.trim_start()))
        }
        None => Some(line.to_owned()),
    }
}
