//! Error types for the redlines packager.
//!
//! Every fatal condition of a packaging run maps onto one variant here. The
//! binary prints the rendered message and exits non-zero, so messages are
//! written to be read by whoever launched the build.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while building and packaging the helper binary.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// An external tool (dotnet, git) exited with a non-zero status.
    #[error("{operation} failed ({detail}) with exit status {status}; see output above")]
    ToolInvocation {
        /// The command that failed, e.g. `dotnet publish`.
        operation: &'static str,
        /// Mode or context of the failing invocation, e.g. `self-contained=true`.
        detail: String,
        /// Exit status reported by the command runner.
        status: i32,
    },

    /// Every publish mode ran successfully but no output directory was found.
    #[error("publish directory missing after dotnet publish for rid={target}")]
    ArtifactNotFound {
        /// The runtime identifier that was searched for.
        target: String,
    },

    /// The archive path does not end in `.tar.gz` or `.zip`.
    #[error("unsupported archive format: {path}")]
    UnsupportedArchiveFormat {
        /// The rejected archive path.
        path: Utf8PathBuf,
    },

    /// The requested archive root is not a single plain path component.
    #[error("invalid archive root name \"{name}\": must be a single path component")]
    InvalidArchiveRoot {
        /// The rejected root name.
        name: String,
    },

    /// The runtime identifier contains characters that cannot be used safely.
    #[error("invalid runtime identifier \"{value}\": {reason}")]
    InvalidRuntimeIdentifier {
        /// The rejected identifier.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The file expected to carry the package version does not exist.
    #[error("version file not found at {path}")]
    VersionFileNotFound {
        /// Path where the version file was expected.
        path: Utf8PathBuf,
    },

    /// The version file has no usable assignment for the version key.
    #[error("no {key} assignment found in {path}")]
    VersionNotFound {
        /// The version file that was searched.
        path: Utf8PathBuf,
        /// The key that was looked up.
        key: String,
    },

    /// The version string cannot be used in an archive filename.
    #[error("invalid version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The resolved configuration is unusable.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the problem.
        reason: String,
    },

    /// A path could not be represented as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a zip archive failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Walking the source tree of an archive failed.
    #[error("failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
