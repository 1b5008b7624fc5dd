//! Resolved configuration for a packaging run.
//!
//! [`PackagerConfig`] is built once at start-up, from the command line or
//! programmatically, and passed by reference to every step. Relative paths
//! are resolved against the repository root when the configuration is built.

use crate::archive::ArchiveFormat;
use crate::cli::Cli;
use crate::error::{PackagerError, Result};
use crate::publish::PublishMode;
use crate::runtime_id::{DEFAULT_RUNTIME_ID, RuntimeIdentifier};
use crate::version::{DEFAULT_VERSION_KEY, Version};
use camino::{Utf8Path, Utf8PathBuf};

/// Project directory containing the helper's `.csproj`, relative to the root.
pub const DEFAULT_PROJECT_DIR: &str = "csproj";

/// Directory receiving finished archives, relative to the root.
pub const DEFAULT_DIST_DIR: &str = "src/python_redlines/dist";

/// File carrying the host package version, relative to the root.
pub const DEFAULT_VERSION_FILE: &str = "src/python_redlines/__about__.py";

/// Target framework moniker the helper is published for.
pub const DEFAULT_FRAMEWORK: &str = "net10.0";

/// Build configuration passed to `dotnet publish -c`.
pub const DEFAULT_CONFIGURATION: &str = "Release";

/// Program used to invoke the .NET SDK.
pub const DEFAULT_DOTNET: &str = "dotnet";

/// File in the dist directory that survives cleanup.
pub const DEFAULT_DIST_KEEP_FILE: &str = ".gitignore";

/// Directory whose presence shows the submodules are already checked out.
pub const DEFAULT_SUBMODULE_SENTINEL: &str = "Open-Xml-PowerTools/OpenXmlPowerTools";

/// Complete configuration for one packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagerConfig {
    /// Repository root; external commands run here.
    pub repo_root: Utf8PathBuf,
    /// Directory holding the helper project.
    pub project_dir: Utf8PathBuf,
    /// Directory receiving the finished archive.
    pub dist_dir: Utf8PathBuf,
    /// File carrying the package version.
    pub version_file: Utf8PathBuf,
    /// Key assigned the version inside `version_file`.
    pub version_key: String,
    /// Target framework moniker, e.g. `net10.0`.
    pub framework: String,
    /// Build configuration, e.g. `Release`.
    pub configuration: String,
    /// Platform the helper is published for.
    pub runtime_id: RuntimeIdentifier,
    /// Publish modes in the order they are attempted.
    pub publish_modes: Vec<PublishMode>,
    /// Program used to run `publish`.
    pub dotnet: String,
    /// Container format of the produced archive.
    pub archive_format: ArchiveFormat,
    /// Name of the file preserved in the dist directory.
    pub dist_keep_file: String,
    /// Directory whose presence means submodules need no fetch.
    pub submodule_sentinel: Utf8PathBuf,
    /// Skip the submodule step entirely.
    pub skip_submodules: bool,
    /// Leave `bin/` and `obj/` in place after archiving.
    pub keep_build_artifacts: bool,
}

impl PackagerConfig {
    /// Create a configuration with default settings rooted at `repo_root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use redlines_packager::config::PackagerConfig;
    ///
    /// let config = PackagerConfig::with_root(Utf8PathBuf::from("/repo"));
    /// assert_eq!(config.project_dir, Utf8PathBuf::from("/repo/csproj"));
    /// assert_eq!(config.runtime_id.as_str(), "linux-arm64");
    /// ```
    #[must_use]
    pub fn with_root(repo_root: Utf8PathBuf) -> Self {
        Self {
            project_dir: repo_root.join(DEFAULT_PROJECT_DIR),
            dist_dir: repo_root.join(DEFAULT_DIST_DIR),
            version_file: repo_root.join(DEFAULT_VERSION_FILE),
            version_key: DEFAULT_VERSION_KEY.to_owned(),
            framework: DEFAULT_FRAMEWORK.to_owned(),
            configuration: DEFAULT_CONFIGURATION.to_owned(),
            runtime_id: RuntimeIdentifier::default(),
            publish_modes: PublishMode::DEFAULT_ORDER.to_vec(),
            dotnet: DEFAULT_DOTNET.to_owned(),
            archive_format: ArchiveFormat::TarGz,
            dist_keep_file: DEFAULT_DIST_KEEP_FILE.to_owned(),
            submodule_sentinel: repo_root.join(DEFAULT_SUBMODULE_SENTINEL),
            skip_submodules: false,
            keep_build_artifacts: false,
            repo_root,
        }
    }

    /// Build a configuration from parsed command-line arguments.
    ///
    /// When `--repo-root` is absent, `cwd` is used. Path options given
    /// relative are resolved against the repository root.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidRuntimeIdentifier`] for a malformed
    /// `--rid`/`REDLINES_RID`, or [`PackagerError::InvalidConfiguration`] if
    /// the publish mode list is unusable.
    pub fn from_cli(cli: &Cli, cwd: &Utf8Path) -> Result<Self> {
        let repo_root = cli
            .repo_root
            .as_ref()
            .map_or_else(|| cwd.to_owned(), |root| cwd.join(root));
        let mut config = Self::with_root(repo_root);

        if let Some(dir) = &cli.project_dir {
            config.project_dir = config.repo_root.join(dir);
        }
        if let Some(dir) = &cli.dist_dir {
            config.dist_dir = config.repo_root.join(dir);
        }
        if let Some(file) = &cli.version_file {
            config.version_file = config.repo_root.join(file);
        }

        config.runtime_id = RuntimeIdentifier::try_from(
            cli.rid.as_deref().unwrap_or(DEFAULT_RUNTIME_ID),
        )?;
        config.framework.clone_from(&cli.framework);
        config.configuration.clone_from(&cli.configuration);
        config.dotnet.clone_from(&cli.dotnet);
        config.publish_modes.clone_from(&cli.publish_modes);
        config.archive_format = cli.format;
        config.skip_submodules = cli.skip_submodules;
        config.keep_build_artifacts = cli.keep_build_artifacts;

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidConfiguration`] if no publish mode is
    /// configured or a mode is listed twice.
    pub fn validate(&self) -> Result<()> {
        if self.publish_modes.is_empty() {
            return Err(PackagerError::InvalidConfiguration {
                reason: "at least one publish mode is required".to_owned(),
            });
        }

        for (index, mode) in self.publish_modes.iter().enumerate() {
            if self.publish_modes.iter().take(index).any(|seen| seen == mode) {
                return Err(PackagerError::InvalidConfiguration {
                    reason: format!("publish mode {mode} is listed more than once"),
                });
            }
        }

        Ok(())
    }

    /// Directory under which `dotnet publish` places its output.
    #[must_use]
    pub fn publish_base(&self) -> Utf8PathBuf {
        self.project_dir
            .join("bin")
            .join(&self.configuration)
            .join(&self.framework)
    }

    /// Intermediate directories removed after a successful run.
    #[must_use]
    pub fn build_artifact_dirs(&self) -> Vec<Utf8PathBuf> {
        vec![self.project_dir.join("bin"), self.project_dir.join("obj")]
    }

    /// Archive filename for `version`, e.g. `linux-arm64-2.3.1.tar.gz`.
    #[must_use]
    pub fn archive_name(&self, version: &Version) -> String {
        format!(
            "{}-{}.{}",
            self.runtime_id,
            version,
            self.archive_format.extension()
        )
    }

    /// Full path of the archive produced for `version`.
    #[must_use]
    pub fn archive_path(&self, version: &Version) -> Utf8PathBuf {
        self.dist_dir.join(self.archive_name(version))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
