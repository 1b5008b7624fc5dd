//! `dotnet publish` orchestration with mode fallback.
//!
//! Publishing is attempted once per configured [`PublishMode`], in order. A
//! non-zero exit from the SDK is fatal straight away; only a successful
//! publish whose output cannot be located moves on to the next mode.

use crate::config::PackagerConfig;
use crate::error::{PackagerError, Result};
use crate::locator::locate_publish_dir;
use crate::output::write_line;
use crate::runner::CommandRunner;
use camino::Utf8PathBuf;
use std::fmt;
use std::io::Write;

/// How the helper is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum PublishMode {
    /// Bundle the .NET runtime with the helper.
    SelfContained,
    /// Rely on a .NET runtime installed on the host.
    FrameworkDependent,
}

impl PublishMode {
    /// Modes tried when no order is configured.
    pub const DEFAULT_ORDER: [Self; 2] = [Self::SelfContained, Self::FrameworkDependent];

    /// Value passed to `--self-contained`.
    #[must_use]
    pub const fn self_contained_flag(self) -> &'static str {
        match self {
            Self::SelfContained => "true",
            Self::FrameworkDependent => "false",
        }
    }
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SelfContained => "self-contained",
            Self::FrameworkDependent => "framework-dependent",
        })
    }
}

/// Render the `dotnet publish` command line for `mode`.
///
/// The SDK executable, project directory and configuration are quoted for a
/// POSIX shell; the remaining values are validated or fixed tokens.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use redlines_packager::config::PackagerConfig;
/// use redlines_packager::publish::{PublishMode, publish_command};
///
/// let config = PackagerConfig::with_root(Utf8PathBuf::from("/repo"));
/// assert_eq!(
///     publish_command(&config, PublishMode::SelfContained),
///     "dotnet publish /repo/csproj -c Release -r linux-arm64 --self-contained true",
/// );
/// ```
#[must_use]
pub fn publish_command(config: &PackagerConfig, mode: PublishMode) -> String {
    format!(
        "{} publish {} -c {} -r {} --self-contained {}",
        shell_words::quote(&config.dotnet),
        shell_words::quote(config.project_dir.as_str()),
        shell_words::quote(&config.configuration),
        config.runtime_id,
        mode.self_contained_flag(),
    )
}

/// Runs `dotnet publish` and resolves its output directory.
pub struct Publisher<'a> {
    config: &'a PackagerConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> Publisher<'a> {
    /// Create a publisher for `config` that runs commands through `runner`.
    #[must_use]
    pub fn new(config: &'a PackagerConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Publish the helper and return the directory holding its output.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ToolInvocation`] as soon as a publish command
    /// exits non-zero, [`PackagerError::ArtifactNotFound`] if every mode ran
    /// but none produced locatable output, or
    /// [`PackagerError::InvalidConfiguration`] if no mode is configured.
    pub fn publish(&self, out: &mut dyn Write) -> Result<Utf8PathBuf> {
        if self.config.publish_modes.is_empty() {
            return Err(PackagerError::InvalidConfiguration {
                reason: "at least one publish mode is required".to_owned(),
            });
        }

        let base = self.config.publish_base();
        let rid = &self.config.runtime_id;
        let mut modes = self.config.publish_modes.iter().copied().peekable();

        while let Some(mode) = modes.next() {
            let command = publish_command(self.config, mode);
            let status = self
                .runner
                .run(&command, Some(self.config.repo_root.as_path()), out);
            if status != 0 {
                return Err(PackagerError::ToolInvocation {
                    operation: "dotnet publish",
                    detail: format!("self-contained={}", mode.self_contained_flag()),
                    status,
                });
            }

            if let Some(dir) = locate_publish_dir(&base, rid) {
                write_line(out, format!("Publish output: {dir}"));
                return Ok(dir);
            }

            if let Some(next) = modes.peek() {
                log::warn!("{mode} publish produced no output for {rid}; retrying as {next}");
                write_line(
                    out,
                    format!("No {mode} publish output found for {rid}; retrying {next}"),
                );
            }
        }

        Err(PackagerError::ArtifactNotFound {
            target: rid.to_string(),
        })
    }
}
