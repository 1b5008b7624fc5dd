//! CLI argument definitions for the redlines packager.
//!
//! Kept apart from the entrypoint so that argument parsing can be tested
//! without running a build.

use crate::archive::ArchiveFormat;
use crate::config::{DEFAULT_CONFIGURATION, DEFAULT_DOTNET, DEFAULT_FRAMEWORK};
use crate::publish::PublishMode;
use crate::runtime_id::RUNTIME_ID_ENV;
use camino::Utf8PathBuf;
use clap::Parser;

/// Build and package the redlines helper binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "redlines-packager")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build and package the redlines helper binary.\n\n",
    "Publishes the .NET helper project for one runtime identifier, locates the ",
    "publish output, and compresses it into the Python package's dist directory ",
    "as {rid}-{version}.tar.gz. The version is read from the package's ",
    "__about__.py.\n\n",
    "Publishing is tried self-contained first and framework-dependent second. ",
    "A failing dotnet command stops the run; the next mode is only tried when a ",
    "successful publish leaves no output behind.",
))]
#[command(after_help = concat!(
    "ENVIRONMENT:\n",
    "  REDLINES_RID    Runtime identifier used when --rid is absent [default: linux-arm64]\n",
    "  RUST_LOG        Diagnostic log filter (overrides -v)\n\n",
    "EXAMPLES:\n",
    "  Package for the default runtime:\n",
    "    $ redlines-packager\n\n",
    "  Package for Windows as a zip:\n",
    "    $ redlines-packager --rid win-x64 --format zip\n\n",
    "  Try framework-dependent publishing only:\n",
    "    $ redlines-packager --publish-modes framework-dependent\n\n",
    "  Preview without building:\n",
    "    $ redlines-packager --dry-run",
))]
pub struct Cli {
    /// Repository root [default: current directory].
    #[arg(long, value_name = "DIR")]
    pub repo_root: Option<Utf8PathBuf>,

    /// Runtime identifier to publish for, e.g. linux-x64 or osx-arm64.
    #[arg(short, long, env = RUNTIME_ID_ENV, value_name = "RID")]
    pub rid: Option<String>,

    /// Publish modes to try, in order (comma separated).
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        value_name = "MODES",
        default_values_t = PublishMode::DEFAULT_ORDER
    )]
    pub publish_modes: Vec<PublishMode>,

    /// Archive container format.
    #[arg(long, value_enum, default_value_t = ArchiveFormat::TarGz)]
    pub format: ArchiveFormat,

    /// Build configuration passed to dotnet publish.
    #[arg(short, long, value_name = "NAME", default_value = DEFAULT_CONFIGURATION)]
    pub configuration: String,

    /// Target framework of the helper project.
    #[arg(long, value_name = "TFM", default_value = DEFAULT_FRAMEWORK)]
    pub framework: String,

    /// Program used to invoke the .NET SDK.
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_DOTNET)]
    pub dotnet: String,

    /// Helper project directory, relative to the repository root.
    #[arg(long, value_name = "DIR")]
    pub project_dir: Option<Utf8PathBuf>,

    /// Directory receiving the archive, relative to the repository root.
    #[arg(long, value_name = "DIR")]
    pub dist_dir: Option<Utf8PathBuf>,

    /// File carrying `__version__`, relative to the repository root.
    #[arg(long, value_name = "FILE")]
    pub version_file: Option<Utf8PathBuf>,

    /// Do not fetch git submodules.
    #[arg(long)]
    pub skip_submodules: bool,

    /// Leave the project's bin/ and obj/ directories in place.
    #[arg(long)]
    pub keep_build_artifacts: bool,

    /// Show what would be built and exit without building.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Log level implied by `--verbose` and `--quiet`.
    #[must_use]
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
