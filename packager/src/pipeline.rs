//! End-to-end packaging pipeline.
//!
//! A run fetches submodules, reads the version, clears the dist directory,
//! publishes, archives the publish output as `{rid}-{version}.{ext}` with the
//! runtime identifier as its root directory, and finally removes the project's
//! intermediate build directories. The first failing step aborts the rest.

use crate::archive::compress;
use crate::cleaner::{clean_build_artifacts, clean_dist};
use crate::config::PackagerConfig;
use crate::error::Result;
use crate::output::{print_dry_run, success_message, write_line};
use crate::publish::Publisher;
use crate::runner::CommandRunner;
use crate::runtime_id::RuntimeIdentifier;
use crate::submodule::ensure_submodules;
use crate::version::{Version, read_version};
use camino::Utf8PathBuf;
use std::io::Write;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Version read from the version file.
    pub version: Version,
    /// Runtime identifier the helper was published for.
    pub runtime_id: RuntimeIdentifier,
    /// Directory the archive was built from.
    pub publish_dir: Utf8PathBuf,
    /// The archive written to the dist directory.
    pub archive_path: Utf8PathBuf,
}

/// Run every packaging step in order.
///
/// # Errors
///
/// Returns the first error raised by any step; later steps are not run.
/// Build artifacts are left in place when publishing fails.
pub fn run_pipeline(
    config: &PackagerConfig,
    runner: &dyn CommandRunner,
    out: &mut dyn Write,
) -> Result<PipelineOutcome> {
    config.validate()?;

    if config.skip_submodules {
        log::info!("skipping submodule check");
    } else {
        ensure_submodules(config, runner, out)?;
    }

    let version = read_version(&config.version_file, &config.version_key)?;
    log::info!("packaging version {version} for {}", config.runtime_id);

    clean_dist(&config.dist_dir, &config.dist_keep_file, out)?;

    let publish_dir = Publisher::new(config, runner).publish(out)?;

    std::fs::create_dir_all(&config.dist_dir)?;
    let archive_path = config.archive_path(&version);
    compress(&publish_dir, &archive_path, Some(config.runtime_id.as_str()))?;

    if config.keep_build_artifacts {
        log::info!("keeping build artifacts under {}", config.project_dir);
    } else {
        clean_build_artifacts(&config.build_artifact_dirs(), out)?;
    }

    write_line(out, success_message(&archive_path));
    Ok(PipelineOutcome {
        version,
        runtime_id: config.runtime_id.clone(),
        publish_dir,
        archive_path,
    })
}

/// Describe the run without modifying anything.
///
/// Only the version file is read, since the archive name depends on it.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the version cannot be
/// read.
pub fn dry_run(config: &PackagerConfig, out: &mut dyn Write) -> Result<Version> {
    config.validate()?;
    let version = read_version(&config.version_file, &config.version_key)?;
    print_dry_run(config, &version, out);
    Ok(version)
}
