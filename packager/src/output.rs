//! Progress output for the packager CLI.
//!
//! Progress lines go to an injected writer rather than straight to stdout so
//! that pipeline steps can be exercised in tests with a `Vec<u8>` sink.

use crate::config::PackagerConfig;
use crate::publish::publish_command;
use crate::version::Version;
use std::io::Write;

/// Write a single line to the progress sink.
///
/// Write failures are ignored: losing progress output must not abort a build.
pub fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Format the message printed after a successful run.
#[must_use]
pub fn success_message(archive: &camino::Utf8Path) -> String {
    format!("Build and compression complete: {archive}")
}

/// Print what a run would do without touching the filesystem.
pub fn print_dry_run(config: &PackagerConfig, version: &Version, out: &mut dyn Write) {
    write_line(out, "Dry run - no files will be modified");
    write_line(out, "");
    write_line(out, format!("Repository root: {}", config.repo_root));
    write_line(out, format!("Project directory: {}", config.project_dir));
    write_line(out, format!("Version: {version}"));
    write_line(out, format!("Runtime identifier: {}", config.runtime_id));
    write_line(out, format!("Publish output base: {}", config.publish_base()));
    write_line(out, format!("Dist directory: {}", config.dist_dir));
    write_line(out, format!("Archive: {}", config.archive_path(version)));
    write_line(out, "");
    write_line(out, "Publish attempts:");
    for mode in &config.publish_modes {
        write_line(out, format!("  - {}", publish_command(config, *mode)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::parse_version;
    use camino::Utf8PathBuf;

    #[test]
    fn write_line_appends_newline() {
        let mut out = Vec::new();
        write_line(&mut out, "hello");
        assert_eq!(out, b"hello\n");
    }

    #[test]
    fn dry_run_lists_each_publish_attempt() {
        let config = PackagerConfig::with_root(Utf8PathBuf::from("/repo"));
        let version = parse_version("__version__ = \"2.3.1\"", "__version__")
            .expect("valid version")
            .expect("version present");
        let mut out = Vec::new();

        print_dry_run(&config, &version, &mut out);

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Dry run"));
        assert!(text.contains("linux-arm64-2.3.1.tar.gz"));
        assert!(text.contains("--self-contained true"));
        assert!(text.contains("--self-contained false"));
    }
}
