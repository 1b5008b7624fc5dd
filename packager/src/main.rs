//! Redlines packager CLI entrypoint.
//!
//! This binary publishes the redlines helper for one runtime identifier and
//! writes `{rid}-{version}.tar.gz` into the Python package's dist directory.

use camino::Utf8PathBuf;
use clap::Parser;
use redlines_packager::cli::Cli;
use redlines_packager::config::PackagerConfig;
use redlines_packager::error::{PackagerError, Result};
use redlines_packager::output::write_line;
use redlines_packager::pipeline::{dry_run, run_pipeline};
use redlines_packager::runner::ShellCommandRunner;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut stderr = std::io::stderr();
    let run_result = run(&cli);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Install `env_logger`, letting `RUST_LOG` override the `-v`/`-q` level.
fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let cwd = current_dir()?;
    let config = PackagerConfig::from_cli(cli, &cwd)?;
    log::debug!("resolved configuration: {config:?}");

    let mut stdout = std::io::stdout();
    let mut sink = std::io::sink();
    let out: &mut dyn Write = if cli.quiet { &mut sink } else { &mut stdout };

    if cli.dry_run {
        dry_run(&config, out)?;
        return Ok(());
    }

    run_pipeline(&config, &ShellCommandRunner, out)?;
    Ok(())
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|path| PackagerError::NonUtf8Path {
        path: path.display().to_string(),
    })
}

/// Report `result` on `stderr` and map it to a process exit code.
fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_line(stderr, format!("error: {err}"));
            1
        }
    }
}
