//! Shell command execution with live output.
//!
//! Publishing the helper can take minutes, so the runner echoes every line the
//! child produces as soon as it arrives instead of collecting output until the
//! process exits. Standard error is folded into standard output inside the
//! spawned shell so both streams share one pipe and keep their relative order.

use crate::output::write_line;
use camino::Utf8Path;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, ExitStatus, Stdio};

/// Exit status reported when the shell itself cannot be spawned.
pub const SPAWN_FAILURE_STATUS: i32 = 127;

/// Abstraction for running shell command lines.
///
/// Implementations return the terminal exit status of the command. A status
/// of zero means success; retry decisions belong to the caller.
pub trait CommandRunner {
    /// Runs `command` through the platform shell, optionally inside `cwd`,
    /// echoing merged stdout/stderr lines to `output`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use redlines_packager::runner::{CommandRunner, ShellCommandRunner};
    ///
    /// let mut out = std::io::stdout();
    /// let status = ShellCommandRunner.run("dotnet --info", None, &mut out);
    /// assert_eq!(status, 0);
    /// ```
    fn run(&self, command: &str, cwd: Option<&Utf8Path>, output: &mut dyn Write) -> i32;
}

/// Runs commands through `sh -c` (or `cmd /C` on Windows).
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellCommandRunner;

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: &str, cwd: Option<&Utf8Path>, output: &mut dyn Write) -> i32 {
        write_line(output, format!("Running: {command}"));

        let mut cmd = shell_command(command);
        cmd.stdin(Stdio::null()).stdout(Stdio::piped());
        if let Some(dir) = cwd {
            cmd.current_dir(dir.as_std_path());
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                log::error!("failed to spawn shell for `{command}`: {err}");
                write_line(output, format!("failed to start command: {err}"));
                return SPAWN_FAILURE_STATUS;
            }
        };

        stream_lines(&mut child, output);

        match child.wait() {
            Ok(status) => {
                let code = exit_code(status);
                log::debug!("`{command}` exited with status {code}");
                code
            }
            Err(err) => {
                log::error!("failed to wait for `{command}`: {err}");
                SPAWN_FAILURE_STATUS
            }
        }
    }
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(format!("exec 2>&1\n{command}"));
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let mut cmd = Command::new("cmd");
    cmd.arg("/C").raw_arg(format!("\"{command} 2>&1\""));
    cmd
}

/// Copy child output to `output` line by line until the pipe closes.
fn stream_lines(child: &mut Child, output: &mut dyn Write) {
    let Some(stdout) = child.stdout.take() else {
        return;
    };

    let mut reader = BufReader::new(stdout);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buffer);
                write_line(output, line.trim_end_matches(['\r', '\n']));
                if output.flush().is_err() {
                    // Best-effort output; ignore flush failures.
                }
            }
            Err(err) => {
                log::warn!("stopped reading command output: {err}");
                break;
            }
        }
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    fn run_captured(command: &str, cwd: Option<&Utf8Path>) -> (i32, String) {
        let mut out = Vec::new();
        let status = ShellCommandRunner.run(command, cwd, &mut out);
        (status, String::from_utf8(out).expect("utf8 output"))
    }

    #[rstest]
    #[case::success("true", 0)]
    #[case::failure("false", 1)]
    #[case::explicit("exit 42", 42)]
    fn returns_exit_status(#[case] command: &str, #[case] expected: i32) {
        let (status, _) = run_captured(command, None);
        assert_eq!(status, expected);
    }

    #[test]
    fn echoes_command_before_running() {
        let (_, out) = run_captured("true", None);
        assert!(out.starts_with("Running: true\n"));
    }

    #[test]
    fn merges_stderr_into_output_in_order() {
        let (status, out) = run_captured("echo first; echo second >&2; echo third", None);
        assert_eq!(status, 0);
        let lines: Vec<&str> = out.lines().skip(1).collect();
        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn runs_in_working_directory() {
        let dir = TempDir::new().expect("temp dir");
        let cwd = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8");
        std::fs::write(cwd.join("marker.txt"), b"x").expect("write");

        let (status, out) = run_captured("ls", Some(&cwd));
        assert_eq!(status, 0);
        assert!(out.contains("marker.txt"));
    }

    #[test]
    fn unknown_command_is_non_zero() {
        let (status, _) = run_captured("definitely-not-a-real-command-xyz", None);
        assert_eq!(status, 127);
    }

    #[test]
    fn missing_working_directory_reports_spawn_failure() {
        let cwd = Utf8PathBuf::from("/nonexistent/redlines/packager/cwd");
        let (status, out) = run_captured("true", Some(&cwd));
        assert_eq!(status, SPAWN_FAILURE_STATUS);
        assert!(out.contains("failed to start command"));
    }
}
