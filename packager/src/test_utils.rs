//! Shared test utilities for the packager crate.

use crate::output::write_line;
use crate::runner::CommandRunner;
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Write;
use tempfile::TempDir;

/// Creates a temporary directory and returns it with its UTF-8 path.
///
/// # Panics
///
/// Panics if the directory cannot be created or its path is not UTF-8.
pub fn utf8_temp_dir() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .expect("temp dir path is not UTF-8");
    (dir, path)
}

/// Represents an expected command invocation for testing.
#[derive(Debug, Clone)]
pub struct ExpectedCall {
    /// The full command line the runner should receive.
    pub command: String,
    /// The exit status to return.
    pub status: i32,
    /// Lines echoed to the output sink, as a real command would print them.
    pub output: Vec<String>,
    /// Files created (with parent directories) before the status is returned.
    pub creates: Vec<Utf8PathBuf>,
}

impl ExpectedCall {
    /// Expect `command` and report success.
    pub fn success(command: impl Into<String>) -> Self {
        Self::failure(command, 0)
    }

    /// Expect `command` and report `status`.
    pub fn failure(command: impl Into<String>, status: i32) -> Self {
        Self {
            command: command.into(),
            status,
            output: Vec::new(),
            creates: Vec::new(),
        }
    }

    /// Create `path` when the call is made, simulating tool output.
    #[must_use]
    pub fn creating(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.creates.push(path.into());
        self
    }

    /// Echo `line` to the output sink when the call is made.
    #[must_use]
    pub fn printing(mut self, line: impl Into<String>) -> Self {
        self.output.push(line.into());
        self
    }
}

/// A command the stub received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The command line.
    pub command: String,
    /// The working directory requested, if any.
    pub cwd: Option<Utf8PathBuf>,
}

/// A scripted implementation of `CommandRunner` for testing.
///
/// Each invocation is checked against the next expected call. Files listed on
/// the call are written before its status is returned, so code that inspects
/// the filesystem after a command sees the simulated output.
#[derive(Debug, Default)]
pub struct StubRunner {
    expected: RefCell<VecDeque<ExpectedCall>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl StubRunner {
    /// Creates a new `StubRunner` with the given expected calls.
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Returns every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandRunner for StubRunner {
    fn run(&self, command: &str, cwd: Option<&Utf8Path>, output: &mut dyn Write) -> i32 {
        self.calls.borrow_mut().push(RecordedCall {
            command: command.to_owned(),
            cwd: cwd.map(Utf8Path::to_path_buf),
        });

        let call = self
            .expected
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command invocation: {command}"));
        assert_eq!(call.command, command);

        write_line(output, format!("Running: {command}"));
        for line in &call.output {
            write_line(output, line);
        }
        for path in &call.creates {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("failed to create stub output dir");
            }
            std::fs::write(path, command.as_bytes()).expect("failed to write stub output");
        }

        call.status
    }
}
