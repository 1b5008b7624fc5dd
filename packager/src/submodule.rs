//! Git submodule checkout for the Open XML PowerTools sources.
//!
//! The helper project builds against a vendored submodule. When the sources
//! are missing and the root is a git checkout, the submodules are fetched;
//! otherwise the step is skipped and a missing submodule surfaces later as a
//! publish failure.

use crate::config::PackagerConfig;
use crate::error::{PackagerError, Result};
use crate::output::write_line;
use crate::runner::CommandRunner;
use std::io::Write;

/// Command that fetches every submodule recursively.
pub const SUBMODULE_UPDATE_COMMAND: &str = "git submodule update --init --recursive";

/// Outcome of the submodule check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmoduleAction {
    /// The sentinel directory exists; nothing to fetch.
    AlreadyPresent,
    /// The repository root has no `.git`, so there is nothing to fetch from.
    NotARepository,
    /// The sources are missing and can be fetched.
    Fetch,
}

/// Decide whether the submodules need fetching.
#[must_use]
pub fn decide_submodule_action(config: &PackagerConfig) -> SubmoduleAction {
    if config.submodule_sentinel.is_dir() {
        SubmoduleAction::AlreadyPresent
    } else if config.repo_root.join(".git").exists() {
        SubmoduleAction::Fetch
    } else {
        SubmoduleAction::NotARepository
    }
}

/// Fetch the submodules if the sources are missing.
///
/// Returns the action taken.
///
/// # Errors
///
/// Returns [`PackagerError::ToolInvocation`] if the fetch command exits
/// non-zero.
pub fn ensure_submodules(
    config: &PackagerConfig,
    runner: &dyn CommandRunner,
    out: &mut dyn Write,
) -> Result<SubmoduleAction> {
    let action = decide_submodule_action(config);
    match action {
        SubmoduleAction::AlreadyPresent => {
            log::debug!("submodule sources present at {}", config.submodule_sentinel);
        }
        SubmoduleAction::NotARepository => {
            log::info!(
                "{} is not a git checkout; skipping submodule fetch",
                config.repo_root
            );
        }
        SubmoduleAction::Fetch => {
            write_line(out, "Fetching git submodules...");
            let status = runner.run(
                SUBMODULE_UPDATE_COMMAND,
                Some(config.repo_root.as_path()),
                out,
            );
            if status != 0 {
                return Err(PackagerError::ToolInvocation {
                    operation: "git submodule update",
                    detail: "--init --recursive".to_owned(),
                    status,
                });
            }
        }
    }
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ExpectedCall, StubRunner, utf8_temp_dir};
    use rstest::rstest;
    use std::fs;

    #[rstest]
    #[case::sentinel_present(true, true, SubmoduleAction::AlreadyPresent)]
    #[case::sentinel_without_git(true, false, SubmoduleAction::AlreadyPresent)]
    #[case::missing_in_checkout(false, true, SubmoduleAction::Fetch)]
    #[case::missing_outside_checkout(false, false, SubmoduleAction::NotARepository)]
    fn decides_from_sentinel_and_git_marker(
        #[case] sentinel: bool,
        #[case] git: bool,
        #[case] expected: SubmoduleAction,
    ) {
        let (_dir, root) = utf8_temp_dir();
        let config = PackagerConfig::with_root(root.clone());
        if sentinel {
            fs::create_dir_all(&config.submodule_sentinel).expect("mkdir");
        }
        if git {
            fs::create_dir(root.join(".git")).expect("mkdir");
        }

        assert_eq!(decide_submodule_action(&config), expected);
    }

    #[test]
    fn git_file_marks_a_worktree_checkout() {
        let (_dir, root) = utf8_temp_dir();
        fs::write(root.join(".git"), "gitdir: ../main/.git/worktrees/x\n").expect("write");
        let config = PackagerConfig::with_root(root);

        assert_eq!(decide_submodule_action(&config), SubmoduleAction::Fetch);
    }

    #[test]
    fn fetch_runs_update_in_repository_root() {
        let (_dir, root) = utf8_temp_dir();
        fs::create_dir(root.join(".git")).expect("mkdir");
        let config = PackagerConfig::with_root(root.clone());
        let runner = StubRunner::new(vec![ExpectedCall::success(SUBMODULE_UPDATE_COMMAND)]);

        let action = ensure_submodules(&config, &runner, &mut Vec::new()).expect("fetch");

        assert_eq!(action, SubmoduleAction::Fetch);
        assert_eq!(runner.calls().first().and_then(|call| call.cwd.clone()), Some(root));
        runner.assert_finished();
    }

    #[test]
    fn failed_fetch_is_fatal() {
        let (_dir, root) = utf8_temp_dir();
        fs::create_dir(root.join(".git")).expect("mkdir");
        let config = PackagerConfig::with_root(root);
        let runner = StubRunner::new(vec![ExpectedCall::failure(SUBMODULE_UPDATE_COMMAND, 128)]);

        let err = ensure_submodules(&config, &runner, &mut Vec::new()).expect_err("fails");

        assert!(matches!(
            err,
            PackagerError::ToolInvocation { operation: "git submodule update", status: 128, .. }
        ));
    }

    #[test]
    fn present_sources_run_nothing() {
        let (_dir, root) = utf8_temp_dir();
        let config = PackagerConfig::with_root(root);
        fs::create_dir_all(&config.submodule_sentinel).expect("mkdir");
        let runner = StubRunner::new(Vec::new());

        let action = ensure_submodules(&config, &runner, &mut Vec::new()).expect("skip");

        assert_eq!(action, SubmoduleAction::AlreadyPresent);
        assert!(runner.calls().is_empty());
    }
}
