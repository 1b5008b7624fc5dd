//! Redlines packager library.
//!
//! Builds the .NET redlines helper for one runtime identifier and packages
//! the publish output into the Python package's dist directory. It is used by
//! the `redlines-packager` binary and can be driven programmatically through
//! [`pipeline::run_pipeline`] with any [`runner::CommandRunner`].
//!
//! # Modules
//!
//! - [`archive`] - `.tar.gz` and `.zip` creation
//! - [`cleaner`] - Dist and build-artifact cleanup
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Resolved run configuration
//! - [`error`] - Error taxonomy
//! - [`locator`] - Publish output discovery
//! - [`output`] - Progress output helpers
//! - [`pipeline`] - End-to-end orchestration
//! - [`publish`] - `dotnet publish` with mode fallback
//! - [`runner`] - Shell command execution
//! - [`runtime_id`] - Validated runtime identifiers
//! - [`submodule`] - Git submodule checkout
//! - [`version`] - Package version extraction

pub mod archive;
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod error;
pub mod locator;
pub mod output;
pub mod pipeline;
pub mod publish;
pub mod runner;
pub mod runtime_id;
pub mod submodule;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod version;
