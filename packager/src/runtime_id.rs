//! Runtime identifier validation.
//!
//! A runtime identifier (for example `linux-arm64` or `win-x64`) names the
//! platform the helper binary is published for. It is interpolated into the
//! publish command line, the search paths for publish output, and the archive
//! filename, so it is validated once at construction.

use crate::error::{PackagerError, Result};
use std::fmt;

/// The runtime identifier used when neither `--rid` nor `REDLINES_RID` is set.
pub const DEFAULT_RUNTIME_ID: &str = "linux-arm64";

/// Environment variable that overrides the runtime identifier.
pub const RUNTIME_ID_ENV: &str = "REDLINES_RID";

/// A validated runtime identifier.
///
/// # Examples
///
/// ```
/// use redlines_packager::runtime_id::RuntimeIdentifier;
///
/// let rid = RuntimeIdentifier::try_from("osx-arm64").expect("valid rid");
/// assert_eq!(rid.as_str(), "osx-arm64");
/// assert!(RuntimeIdentifier::try_from("linux arm64").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuntimeIdentifier(String);

impl RuntimeIdentifier {
    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RuntimeIdentifier {
    fn default() -> Self {
        Self(DEFAULT_RUNTIME_ID.to_owned())
    }
}

impl TryFrom<&str> for RuntimeIdentifier {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        validate(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl fmt::Display for RuntimeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate(value: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(PackagerError::InvalidRuntimeIdentifier {
            value: value.to_owned(),
            reason: reason.to_owned(),
        })
    };

    if value.is_empty() {
        return reject("must not be empty");
    }
    if value.starts_with(['-', '.']) {
        return reject("must start with a letter or digit");
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return reject(&format!("unexpected character {bad:?}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::linux_arm("linux-arm64")]
    #[case::linux_musl("linux-musl-x64")]
    #[case::windows("win-x64")]
    #[case::macos("osx-arm64")]
    #[case::versioned("ubuntu.22.04-x64")]
    fn accepts_known_identifiers(#[case] value: &str) {
        let rid = RuntimeIdentifier::try_from(value).expect("valid identifier");
        assert_eq!(rid.as_str(), value);
        assert_eq!(rid.to_string(), value);
    }

    #[rstest]
    #[case::empty("")]
    #[case::space("linux arm64")]
    #[case::separator("linux/arm64")]
    #[case::shell("linux-x64;rm")]
    #[case::leading_dash("-linux")]
    #[case::parent("..")]
    fn rejects_unsafe_identifiers(#[case] value: &str) {
        let err = RuntimeIdentifier::try_from(value).expect_err("expected rejection");
        assert!(matches!(
            err,
            PackagerError::InvalidRuntimeIdentifier { value: ref v, .. } if v == value
        ));
    }

    #[test]
    fn default_is_linux_arm64() {
        assert_eq!(RuntimeIdentifier::default().as_str(), DEFAULT_RUNTIME_ID);
    }
}
