//! Publish output discovery.
//!
//! Where `dotnet publish` writes its output depends on the publish mode and on
//! the SDK version, so the output directory is never assumed. The conventional
//! locations are checked first, in order; only when none of them holds output
//! is the whole publish base searched for a `publish` directory whose path
//! mentions the runtime identifier.

use crate::runtime_id::RuntimeIdentifier;
use camino::{Utf8Path, Utf8PathBuf};

/// Leaf directory name the SDK uses for publish output.
pub const PUBLISH_DIR_NAME: &str = "publish";

/// Conventional output locations under `base`, in lookup order.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use redlines_packager::locator::candidate_paths;
/// use redlines_packager::runtime_id::RuntimeIdentifier;
///
/// let rid = RuntimeIdentifier::try_from("win-x64").expect("valid rid");
/// let candidates = candidate_paths(Utf8Path::new("bin/Release/net10.0"), &rid);
/// assert_eq!(candidates[0], Utf8Path::new("bin/Release/net10.0/win-x64/publish"));
/// ```
#[must_use]
pub fn candidate_paths(base: &Utf8Path, rid: &RuntimeIdentifier) -> Vec<Utf8PathBuf> {
    let rid_dir = base.join(rid.as_str());
    vec![
        rid_dir.join(PUBLISH_DIR_NAME),
        rid_dir.join("self-contained").join(PUBLISH_DIR_NAME),
    ]
}

/// Find the publish output directory for `rid` under `base`.
///
/// Returns the first conventional candidate that is a non-empty directory.
/// Failing that, returns the first non-empty directory found by a recursive
/// search for `**/publish` whose full path contains `rid`. Returns `None` if
/// neither step finds output.
#[must_use]
pub fn locate_publish_dir(base: &Utf8Path, rid: &RuntimeIdentifier) -> Option<Utf8PathBuf> {
    if let Some(found) = candidate_paths(base, rid)
        .into_iter()
        .find(|candidate| is_populated_dir(candidate))
    {
        log::debug!("found publish output at conventional path {found}");
        return Some(found);
    }

    let found = search_publish_dirs(base, rid)
        .into_iter()
        .find(|candidate| is_populated_dir(candidate));
    match &found {
        Some(dir) => log::debug!("found publish output by search at {dir}"),
        None => log::debug!("no publish output for {rid} under {base}"),
    }
    found
}

/// All `publish` directories under `base` whose path mentions `rid`, in
/// lexical order.
fn search_publish_dirs(base: &Utf8Path, rid: &RuntimeIdentifier) -> Vec<Utf8PathBuf> {
    if !base.is_dir() {
        return Vec::new();
    }

    let pattern = format!(
        "{}/**/{PUBLISH_DIR_NAME}",
        glob::Pattern::escape(base.as_str())
    );
    let paths = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(err) => {
            log::warn!("invalid publish search pattern {pattern}: {err}");
            return Vec::new();
        }
    };

    paths
        .filter_map(|entry| match entry {
            Ok(path) => Utf8PathBuf::from_path_buf(path).ok(),
            Err(err) => {
                log::debug!("skipping unreadable path during publish search: {err}");
                None
            }
        })
        .filter(|path| path.as_str().contains(rid.as_str()))
        .collect()
}

/// Whether `path` is a directory with at least one entry.
fn is_populated_dir(path: &Utf8Path) -> bool {
    path.is_dir()
        && std::fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_some())
}
