//! Tests for configuration resolution.

use super::*;
use clap::Parser;
use rstest::rstest;

fn cli(args: &[&str]) -> Cli {
    temp_env::with_var_unset(crate::runtime_id::RUNTIME_ID_ENV, || {
        Cli::parse_from(std::iter::once("redlines-packager").chain(args.iter().copied()))
    })
}

fn version(value: &str) -> Version {
    Version::try_from(value).expect("valid version")
}

#[test]
fn defaults_are_rooted_at_current_directory() {
    let config = PackagerConfig::from_cli(&cli(&[]), Utf8Path::new("/work/redlines"))
        .expect("config");

    assert_eq!(config.repo_root, Utf8PathBuf::from("/work/redlines"));
    assert_eq!(config.project_dir, Utf8PathBuf::from("/work/redlines/csproj"));
    assert_eq!(
        config.dist_dir,
        Utf8PathBuf::from("/work/redlines/src/python_redlines/dist")
    );
    assert_eq!(
        config.version_file,
        Utf8PathBuf::from("/work/redlines/src/python_redlines/__about__.py")
    );
    assert_eq!(config.runtime_id.as_str(), "linux-arm64");
    assert_eq!(config.publish_modes, PublishMode::DEFAULT_ORDER.to_vec());
    assert_eq!(config.dist_keep_file, ".gitignore");
    assert_eq!(
        config.submodule_sentinel,
        Utf8PathBuf::from("/work/redlines/Open-Xml-PowerTools/OpenXmlPowerTools")
    );
}

#[test]
fn relative_paths_resolve_against_repo_root() {
    let config = PackagerConfig::from_cli(
        &cli(&["--repo-root", "checkout", "--project-dir", "helper", "--dist-dir", "out"]),
        Utf8Path::new("/work"),
    )
    .expect("config");

    assert_eq!(config.repo_root, Utf8PathBuf::from("/work/checkout"));
    assert_eq!(config.project_dir, Utf8PathBuf::from("/work/checkout/helper"));
    assert_eq!(config.dist_dir, Utf8PathBuf::from("/work/checkout/out"));
}

#[test]
fn absolute_paths_are_kept() {
    let config = PackagerConfig::from_cli(
        &cli(&["--repo-root", "/elsewhere", "--version-file", "/tmp/__about__.py"]),
        Utf8Path::new("/work"),
    )
    .expect("config");

    assert_eq!(config.repo_root, Utf8PathBuf::from("/elsewhere"));
    assert_eq!(config.version_file, Utf8PathBuf::from("/tmp/__about__.py"));
}

#[test]
fn rid_comes_from_environment_when_flag_absent() {
    let parsed = temp_env::with_var(crate::runtime_id::RUNTIME_ID_ENV, Some("osx-x64"), || {
        Cli::parse_from(["redlines-packager"])
    });

    let config = PackagerConfig::from_cli(&parsed, Utf8Path::new("/work")).expect("config");

    assert_eq!(config.runtime_id.as_str(), "osx-x64");
}

#[rstest]
#[case::space("linux arm64")]
#[case::separator("../linux")]
#[case::shell("linux;rm")]
fn malformed_rid_is_rejected(#[case] rid: &str) {
    let err = PackagerConfig::from_cli(&cli(&["--rid", rid]), Utf8Path::new("/work"))
        .expect_err("invalid rid");

    assert!(matches!(err, PackagerError::InvalidRuntimeIdentifier { .. }));
}

#[test]
fn duplicate_publish_modes_are_rejected() {
    let err = PackagerConfig::from_cli(
        &cli(&["--publish-modes", "self-contained,self-contained"]),
        Utf8Path::new("/work"),
    )
    .expect_err("duplicate modes");

    assert!(matches!(err, PackagerError::InvalidConfiguration { .. }));
}

#[test]
fn empty_publish_modes_are_rejected() {
    let mut config = PackagerConfig::with_root(Utf8PathBuf::from("/repo"));
    config.publish_modes.clear();

    assert!(matches!(
        config.validate(),
        Err(PackagerError::InvalidConfiguration { .. })
    ));
}

#[test]
fn publish_base_follows_configuration_and_framework() {
    let mut config = PackagerConfig::with_root(Utf8PathBuf::from("/repo"));
    config.configuration = "Debug".to_owned();
    config.framework = "net8.0".to_owned();

    assert_eq!(
        config.publish_base(),
        Utf8PathBuf::from("/repo/csproj/bin/Debug/net8.0")
    );
}

#[test]
fn build_artifact_dirs_are_bin_and_obj() {
    let config = PackagerConfig::with_root(Utf8PathBuf::from("/repo"));
    assert_eq!(
        config.build_artifact_dirs(),
        vec![
            Utf8PathBuf::from("/repo/csproj/bin"),
            Utf8PathBuf::from("/repo/csproj/obj"),
        ]
    );
}

#[rstest]
#[case::tar_gz(ArchiveFormat::TarGz, "linux-arm64-2.3.1.tar.gz")]
#[case::zip(ArchiveFormat::Zip, "linux-arm64-2.3.1.zip")]
fn archive_name_combines_rid_version_and_extension(
    #[case] format: ArchiveFormat,
    #[case] expected: &str,
) {
    let mut config = PackagerConfig::with_root(Utf8PathBuf::from("/repo"));
    config.archive_format = format;

    assert_eq!(config.archive_name(&version("2.3.1")), expected);
    assert_eq!(
        config.archive_path(&version("2.3.1")),
        Utf8PathBuf::from("/repo/src/python_redlines/dist").join(expected)
    );
}
