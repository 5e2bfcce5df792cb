//! Command line runs of the packaged binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn command() -> Command {
    let mut cmd = Command::cargo_bin("kodegen_bundler_linux").expect("binary");
    cmd.env_remove("VERSION");
    cmd
}

#[test]
fn builds_deb_and_updates_manifest() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path();
    fs::create_dir_all(root.join("build")).expect("build dir");
    fs::write(root.join("build/myapp"), "#!/bin/sh\necho hi\n").expect("binary");
    fs::write(
        root.join("release.toml"),
        r#"
project_name = "myapp"
dist = "dist"

[[nfpms]]
formats = ["deb"]
maintainer = "Jane Doe <jane@example.com>"
description = "My app"
"#,
    )
    .expect("config");
    fs::write(
        root.join("artifacts.json"),
        r#"[
  {
    "name": "myapp",
    "path": "build/myapp",
    "type": "binary",
    "os": "linux",
    "arch": "amd64",
    "amd64": "v1"
  }
]"#,
    )
    .expect("manifest");

    command()
        .current_dir(root)
        .args(["--config", "release.toml", "--artifacts", "artifacts.json"])
        .args(["--version", "2.0.0", "--skip-sign"])
        .assert()
        .success()
        .stdout(predicate::str::contains("myapp_2.0.0_linux_amd64.deb"));

    assert!(root.join("dist/myapp_2.0.0_linux_amd64.deb").is_file());
    let manifest = fs::read_to_string(root.join("artifacts.json")).expect("manifest");
    assert!(manifest.contains("\"linux_package\""));
    assert!(manifest.contains("\"format\": \"deb\""));
}

#[test]
fn missing_config_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");

    command()
        .current_dir(tmp.path())
        .args(["--config", "nope.toml", "--version", "1.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config"));
}

#[test]
fn version_is_required() {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::write(
        tmp.path().join("release.toml"),
        "project_name = \"myapp\"\n",
    )
    .expect("config");

    command()
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--version"));
}

#[test]
fn help_lists_built_in_formats() {
    command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Built-in formats: deb, termux.deb"));
}

#[test]
fn unregistered_format_is_reported() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path();
    fs::write(root.join("myapp"), "#!/bin/sh\n").expect("binary");
    fs::write(
        root.join("release.toml"),
        "project_name = \"myapp\"\n\n[[nfpms]]\nformats = [\"rpm\"]\n",
    )
    .expect("config");
    fs::write(
        root.join("artifacts.json"),
        r#"[{"name": "myapp", "path": "myapp", "type": "binary", "os": "linux", "arch": "arm64"}]"#,
    )
    .expect("manifest");

    command()
        .current_dir(root)
        .args(["--artifacts", "artifacts.json", "--version", "1.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no packager registered for format \"rpm\""));
}
