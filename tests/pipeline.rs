//! End-to-end packaging runs against the public bundler API.

mod common;

use common::{MockPackager, binary, bundler, deb_control, definition};
use kodegen_bundler_linux::bundler::{
    Artifact, ArtifactKind, Error, PackagerRegistry, TERMUX_FORMAT, TaskOutcome,
};
use std::{collections::HashMap, time::Duration};

fn packaged(outcomes: &[TaskOutcome]) -> Vec<String> {
    let mut names: Vec<String> = outcomes
        .iter()
        .filter_map(TaskOutcome::artifact)
        .map(|a| a.name.clone())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn deb_and_rpm_share_one_binary() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dist = tmp.path().join("dist");
    let rpm = MockPackager::with_extension(".rpm");
    let registry = PackagerRegistry::linux().with("rpm", rpm.clone());
    let bin = binary(tmp.path(), "linux", "amd64", "");
    let (bundler, store) = bundler(&dist, registry, vec![bin.clone()], |b| b);

    let outcomes = bundler
        .bundle(&[definition(&["deb", "rpm"])])
        .await
        .expect("bundle");

    assert_eq!(
        packaged(&outcomes),
        vec!["foo_1.0.0_linux_amd64.deb", "foo_1.0.0_linux_amd64.rpm"]
    );

    let packages = store.filter(|a| a.kind == ArtifactKind::LinuxPackage);
    assert_eq!(packages.len(), 2);
    let mut formats: Vec<_> = packages.iter().map(|a| a.extra.format.as_str()).collect();
    formats.sort();
    assert_eq!(formats, vec!["deb", "rpm"]);
    for package in &packages {
        assert_eq!(package.extra.builds, vec![bin.clone()]);
        assert_eq!(package.extra.id, "foo");
        assert!(package.path.exists());
        assert_eq!(package.extra.checksum.as_ref().map(String::len), Some(64));
    }

    let deb = std::fs::read(dist.join("foo_1.0.0_linux_amd64.deb")).expect("deb file");
    assert!(deb.starts_with(b"!<arch>\n"));
    assert_eq!(rpm.seen()[0].contents[0].destination, "/usr/bin/foo");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tasks_respect_parallelism_budget() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let apk = MockPackager {
        extension: Some(".apk"),
        delay: Duration::from_millis(30),
        ..Default::default()
    };
    let registry = PackagerRegistry::new().with("apk", apk.clone());
    let binaries = ["amd64", "arm64", "386", "ppc64le", "s390x", "riscv64"]
        .iter()
        .map(|arch| binary(tmp.path(), "linux", arch, ""))
        .collect();
    let (bundler, store) = bundler(&tmp.path().join("dist"), registry, binaries, |b| {
        b.parallelism(2)
    });

    let outcomes = bundler.bundle(&[definition(&["apk"])]).await.expect("bundle");

    assert_eq!(outcomes.len(), 6);
    assert_eq!(store.filter(|a| a.kind == ArtifactKind::LinuxPackage).len(), 6);
    assert!(apk.peak() <= 2, "peak concurrency was {}", apk.peak());
}

#[tokio::test]
async fn first_failure_is_reported_after_all_tasks_finish() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let apk = MockPackager {
        extension: Some(".apk"),
        fail_arch: Some("arm64"),
        ..Default::default()
    };
    let registry = PackagerRegistry::new().with("apk", apk.clone());
    let binaries = ["amd64", "arm64", "386"]
        .iter()
        .map(|arch| binary(tmp.path(), "linux", arch, ""))
        .collect();
    let (bundler, store) = bundler(&tmp.path().join("dist"), registry, binaries, |b| {
        b.parallelism(1)
    });

    let err = bundler
        .bundle(&[definition(&["apk"])])
        .await
        .expect_err("arm64 fails");

    match err {
        Error::Packaging { file, .. } => assert_eq!(file, "foo_1.0.0_linux_arm64.apk"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(apk.seen().len(), 3);
    assert_eq!(store.filter(|a| a.kind == ArtifactKind::LinuxPackage).len(), 2);
}

#[tokio::test]
async fn ios_binaries_only_become_debs() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let rpm = MockPackager::with_extension(".rpm");
    let registry = PackagerRegistry::linux().with("rpm", rpm.clone());
    let bin = binary(tmp.path(), "ios", "arm64", "");
    let (bundler, store) = bundler(&tmp.path().join("dist"), registry, vec![bin], |b| b);

    let mut def = definition(&["deb", "rpm"]);
    def.overridables.file_name_template = "{{ConventionalFileName}}".into();
    let outcomes = bundler.bundle(&[def]).await.expect("bundle");

    assert_eq!(packaged(&outcomes), vec!["foo_1.0.0_iphoneos-arm64.deb"]);
    assert!(outcomes.iter().any(|o| matches!(
        o,
        TaskOutcome::Skipped { format, .. } if format == "rpm"
    )));
    assert!(rpm.seen().is_empty());
    assert_eq!(store.filter(|a| a.kind == ArtifactKind::LinuxPackage).len(), 1);
}

#[tokio::test]
async fn termux_skips_unsupported_arches_and_keeps_its_extension() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let binaries = vec![
        binary(tmp.path(), "linux", "amd64", ""),
        binary(tmp.path(), "linux", "arm", "6"),
    ];
    let (bundler, store) = bundler(
        &tmp.path().join("dist"),
        PackagerRegistry::linux(),
        binaries,
        |b| b,
    );

    let outcomes = bundler
        .bundle(&[definition(&[TERMUX_FORMAT])])
        .await
        .expect("bundle");

    assert_eq!(packaged(&outcomes), vec!["foo_1.0.0_linux_amd64.termux.deb"]);
    assert!(outcomes.iter().any(|o| matches!(
        o,
        TaskOutcome::Skipped { reason, .. } if reason.contains("arm6")
    )));

    let package = &store.filter(|a| a.kind == ArtifactKind::LinuxPackage)[0];
    assert_eq!(package.extra.format, TERMUX_FORMAT);
    assert!(
        package
            .extra
            .files
            .iter()
            .any(|f| f.destination == "/data/data/com.termux/files/usr/bin/foo")
    );
}

#[tokio::test]
async fn conventional_name_gets_extension_once() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let bin = binary(tmp.path(), "linux", "arm64", "");
    let (bundler, _) = bundler(
        &tmp.path().join("dist"),
        PackagerRegistry::linux(),
        vec![bin],
        |b| b,
    );

    let mut def = definition(&["deb"]);
    def.overridables.file_name_template = "{{ConventionalFileName}}".into();
    let outcomes = bundler.bundle(&[def]).await.expect("bundle");

    assert_eq!(packaged(&outcomes), vec!["foo_1.0.0_arm64.deb"]);
}

#[tokio::test]
async fn skip_sign_clears_signatures() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let rpm = MockPackager::with_extension(".rpm");
    let registry = PackagerRegistry::new().with("rpm", rpm.clone());
    let bin = binary(tmp.path(), "linux", "amd64", "");
    let env = HashMap::from([("NFPM_FOO_RPM_PASSPHRASE".to_string(), "secret".to_string())]);

    let mut def = definition(&["rpm"]);
    def.overridables.rpm.signature.key_file = "/keys/rpm.gpg".into();

    let (signed, _) = bundler(
        &tmp.path().join("signed"),
        registry.clone(),
        vec![bin.clone()],
        |b| b.env(env.clone()),
    );
    signed.bundle(std::slice::from_ref(&def)).await.expect("signed");
    let info = &rpm.seen()[0];
    assert_eq!(info.rpm.signature.signature.key_file, "/keys/rpm.gpg");
    assert_eq!(info.rpm.signature.signature.key_passphrase, "secret");

    let (unsigned, _) = bundler(&tmp.path().join("unsigned"), registry, vec![bin], |b| {
        b.env(env.clone()).skip_sign(true)
    });
    unsigned.bundle(&[def]).await.expect("unsigned");
    let info = &rpm.seen()[1];
    assert!(info.rpm.signature.signature.key_file.is_empty());
    assert!(info.rpm.signature.signature.key_passphrase.is_empty());
}

#[tokio::test]
async fn format_overrides_apply_per_format() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let rpm = MockPackager::with_extension(".rpm");
    let apk = MockPackager::with_extension(".apk");
    let registry = PackagerRegistry::new()
        .with("rpm", rpm.clone())
        .with("apk", apk.clone());
    let bin = binary(tmp.path(), "linux", "amd64", "");
    let (bundler, _) = bundler(&tmp.path().join("dist"), registry, vec![bin], |b| b);

    let mut def = definition(&["rpm", "apk"]);
    def.overridables.dependencies = vec!["libc".into()];
    def.overrides.insert(
        "rpm".into(),
        kodegen_bundler_linux::bundler::Overridables {
            dependencies: vec!["glibc".into()],
            ..Default::default()
        },
    );
    bundler.bundle(&[def]).await.expect("bundle");

    assert_eq!(rpm.seen()[0].depends, vec!["glibc"]);
    assert_eq!(apk.seen()[0].depends, vec!["libc"]);
    assert_eq!(rpm.seen()[0].maintainer, "Foo Maintainers <foo@example.com>");
}

#[tokio::test]
async fn missing_binaries_fail_the_definition() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let bin = binary(tmp.path(), "darwin", "arm64", "");
    let (bundler, _) = bundler(
        &tmp.path().join("dist"),
        PackagerRegistry::linux(),
        vec![bin],
        |b| b,
    );

    let mut def = definition(&["deb"]);
    def.builds = vec!["foo".into()];
    let err = bundler.bundle(&[def]).await.expect_err("no linux binaries");

    assert!(matches!(err, Error::NoMatchingBinaries { ref builds } if builds == &["foo"]));
    assert_eq!(err.to_string(), "no linux binaries found for builds [\"foo\"]");
}

#[tokio::test]
async fn keep_going_attempts_every_definition() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let bin = binary(tmp.path(), "linux", "amd64", "");
    let (bundler, store) = bundler(
        &tmp.path().join("dist"),
        PackagerRegistry::linux(),
        vec![bin],
        |b| b.keep_going(true),
    );

    let mut broken = definition(&["deb"]);
    broken.id = "broken".into();
    broken.builds = vec!["other".into()];
    let mut skipped = definition(&[]);
    skipped.id = "no-formats".into();
    let good = definition(&["deb"]);

    let err = bundler
        .bundle(&[broken, skipped, good])
        .await
        .expect_err("first definition fails");

    assert!(matches!(err, Error::NoMatchingBinaries { .. }));
    assert_eq!(store.filter(|a| a.kind == ArtifactKind::LinuxPackage).len(), 1);
}

#[tokio::test]
async fn unknown_format_is_a_task_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let bin = binary(tmp.path(), "linux", "amd64", "");
    let (bundler, _) = bundler(
        &tmp.path().join("dist"),
        PackagerRegistry::linux(),
        vec![bin],
        |b| b,
    );

    let err = bundler
        .bundle(&[definition(&["snap"])])
        .await
        .expect_err("snap is not registered");
    assert!(matches!(err, Error::UnknownFormat(f) if f == "snap"));
}

#[tokio::test]
async fn termux_deb_control_keeps_termux_arch() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let binaries = vec![
        binary(tmp.path(), "linux", "amd64", ""),
        binary(tmp.path(), "linux", "arm64", ""),
    ];
    let (bundler, store) = bundler(
        &tmp.path().join("dist"),
        PackagerRegistry::linux(),
        binaries,
        |b| b,
    );

    bundler
        .bundle(&[definition(&[TERMUX_FORMAT])])
        .await
        .expect("bundle");

    let packages = store.filter(|a| a.kind == ArtifactKind::LinuxPackage);
    assert_eq!(packages.len(), 2);
    for package in &packages {
        let expected = match package.arch.as_str() {
            "amd64" => "Architecture: x86_64\n",
            "arm64" => "Architecture: aarch64\n",
            other => panic!("unexpected arch {other}"),
        };
        let control = deb_control(&package.path);
        assert!(control.contains(expected), "{}: {control}", package.name);
    }
}

#[tokio::test]
async fn lintian_files_are_unique_per_platform() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let binaries = vec![
        binary(tmp.path(), "linux", "arm64", ""),
        binary(tmp.path(), "ios", "arm64", ""),
    ];
    let (bundler, store) = bundler(
        &tmp.path().join("dist"),
        PackagerRegistry::linux(),
        binaries,
        |b| b,
    );

    let mut def = definition(&["deb"]);
    def.overridables.deb.lintian_overrides = vec!["statically-linked-binary".into()];
    bundler.bundle(&[def]).await.expect("bundle");

    let packages = store.filter(|a| a.kind == ArtifactKind::LinuxPackage);
    assert_eq!(packages.len(), 2);
    let sources: Vec<String> = packages
        .iter()
        .map(|package| {
            let lintian = package
                .extra
                .files
                .iter()
                .find(|f| f.destination.ends_with("/usr/share/lintian/overrides/foo"))
                .expect("lintian entry");
            assert_eq!(
                std::fs::read_to_string(&lintian.source).expect("lintian file"),
                "foo: statically-linked-binary"
            );
            lintian.source.clone()
        })
        .collect();
    assert_ne!(sources[0], sources[1]);
}

#[tokio::test]
async fn binaries_sharing_a_destination_collide() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let v1 = binary(tmp.path(), "linux", "amd64", "");
    let v3_path = tmp.path().join("foo_linux_amd64_v3/foo");
    std::fs::create_dir_all(v3_path.parent().expect("parent")).expect("v3 dir");
    std::fs::write(&v3_path, b"#!/bin/sh\necho v3\n").expect("v3 binary");
    let v3 = Artifact {
        path: v3_path,
        amd64: "v3".into(),
        ..v1.clone()
    };
    let (bundler, store) = bundler(
        &tmp.path().join("dist"),
        PackagerRegistry::linux(),
        vec![v1, v3],
        |b| b,
    );

    let err = bundler
        .bundle(&[definition(&["deb"])])
        .await
        .expect_err("two binaries at /usr/bin/foo");

    assert!(matches!(err, Error::Packaging { .. }));
    assert!(err.to_string().contains("content collision: usr/bin/foo"), "{err}");
    assert!(store.filter(|a| a.kind == ArtifactKind::LinuxPackage).is_empty());
}

#[tokio::test]
async fn template_failure_fails_the_task() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let rpm = MockPackager::with_extension(".rpm");
    let registry = PackagerRegistry::new().with("rpm", rpm.clone());
    let bin = binary(tmp.path(), "linux", "amd64", "");
    let (bundler, store) = bundler(&tmp.path().join("dist"), registry, vec![bin], |b| b);

    let mut def = definition(&["rpm"]);
    def.overridables.maintainer = "{{Nope}}".into();
    let err = bundler.bundle(&[def]).await.expect_err("undefined field");

    assert!(matches!(err, Error::Template { ref template, .. } if template == "{{Nope}}"));
    assert!(rpm.seen().is_empty());
    assert!(store.filter(|a| a.kind == ArtifactKind::LinuxPackage).is_empty());
}

#[tokio::test]
async fn lintian_write_failure_fails_the_task() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dist = tmp.path().join("dist");
    std::fs::create_dir_all(&dist).expect("dist");
    std::fs::write(dist.join("deb"), "not a directory").expect("blocker");
    let bin = binary(tmp.path(), "linux", "amd64", "");
    let (bundler, store) = bundler(&dist, PackagerRegistry::linux(), vec![bin], |b| b);

    let mut def = definition(&["deb"]);
    def.overridables.deb.lintian_overrides = vec!["statically-linked-binary".into()];
    let err = bundler.bundle(&[def]).await.expect_err("lintian dir blocked");

    assert!(matches!(err, Error::Fs { .. }), "unexpected error: {err}");
    assert!(store.filter(|a| a.kind == ArtifactKind::LinuxPackage).is_empty());
}
