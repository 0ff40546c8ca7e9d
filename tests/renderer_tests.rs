use std::os::unix::fs::PermissionsExt;

use resume_render_api::renderer::rendercv::{RenderCvInvoker, RenderError};

/// Drop an executable stand-in for the rendercv CLI into a temp dir.
fn fake_renderer(script_body: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let script = dir.path().join("fake_rendercv.sh");
    std::fs::write(&script, format!("#!/bin/sh\n{script_body}\n")).expect("write script");
    let mut perms = std::fs::metadata(&script).expect("script metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).expect("make script executable");
    let command = script.to_string_lossy().into_owned();
    (dir, command)
}

#[tokio::test]
async fn successful_render_returns_pdf_bytes() {
    let (_guard, command) = fake_renderer(
        "mkdir -p rendercv_output\nprintf '%%PDF-1.4 fake body' > rendercv_output/resume.pdf",
    );
    let invoker = RenderCvInvoker::new(command);

    let bytes = invoker.render_pdf("cv:\n  name: Test\n").await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn nonzero_exit_surfaces_stderr() {
    let (_guard, command) = fake_renderer("echo 'boom: bad yaml' >&2\nexit 3");
    let invoker = RenderCvInvoker::new(command);

    let err = invoker.render_pdf("nonsense").await.unwrap_err();
    match err {
        RenderError::CommandFailed(diagnostic) => {
            assert!(diagnostic.contains("boom: bad yaml"));
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn nonzero_exit_without_output_reports_unknown_error() {
    let invoker = RenderCvInvoker::new("/bin/false");

    let err = invoker.render_pdf("cv: {}").await.unwrap_err();
    match err {
        RenderError::CommandFailed(diagnostic) => assert_eq!(diagnostic, "Unknown error"),
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn zero_exit_without_output_dir_is_an_error() {
    let invoker = RenderCvInvoker::new("/bin/true");

    let err = invoker.render_pdf("cv: {}").await.unwrap_err();
    assert!(matches!(err, RenderError::MissingOutputDir { .. }));
}

#[tokio::test]
async fn output_dir_without_pdf_enumerates_found_files() {
    let (_guard, command) =
        fake_renderer("mkdir -p rendercv_output\necho log > rendercv_output/render.log");
    let invoker = RenderCvInvoker::new(command);

    let err = invoker.render_pdf("cv: {}").await.unwrap_err();
    match err {
        RenderError::NoPdfProduced(files) => assert_eq!(files, vec!["render.log"]),
        other => panic!("expected NoPdfProduced, got {other:?}"),
    }
}
