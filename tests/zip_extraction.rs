// tests/zip_extraction.rs

mod common;

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use tempfile::TempDir;

use hindsight_worker::errors::JobError;
use hindsight_worker::extract::{
    translate_extraction_error, ArchiveExtractor, ZipExtractor, PASSWORD_INCORRECT_MESSAGE,
    PASSWORD_REQUIRED_MESSAGE,
};
use hindsight_worker::fs::RealFileSystem;
use hindsight_worker::job::{Job, ReportSpec};
use hindsight_worker::types::InputDescriptor;
use hindsight_worker_test_utils::builders::{write_zip, JobRequestBuilder};
use hindsight_worker_test_utils::fake_tool::FakeTool;

use crate::common::{fixture, CHROME_DIR, CHROME_HINT};

type TestResult = Result<(), Box<dyn Error>>;

const FIXTURE_PASSWORD: &str = "secret";

fn extraction_roots(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut roots = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name.starts_with("extract_") && !name.ends_with(".log") {
            roots.push(name);
        }
    }
    Ok(roots)
}

#[test]
fn plain_archive_is_expanded_under_fresh_root() -> TestResult {
    common::init_tracing();
    let tmp = TempDir::new()?;
    let archive = tmp.path().join("host1.zip");
    write_zip(
        &archive,
        &[
            ("C/", ""),
            ("C/Users/Ryan/Default/History", "SQLite format 3"),
            ("C/Users/Ryan/Default/Preferences", "{}"),
        ],
    )?;
    let out = tmp.path().join("out");
    std::fs::create_dir_all(&out)?;
    let log = out.join("extract_host1.zip.log");

    let result = ZipExtractor::new().extract(&InputDescriptor::new(&archive), &out, &log, None)?;

    assert!(result.root.starts_with(&out));
    assert!(result
        .root
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("extract_")));
    assert_eq!(
        std::fs::read(result.root.join("C/Users/Ryan/Default/History"))?,
        b"SQLite format 3"
    );
    assert_eq!(result.log_path, log);
    let log_text = std::fs::read_to_string(&log)?;
    assert!(log_text.contains("History"));
    assert!(log_text.contains("done: 2 files"));
    Ok(())
}

#[test]
fn each_extraction_gets_its_own_root() -> TestResult {
    let tmp = TempDir::new()?;
    let archive = tmp.path().join("a.zip");
    write_zip(&archive, &[("file.txt", "x")])?;
    let log = tmp.path().join("extract.log");
    let input = InputDescriptor::new(&archive);

    let first = ZipExtractor::new().extract(&input, tmp.path(), &log, None)?;
    let second = ZipExtractor::new().extract(&input, tmp.path(), &log, None)?;

    assert_ne!(first.root, second.root);
    Ok(())
}

#[test]
fn encrypted_archive_without_password_fails_cleanly() -> TestResult {
    let out = TempDir::new()?;
    let log = out.path().join("extract.log");
    let input = InputDescriptor::new(fixture("encrypted_profile.zip"));

    let err = ZipExtractor::new()
        .extract(&input, out.path(), &log, None)
        .unwrap_err();

    assert!(format!("{err:#}").to_lowercase().contains("password"));
    assert!(extraction_roots(out.path())?.is_empty());
    assert!(std::fs::read_to_string(&log)?.contains("ERROR:"));

    match translate_extraction_error(err, false) {
        JobError::Extraction(msg) => assert_eq!(msg, PASSWORD_REQUIRED_MESSAGE),
        other => panic!("expected Extraction error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn encrypted_archive_with_password_is_decrypted() -> TestResult {
    let out = TempDir::new()?;
    let log = out.path().join("extract.log");
    let input = InputDescriptor::new(fixture("encrypted_profile.zip"));

    let result = ZipExtractor::new().extract(&input, out.path(), &log, Some(FIXTURE_PASSWORD))?;

    let history = result.root.join(CHROME_DIR).join("History");
    assert_eq!(std::fs::read_to_string(history)?, "sqlite");
    Ok(())
}

#[test]
fn encrypted_archive_with_wrong_password_fails_cleanly() -> TestResult {
    let out = TempDir::new()?;
    let log = out.path().join("extract.log");
    let input = InputDescriptor::new(fixture("encrypted_profile.zip"));

    let err = ZipExtractor::new()
        .extract(&input, out.path(), &log, Some("hunter2"))
        .unwrap_err();

    assert!(extraction_roots(out.path())?.is_empty());
    match translate_extraction_error(err, true) {
        JobError::Extraction(msg) => assert_eq!(msg, PASSWORD_INCORRECT_MESSAGE),
        other => panic!("expected Extraction error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn entries_escaping_the_root_are_rejected() -> TestResult {
    let tmp = TempDir::new()?;
    let archive = tmp.path().join("evil.zip");
    write_zip(&archive, &[("ok.txt", "fine"), ("../escaped.txt", "pwned")])?;
    let out = tmp.path().join("out");
    std::fs::create_dir_all(&out)?;

    let err = ZipExtractor::new()
        .extract(&InputDescriptor::new(&archive), &out, &out.join("x.log"), None)
        .unwrap_err();

    assert!(err.to_string().contains("escapes the extraction root"));
    assert!(!tmp.path().join("escaped.txt").exists());
    assert!(extraction_roots(&out)?.is_empty());
    Ok(())
}

#[test]
fn corrupt_archive_is_not_mistaken_for_encryption() -> TestResult {
    let tmp = TempDir::new()?;
    let archive = tmp.path().join("broken.zip");
    std::fs::write(&archive, b"definitely not a zip file")?;

    let err = ZipExtractor::new()
        .extract(&InputDescriptor::new(&archive), tmp.path(), &tmp.path().join("x.log"), None)
        .unwrap_err();

    assert!(matches!(translate_extraction_error(err, false), JobError::Other(_)));
    Ok(())
}

#[test]
fn translation_matches_password_markers_case_insensitively() {
    for message in [
        "Password required to decrypt file",
        "Archive is PROTECTED",
        "7z: Execution Error",
    ] {
        match translate_extraction_error(anyhow!("{message}"), false) {
            JobError::Extraction(msg) => assert_eq!(msg, PASSWORD_REQUIRED_MESSAGE),
            other => panic!("{message}: expected Extraction error, got {other:?}"),
        }
    }
}

#[test]
fn translation_looks_at_the_whole_error_chain() {
    let err = anyhow!("Password required to decrypt file").context("reading entry 9");
    assert!(matches!(
        translate_extraction_error(err, false),
        JobError::Extraction(_)
    ));
}

#[test]
fn any_failure_with_password_suggests_wrong_password() {
    let err = anyhow!("crc mismatch");
    match translate_extraction_error(err, true) {
        JobError::Extraction(msg) => assert_eq!(msg, PASSWORD_INCORRECT_MESSAGE),
        other => panic!("expected Extraction error, got {other:?}"),
    }
}

#[tokio::test]
async fn encrypted_collection_runs_end_to_end() -> TestResult {
    let out = TempDir::new()?;
    let tool = FakeTool::new()
        .with_lines(&["parsed"])
        .writing_report("Hindsight Report (test).xlsx");
    let job = Job::new(
        Arc::new(RealFileSystem),
        Arc::new(ZipExtractor::new()),
        Arc::new(tool.clone()),
        ReportSpec::hindsight()?,
    );
    let request = JobRequestBuilder::new(out.path())
        .inputs(vec![InputDescriptor::new(fixture("encrypted_profile.zip"))])
        .browser_profile(CHROME_HINT)
        .archive_password(FIXTURE_PASSWORD)
        .build();

    let result = job.run(request, &|_: &str| {}).await?;

    assert_eq!(result.output_files.len(), 2);
    let runs = tool.runs();
    assert_eq!(runs.len(), 1);
    assert!(runs[0].ends_with(CHROME_DIR));
    assert!(extraction_roots(out.path())?.is_empty());
    Ok(())
}
