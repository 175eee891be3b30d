// tests/job_pipeline.rs

mod common;

use std::error::Error;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use hindsight_worker::errors::JobError;
use hindsight_worker::extract::{PASSWORD_INCORRECT_MESSAGE, PASSWORD_REQUIRED_MESSAGE};
use hindsight_worker::fs::RealFileSystem;
use hindsight_worker::job::{Job, JobFailure, JobState, ReportSpec};
use hindsight_worker::output::JobResult;
use hindsight_worker::types::InputDescriptor;
use hindsight_worker_test_utils::builders::JobRequestBuilder;
use hindsight_worker_test_utils::fake_extractor::{FakeExtractor, FAKE_ROOT};
use hindsight_worker_test_utils::fake_tool::FakeTool;
use hindsight_worker_test_utils::with_timeout;

use crate::common::{CHROME_DIR, CHROME_HINT};

type TestResult = Result<(), Box<dyn Error>>;

const REPORT_NAME: &str = "Hindsight Report (2024-01-01T12-00-00).xlsx";

fn job(extractor: &FakeExtractor, tool: &FakeTool) -> Result<Job, JobError> {
    Ok(Job::new(
        Arc::new(RealFileSystem),
        Arc::new(extractor.clone()),
        Arc::new(tool.clone()),
        ReportSpec::hindsight()?,
    ))
}

fn no_progress(_: &str) {}

fn names_in(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    names.sort();
    Ok(names)
}

fn expect_failure(outcome: Result<JobResult, JobFailure>) -> JobFailure {
    match outcome {
        Ok(result) => panic!("expected the job to fail, got {result:?}"),
        Err(failure) => failure,
    }
}

#[tokio::test]
async fn successful_run_yields_report_and_log() -> TestResult {
    common::init_tracing();
    let out = TempDir::new()?;
    let extractor = FakeExtractor::new().with_dirs(&[CHROME_DIR]);
    let tool = FakeTool::new()
        .with_lines(&["Hindsight v2024.01", "Processing Chrome profile", "Done"])
        .writing_report(REPORT_NAME);
    let request = JobRequestBuilder::new(out.path())
        .browser_profile(CHROME_HINT)
        .workflow_id("wf-1")
        .build();

    let events = AtomicUsize::new(0);
    let progress = |_: &str| {
        events.fetch_add(1, Ordering::SeqCst);
    };
    let result = with_timeout(job(&extractor, &tool)?.run(request, &progress)).await?;

    assert_eq!(events.load(Ordering::SeqCst), 3);
    assert_eq!(result.workflow_id.as_deref(), Some("wf-1"));
    assert_eq!(result.output_files.len(), 2);

    let report = &result.output_files[0];
    assert_eq!(report["display_name"], REPORT_NAME);
    assert_eq!(report["data_type"], "openrelik:hindsight:report");
    assert_eq!(report["extension"], "xlsx");
    assert!(Path::new(&report["path"]).is_file());

    let log = &result.output_files[1];
    assert!(log["display_name"].starts_with("hindsight_"));
    assert!(log["display_name"].ends_with("_log.txt"));
    assert!(!log.contains_key("data_type"));
    let log_text = std::fs::read_to_string(&log["path"])?;
    assert!(log_text.contains("Processing Chrome profile"));

    // The tool ran against the resolved profile, and the audit string names it.
    let profile = out.path().join(FAKE_ROOT).join(CHROME_DIR);
    assert_eq!(tool.runs(), vec![profile.clone()]);
    assert_eq!(result.meta["profile_path"], profile.to_string_lossy());
    assert!(result.command.starts_with("hindsight.py -i "));
    assert!(result.command.contains("User Data/Default"));

    // Report moved, extraction root gone.
    assert!(!out.path().join(REPORT_NAME).exists());
    assert!(!out.path().join(FAKE_ROOT).exists());
    Ok(())
}

#[tokio::test]
async fn success_without_report_keeps_log_only() -> TestResult {
    let out = TempDir::new()?;
    let extractor = FakeExtractor::new().with_dirs(&[CHROME_DIR]);
    let tool = FakeTool::new().with_lines(&["nothing to parse"]);
    let request = JobRequestBuilder::new(out.path())
        .browser_profile(CHROME_HINT)
        .build();

    let failure = expect_failure(job(&extractor, &tool)?.run(request, &no_progress).await);

    assert_eq!(failure.stage, JobState::CollectingOutput);
    assert!(matches!(failure.error, JobError::NoReport(ref tool) if tool == "Hindsight"));
    assert_eq!(
        failure.error.to_string(),
        "Hindsight did not produce a report file. See the attached log for details."
    );
    assert_eq!(failure.output_files.len(), 1);
    let log = &failure.output_files[0];
    assert!(log.display_name.ends_with("_log.txt"));
    assert_eq!(std::fs::read_to_string(log.path())?, "nothing to parse\n");

    assert!(!out.path().join(FAKE_ROOT).exists());
    Ok(())
}

#[tokio::test]
async fn stale_report_from_previous_run_is_ignored() -> TestResult {
    let out = TempDir::new()?;
    let stale = out.path().join("Hindsight Report (old).xlsx");
    std::fs::write(&stale, b"old")?;
    std::fs::File::options()
        .write(true)
        .open(&stale)?
        .set_modified(SystemTime::now() - Duration::from_secs(3600))?;

    let extractor = FakeExtractor::new().with_dirs(&[CHROME_DIR]);
    let tool = FakeTool::new();
    let request = JobRequestBuilder::new(out.path())
        .browser_profile(CHROME_HINT)
        .build();

    let failure = expect_failure(job(&extractor, &tool)?.run(request, &no_progress).await);

    assert!(matches!(failure.error, JobError::NoReport(_)));
    assert!(stale.is_file());
    Ok(())
}

#[tokio::test]
async fn archive_without_password_asks_for_one() -> TestResult {
    let out = TempDir::new()?;
    let extractor = FakeExtractor::new().failing_with("Password required to decrypt file");
    let tool = FakeTool::new().writing_report(REPORT_NAME);
    let request = JobRequestBuilder::new(out.path())
        .browser_profile(CHROME_HINT)
        .build();

    let failure = expect_failure(job(&extractor, &tool)?.run(request, &no_progress).await);

    assert_eq!(failure.stage, JobState::Extracting);
    match &failure.error {
        JobError::Extraction(msg) => assert_eq!(msg, PASSWORD_REQUIRED_MESSAGE),
        other => panic!("expected Extraction error, got {other:?}"),
    }
    assert!(failure.output_files.is_empty());
    assert!(tool.runs().is_empty());
    assert!(!out.path().join(FAKE_ROOT).exists());
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_suggested_when_one_was_given() -> TestResult {
    let out = TempDir::new()?;
    let extractor = FakeExtractor::new().failing_with("invalid checksum");
    let tool = FakeTool::new();
    let request = JobRequestBuilder::new(out.path())
        .browser_profile(CHROME_HINT)
        .archive_password("hunter2")
        .build();

    let failure = expect_failure(job(&extractor, &tool)?.run(request, &no_progress).await);

    match &failure.error {
        JobError::Extraction(msg) => assert_eq!(msg, PASSWORD_INCORRECT_MESSAGE),
        other => panic!("expected Extraction error, got {other:?}"),
    }
    assert_eq!(extractor.passwords(), vec![Some("hunter2".to_string())]);
    Ok(())
}

#[tokio::test]
async fn empty_password_counts_as_none() -> TestResult {
    let out = TempDir::new()?;
    let extractor = FakeExtractor::new().failing_with("archive is protected");
    let request = JobRequestBuilder::new(out.path())
        .browser_profile(CHROME_HINT)
        .archive_password("")
        .build();

    let failure =
        expect_failure(job(&extractor, &FakeTool::new())?.run(request, &no_progress).await);

    assert!(matches!(failure.error, JobError::Extraction(ref m) if m == PASSWORD_REQUIRED_MESSAGE));
    assert_eq!(extractor.passwords(), vec![None]);
    Ok(())
}

#[tokio::test]
async fn unrelated_extraction_failure_propagates() -> TestResult {
    let out = TempDir::new()?;
    let extractor = FakeExtractor::new().failing_with("invalid Zip archive: no end of central directory");
    let request = JobRequestBuilder::new(out.path())
        .browser_profile(CHROME_HINT)
        .build();

    let failure =
        expect_failure(job(&extractor, &FakeTool::new())?.run(request, &no_progress).await);

    assert!(matches!(failure.error, JobError::Other(_)));
    assert!(failure.error.to_string().contains("no end of central directory"));
    Ok(())
}

#[tokio::test]
async fn unresolvable_profile_cleans_up_and_skips_tool() -> TestResult {
    let out = TempDir::new()?;
    let extractor = FakeExtractor::new().with_dirs(&["C/Users/Ryan/Documents"]);
    let tool = FakeTool::new().writing_report(REPORT_NAME);
    let request = JobRequestBuilder::new(out.path())
        .browser_profile(CHROME_HINT)
        .build();

    let failure = expect_failure(job(&extractor, &tool)?.run(request, &no_progress).await);

    assert_eq!(failure.stage, JobState::ResolvingProfile);
    assert!(matches!(failure.error, JobError::NotFound { ref hint } if hint == CHROME_HINT));
    assert!(failure.output_files.is_empty());
    assert!(tool.runs().is_empty());
    assert!(!out.path().join(FAKE_ROOT).exists());
    Ok(())
}

#[tokio::test]
async fn tool_failure_keeps_log_and_cleans_up() -> TestResult {
    let out = TempDir::new()?;
    let extractor = FakeExtractor::new().with_dirs(&[CHROME_DIR]);
    let tool = FakeTool::new()
        .with_lines(&["Traceback (most recent call last):", "KeyError: 'urls'"])
        .exiting_with(1);
    let request = JobRequestBuilder::new(out.path())
        .browser_profile(CHROME_HINT)
        .build();

    let failure = expect_failure(job(&extractor, &tool)?.run(request, &no_progress).await);

    assert_eq!(failure.stage, JobState::Running);
    assert!(failure.to_string().starts_with("job failed while running:"));
    match &failure.error {
        JobError::Execution { code, tail, .. } => {
            assert_eq!(*code, 1);
            assert!(tail.contains("KeyError"));
        }
        other => panic!("expected Execution error, got {other:?}"),
    }
    assert_eq!(failure.output_files.len(), 1);
    assert!(failure.output_files[0].path().is_file());
    assert!(!out.path().join(FAKE_ROOT).exists());
    Ok(())
}

#[tokio::test]
async fn validation_failures_never_extract() -> TestResult {
    let out = TempDir::new()?;
    let extractor = FakeExtractor::new().with_dirs(&[CHROME_DIR]);
    let tool = FakeTool::new();
    let job = job(&extractor, &tool)?;

    let missing_hint = JobRequestBuilder::new(out.path()).build();
    let failure = expect_failure(job.run(missing_hint, &no_progress).await);
    assert_eq!(failure.stage, JobState::Validating);
    assert!(matches!(failure.error, JobError::Validation(_)));

    let two_inputs = JobRequestBuilder::new(out.path())
        .browser_profile(CHROME_HINT)
        .inputs(vec![
            InputDescriptor::new("/evidence/a.zip"),
            InputDescriptor::new("/evidence/b.zip"),
        ])
        .build();
    let failure = expect_failure(job.run(two_inputs, &no_progress).await);
    assert_eq!(failure.stage, JobState::Validating);

    let not_zip = JobRequestBuilder::new(out.path())
        .browser_profile(CHROME_HINT)
        .inputs(vec![InputDescriptor::new("/evidence/History.sqlite")])
        .build();
    let failure = expect_failure(job.run(not_zip, &no_progress).await);
    assert_eq!(failure.stage, JobState::Validating);

    assert_eq!(extractor.calls(), 0);
    assert!(names_in(out.path())?.is_empty());
    Ok(())
}

#[tokio::test]
async fn job_can_be_reused_across_runs() -> TestResult {
    let out1 = TempDir::new()?;
    let out2 = TempDir::new()?;
    let extractor = FakeExtractor::new().with_dirs(&[CHROME_DIR]);
    let tool = FakeTool::new().writing_report(REPORT_NAME);
    let job = job(&extractor, &tool)?;

    for out in [&out1, &out2] {
        let request = JobRequestBuilder::new(out.path())
            .browser_profile(CHROME_HINT)
            .build();
        let result = job.run(request, &no_progress).await?;
        assert_eq!(result.output_files.len(), 2);
        // Only the two registered artifacts and the extraction log remain.
        assert_eq!(names_in(out.path())?.len(), 3);
    }
    assert_eq!(tool.runs().len(), 2);
    Ok(())
}

#[tokio::test]
async fn result_feeds_a_follow_up_job() -> TestResult {
    let out = TempDir::new()?;
    let extractor = FakeExtractor::new().with_dirs(&[CHROME_DIR]);
    let tool = FakeTool::new().writing_report(REPORT_NAME);
    let request = JobRequestBuilder::new(out.path())
        .browser_profile(CHROME_HINT)
        .build();

    let result = job(&extractor, &tool)?.run(request, &no_progress).await?;
    let parsed = JobResult::from_json(&result.to_json()?)?;
    assert_eq!(parsed, result);

    let inputs = parsed.input_descriptors();
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[0].effective_display_name(), REPORT_NAME);
    Ok(())
}
