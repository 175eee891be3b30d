// src/job/orchestrator.rs

//! Sequencing of one job and its failure/cleanup policy.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Context;
use chrono::Utc;
use globset::GlobMatcher;
use tracing::{error, info, Instrument};

use crate::config::ConfigFile;
use crate::errors::{JobError, Result};
use crate::exec::{ProcessToolBackend, ProgressSink, ToolBackend, ToolCommand, ToolRequest};
use crate::extract::{translate_extraction_error, ArchiveExtractor, ZipExtractor};
use crate::fs::{FileSystem, RealFileSystem};
use crate::job::cleanup::ExtractionRoot;
use crate::job::collect;
use crate::job::validate::{require_profile_hint, validate_single_zip};
use crate::job::{JobFailure, JobRequest, JobState};
use crate::output::{JobResult, OutputFile};
use crate::resolve::find_browser_profile;
use crate::types::{ExtractionResult, InputDescriptor};

/// How to recognise and label the tool's report.
#[derive(Debug, Clone)]
pub struct ReportSpec {
    pub pattern: String,
    pub data_type: String,
    matcher: GlobMatcher,
}

impl ReportSpec {
    pub fn new(pattern: &str, data_type: &str) -> Result<Self> {
        Ok(Self {
            pattern: pattern.to_string(),
            data_type: data_type.to_string(),
            matcher: collect::report_matcher(pattern)?,
        })
    }

    pub fn hindsight() -> Result<Self> {
        Self::new("Hindsight Report *.xlsx", "openrelik:hindsight:report")
    }

    pub fn matcher(&self) -> &GlobMatcher {
        &self.matcher
    }
}

/// The job pipeline with its collaborators.
///
/// Holds no per-run state, so one `Job` can serve many runs.
pub struct Job {
    fs: Arc<dyn FileSystem>,
    extractor: Arc<dyn ArchiveExtractor>,
    tool: Arc<dyn ToolBackend>,
    report: ReportSpec,
}

/// Tracks the current stage and logs transitions.
struct StateTracker {
    current: JobState,
}

impl StateTracker {
    fn new() -> Self {
        Self {
            current: JobState::Validating,
        }
    }

    fn advance(&mut self, next: JobState) {
        info!(from = %self.current, to = %next, "job state");
        self.current = next;
    }

    fn fail(&mut self, error: JobError, output_files: Vec<OutputFile>) -> JobFailure {
        let stage = self.current;
        error!(stage = %stage, kind = error.kind(), error = %error, "job failed");
        self.current = JobState::Failed;
        JobFailure {
            stage,
            error,
            output_files,
        }
    }
}

/// A failure after extraction, with the artifacts to keep.
type StageError = (JobError, Vec<OutputFile>);

impl Job {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        extractor: Arc<dyn ArchiveExtractor>,
        tool: Arc<dyn ToolBackend>,
        report: ReportSpec,
    ) -> Self {
        Self {
            fs,
            extractor,
            tool,
            report,
        }
    }

    /// Production wiring: real filesystem, ZIP extraction, real subprocess.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let report = ReportSpec::new(&cfg.tool.report_pattern, &cfg.tool.report_data_type)?;
        let tool = ProcessToolBackend::new(ToolCommand::from_config(&cfg.tool));
        Ok(Self::new(
            Arc::new(RealFileSystem),
            Arc::new(ZipExtractor::new()),
            Arc::new(tool),
            report,
        ))
    }

    /// Run one job to completion.
    ///
    /// On success the result lists the report and the execution log. On
    /// failure the returned [`JobFailure`] lists whatever artifacts were
    /// kept for diagnosis.
    pub async fn run(
        &self,
        request: JobRequest,
        progress: &dyn ProgressSink,
    ) -> std::result::Result<JobResult, JobFailure> {
        let span = request.context.span();
        self.run_inner(request, progress).instrument(span).await
    }

    async fn run_inner(
        &self,
        mut request: JobRequest,
        progress: &dyn ProgressSink,
    ) -> std::result::Result<JobResult, JobFailure> {
        let mut state = StateTracker::new();

        // The tool's cwd is the output dir; paths handed to it must be absolute.
        request.output_dir = std::path::absolute(&request.output_dir)
            .map_err(|e| state.fail(e.into(), Vec::new()))?;
        info!(output_dir = %request.output_dir.display(), "starting job");

        let hint = require_profile_hint(request.task_config.browser_profile.as_deref())
            .map_err(|e| state.fail(e, Vec::new()))?;
        let (input, display_name) =
            validate_single_zip(&request.inputs).map_err(|e| state.fail(e, Vec::new()))?;

        state.advance(JobState::Extracting);
        let extraction = self
            .extract(
                &input,
                &display_name,
                &request.output_dir,
                request.task_config.effective_password(),
            )
            .await
            .map_err(|e| state.fail(e, Vec::new()))?;

        let root = ExtractionRoot::new(Arc::clone(&self.fs), extraction.root.clone());
        let outcome = self
            .process_extraction(&request, hint, root.path(), progress, &mut state)
            .await
            .map_err(|(error, output_files)| state.fail(error, output_files));

        // The failure keeps the stage it happened in; cleanup runs either way.
        match outcome {
            Ok(result) => {
                state.advance(JobState::CleaningUp);
                root.cleanup();
                state.advance(JobState::Done);
                Ok(result)
            }
            Err(failure) => {
                root.cleanup();
                Err(failure)
            }
        }
    }

    async fn extract(
        &self,
        input: &InputDescriptor,
        display_name: &str,
        output_dir: &Path,
        password: Option<&str>,
    ) -> Result<ExtractionResult> {
        let log_file = OutputFile::create(output_dir, &format!("extract_{display_name}.log"), None);
        info!(display_name, "starting archive extraction");

        let extractor = Arc::clone(&self.extractor);
        let input_owned = input.clone();
        let destination = output_dir.to_path_buf();
        let log_path = log_file.path.clone();
        let password_owned = password.map(str::to_string);

        let outcome = tokio::task::spawn_blocking(move || {
            extractor.extract(
                &input_owned,
                &destination,
                &log_path,
                password_owned.as_deref(),
            )
        })
        .await
        .context("extraction task panicked")?;

        match outcome {
            Ok(extraction) => {
                info!(
                    display_name,
                    root = %extraction.root.display(),
                    "extraction complete"
                );
                Ok(extraction)
            }
            Err(err) => {
                error!(display_name, error = %format!("{err:#}"), "failed to extract archive");
                Err(translate_extraction_error(err, password.is_some()))
            }
        }
    }

    /// Resolve, run and collect. Everything here happens while an
    /// extraction root exists; the caller removes it afterwards.
    async fn process_extraction(
        &self,
        request: &JobRequest,
        hint: &str,
        root: &Path,
        progress: &dyn ProgressSink,
        state: &mut StateTracker,
    ) -> std::result::Result<JobResult, StageError> {
        let output_dir = request.output_dir.as_path();

        state.advance(JobState::ResolvingProfile);
        let profile_path =
            find_browser_profile(self.fs.as_ref(), root, hint).map_err(|e| (e, Vec::new()))?;
        info!(profile = %profile_path.display(), "resolved browser profile path");

        state.advance(JobState::Running);
        let log_file = OutputFile::create(output_dir, &self.log_display_name(), None);
        let started_at = SystemTime::now();

        let invocation = match self
            .tool
            .run(ToolRequest {
                profile_path: &profile_path,
                working_dir: output_dir,
                log_path: log_file.path(),
                progress,
            })
            .await
        {
            Ok(invocation) => invocation,
            // Keep the partial log so the user can see what happened.
            Err(e) => return Err((e, vec![log_file])),
        };
        info!(command = %invocation.human_readable, "executed analysis tool");

        state.advance(JobState::CollectingOutput);
        let report = collect::find_report(
            self.fs.as_ref(),
            output_dir,
            self.report.matcher(),
            collect::not_before(started_at),
        )
        .map_err(|e| (JobError::from(e), vec![log_file.clone()]))?;

        // Exit code zero alone does not prove the tool did anything.
        let Some(report_path) = report else {
            error!(
                pattern = %self.report.pattern,
                "tool did not produce a report file; exposing log to user"
            );
            return Err((
                JobError::NoReport(self.tool.tool_name().to_string()),
                vec![log_file],
            ));
        };
        info!(report = %report_path.display(), "tool generated report");

        let artifact = self
            .store_report(output_dir, &report_path)
            .map_err(|e| (e, vec![log_file.clone()]))?;

        let mut meta = BTreeMap::new();
        meta.insert(
            "profile_path".to_string(),
            profile_path.to_string_lossy().into_owned(),
        );

        Ok(JobResult::new(
            vec![artifact.to_record(), log_file.to_record()],
            request.context.workflow_id.clone(),
            invocation.human_readable,
            meta,
        ))
    }

    /// Move the discovered report into a registered output file.
    fn store_report(&self, output_dir: &Path, report_path: &Path) -> Result<OutputFile> {
        let display_name = report_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.report.pattern.clone());
        let artifact = OutputFile::create(output_dir, &display_name, Some(&self.report.data_type));
        self.fs.rename(report_path, artifact.path())?;
        Ok(artifact)
    }

    /// `<tool>_<UTC timestamp>_log.txt`, e.g. `hindsight_20250101T120000Z_log.txt`.
    fn log_display_name(&self) -> String {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        format!("{}_{}_log.txt", self.tool.tool_name().to_lowercase(), timestamp)
    }
}

