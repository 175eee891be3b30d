// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod extract;
pub mod fs;
pub mod job;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod resolve;
pub mod types;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_or_default, ConfigFile};
use crate::errors::JobError;
use crate::exec::{LoggingProgress, ToolCommand};
use crate::job::validate::{require_profile_hint, validate_single_zip};
use crate::job::{Job, JobContext, JobRequest};
use crate::output::JobResult;
use crate::resolve::ProfileHint;
use crate::types::InputDescriptor;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and command-line overrides
/// - the job pipeline with its production collaborators
/// - printing the result JSON on stdout
pub async fn run(args: CliArgs) -> Result<()> {
    if args.describe {
        println!(
            "{}",
            serde_json::to_string_pretty(&metadata::task_metadata())?
        );
        return Ok(());
    }

    let mut cfg = load_or_default(args.config.as_deref())?;
    apply_cli_overrides(&mut cfg, &args)?;
    let request = build_request(&cfg)?;

    if args.dry_run {
        return print_dry_run(&cfg, &request);
    }

    std::fs::create_dir_all(&request.output_dir)
        .with_context(|| format!("creating output dir {:?}", request.output_dir))?;

    let job = Job::from_config(&cfg)?;
    let progress = LoggingProgress::new();

    match job.run(request, &progress).await {
        Ok(result) => {
            info!(progress_events = progress.count(), "job finished");
            println!("{}", result.to_json()?);
            Ok(())
        }
        Err(failure) => {
            for file in &failure.output_files {
                eprintln!("kept {}: {}", file.display_name, file.path.display());
            }
            Err(failure.into())
        }
    }
}

/// Command-line flags win over the config file.
pub fn apply_cli_overrides(cfg: &mut ConfigFile, args: &CliArgs) -> errors::Result<()> {
    if let Some(path) = &args.pipe_result {
        let contents = std::fs::read_to_string(path)?;
        let previous = JobResult::from_json(&contents)?;
        cfg.input = previous.input_descriptors();
    } else if !args.inputs.is_empty() {
        cfg.input = args.inputs.iter().map(InputDescriptor::new).collect();
    }

    if let Some(dir) = &args.output_dir {
        cfg.job.output_dir = Some(dir.clone());
    }
    if let Some(hint) = &args.browser_profile {
        cfg.task_config.browser_profile = Some(hint.clone());
    }
    if let Some(password) = &args.archive_password {
        cfg.task_config.archive_password = Some(password.clone());
    }
    if let Some(id) = &args.workflow_id {
        cfg.job.workflow_id = Some(id.clone());
    }
    Ok(())
}

/// Turn a fully merged config into a job request.
pub fn build_request(cfg: &ConfigFile) -> errors::Result<JobRequest> {
    let output_dir = cfg.job.output_dir.clone().ok_or_else(|| {
        JobError::ConfigError(
            "an output directory is required (--output-dir or [job].output_dir)".to_string(),
        )
    })?;

    let mut context = JobContext::new(cfg.job.workflow_id.clone());
    if let Some(id) = &cfg.job.job_id {
        context = context.with_job_id(id.clone());
    }

    Ok(JobRequest {
        inputs: cfg.input.clone(),
        output_dir,
        task_config: cfg.task_config.clone(),
        context,
    })
}

/// Validate what can be validated without touching the archive and print
/// the plan.
fn print_dry_run(cfg: &ConfigFile, request: &JobRequest) -> Result<()> {
    let hint = require_profile_hint(request.task_config.browser_profile.as_deref())?;
    let parsed = ProfileHint::parse(hint)?;
    let (input, display_name) = validate_single_zip(&request.inputs)?;
    let command = ToolCommand::from_config(&cfg.tool);

    println!("hindsight-worker dry-run");
    println!("  job_id = {}", request.context.job_id);
    if let Some(ref id) = request.context.workflow_id {
        println!("  workflow_id = {id}");
    }
    println!("  input = {} ({})", display_name, input.path.display());
    println!("  output_dir = {}", request.output_dir.display());
    println!(
        "  password = {}",
        if request.task_config.effective_password().is_some() {
            "supplied"
        } else {
            "none"
        }
    );
    println!("  profile hint = {}", parsed.raw());
    println!("  search suffix = {}", parsed.search_suffix());
    println!(
        "  command = {}",
        command.human_readable(std::path::Path::new("<resolved profile>"))
    );
    println!("  report pattern = {}", cfg.tool.report_pattern);

    debug!("dry-run complete (no execution)");
    Ok(())
}
