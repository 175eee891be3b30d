// src/exec/supervisor.rs

//! Run the analysis tool and stream its output into the execution log.

use std::path::Path;
use std::process::Stdio;

use anyhow::Context;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::errors::{JobError, Result};
use crate::exec::command::{tail_chars, ToolCommand, ToolInvocation};
use crate::exec::progress::{ProgressSink, PROGRESS_EVENT};

/// Run `command` against `profile_path` with `working_dir` as cwd.
///
/// Every stdout/stderr line is appended (and flushed) to `log_path` in
/// arrival order and produces one [`PROGRESS_EVENT`]. The log is created
/// before the process starts and is complete when this returns, whether the
/// tool succeeded or not.
///
/// stdout and stderr are separate pipes, so lines within one stream keep
/// their order but the interleaving of the two is only as precise as the
/// reader wakes up. A line the tool wrote to stderr just before a stdout line
/// may be logged after it.
///
/// `profile_path` is passed through untouched; give an absolute path, since
/// the child resolves relative ones against `working_dir`.
///
/// There is no timeout here; wrap the future if the run must be bounded.
/// Dropping the future kills the child.
pub async fn run_tool(
    command: &ToolCommand,
    profile_path: &Path,
    working_dir: &Path,
    log_path: &Path,
    progress: &dyn ProgressSink,
) -> Result<ToolInvocation> {
    let invocation = command.invocation(profile_path);
    info!(
        tool = %command.name,
        command = %invocation.human_readable,
        cwd = %working_dir.display(),
        "running analysis tool"
    );

    let mut log = File::create(log_path)
        .await
        .with_context(|| format!("creating execution log {:?}", log_path))?;

    let spawned = Command::new(&command.program)
        .arg(&command.input_flag)
        .arg(profile_path)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(source) => {
            error!(program = %command.program, error = %source, "failed to spawn analysis tool");
            let note = format!("failed to start {}: {}\n", command.program, source);
            log.write_all(note.as_bytes()).await?;
            log.flush().await?;
            return Err(JobError::Spawn {
                program: command.program.clone(),
                source,
            });
        }
    };

    let mut stdout = child.stdout.take().map(LineStream::new);
    let mut stderr = child.stderr.take().map(LineStream::new);
    let mut lines: u64 = 0;

    while stdout.is_some() || stderr.is_some() {
        let (line, from_stdout) = tokio::select! {
            res = next_line(&mut stdout), if stdout.is_some() => (res, true),
            res = next_line(&mut stderr), if stderr.is_some() => (res, false),
        };

        match line {
            Some(line) => {
                log.write_all(line.as_bytes()).await?;
                log.write_all(b"\n").await?;
                log.flush().await?;
                lines += 1;
                progress.send_event(PROGRESS_EVENT);
            }
            None if from_stdout => stdout = None,
            None => stderr = None,
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for {}", command.program))?;
    log.flush().await?;
    drop(log);

    let code = status.code().unwrap_or(-1);
    info!(
        tool = %command.name,
        exit_code = code,
        success = status.success(),
        lines,
        "analysis tool exited"
    );

    if !status.success() {
        let bytes = tokio::fs::read(log_path)
            .await
            .with_context(|| format!("reading execution log {:?}", log_path))?;
        let text = String::from_utf8_lossy(&bytes);
        let tail = tail_chars(&text, command.log_tail_chars).to_string();
        error!(tool = %command.name, exit_code = code, "analysis tool failed");
        return Err(JobError::Execution {
            tool: command.name.clone(),
            code,
            tail,
        });
    }

    Ok(invocation)
}

/// Byte-oriented line reader that tolerates invalid UTF-8 and keeps partial
/// lines across cancelled reads, so it is safe inside `select!`.
struct LineStream<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineStream<R> {
    fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            buf: Vec::new(),
        }
    }

    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 && self.buf.is_empty() {
            return Ok(None);
        }
        if self.buf.ends_with(b"\n") {
            self.buf.pop();
        }
        if self.buf.ends_with(b"\r") {
            self.buf.pop();
        }
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        Ok(Some(line))
    }
}

/// `None` once the stream is exhausted or broken.
async fn next_line<R: AsyncRead + Unpin>(stream: &mut Option<LineStream<R>>) -> Option<String> {
    let stream = stream.as_mut()?;
    match stream.next_line().await {
        Ok(line) => line,
        Err(err) => {
            warn!(error = %err, "error reading tool output; treating stream as closed");
            None
        }
    }
}

