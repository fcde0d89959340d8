//! Pipeline execution with pipefail status semantics.
//!
//! Stages run concurrently, each stage's stdout feeding the next stage's
//! stdin directly. The parent keeps no handle on the pipe, so a stage that
//! exits closes the stream for its neighbour. Every spawned child is reaped
//! before returning, on success, failure and interruption alike.

use super::stage::{Pipeline, Role, Stage};
use crate::constants::{POLL_INTERVAL_MS, exit_code};
use crate::error::{Error, Result};
use std::process::{Child, ChildStdout, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Exit codes of every stage of a finished pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStatus {
    codes: Vec<i32>,
}

impl PipelineStatus {
    /// Status from per-stage exit codes, in stage order.
    pub fn from_codes(codes: Vec<i32>) -> Self {
        Self { codes }
    }

    /// Per-stage exit codes.
    pub fn codes(&self) -> &[i32] {
        &self.codes
    }

    /// Rightmost non-zero stage code, or 0 when every stage succeeded.
    pub fn code(&self) -> i32 {
        self.codes
            .iter()
            .rev()
            .find(|code| **code != 0)
            .copied()
            .unwrap_or(0)
    }

    /// Whether every stage succeeded.
    pub fn success(&self) -> bool {
        self.code() == 0
    }
}

/// Numeric exit code of a process; signals map to 128 + signal number.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return exit_code::SIGNAL_BASE + signal;
        }
    }

    exit_code::USAGE
}

struct Running<'a> {
    stage: &'a Stage,
    child: Child,
    status: Option<ExitStatus>,
}

/// Runs pipelines, tearing them down when `cancel` is raised.
pub struct Executor<'a> {
    cancel: &'a AtomicBool,
    poll_interval: Duration,
}

impl<'a> Executor<'a> {
    /// Create an executor watching the given cancellation flag.
    pub fn new(cancel: &'a AtomicBool) -> Self {
        Self {
            cancel,
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }

    /// Run all stages and wait for every one of them.
    ///
    /// Returns the per-stage status even when stages fail; the caller decides
    /// what a non-zero [`PipelineStatus::code`] means.
    pub fn run(&self, pipeline: &Pipeline) -> Result<PipelineStatus> {
        if self.cancelled() {
            return Err(Error::Interrupted);
        }

        let mut running = spawn_all(pipeline)?;

        loop {
            if self.cancelled() {
                warn!("Interrupted, stopping {} stage(s)", running.len());
                terminate(&mut running);
                return Err(Error::Interrupted);
            }

            if let Err(e) = poll(&mut running) {
                terminate(&mut running);
                return Err(e);
            }

            if running.iter().all(|r| r.status.is_some()) {
                break;
            }

            thread::sleep(self.poll_interval);
        }

        let codes = running
            .iter()
            .map(|r| r.status.map_or(exit_code::USAGE, exit_code_of))
            .collect();

        Ok(PipelineStatus::from_codes(codes))
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

fn spawn_all(pipeline: &Pipeline) -> Result<Vec<Running<'_>>> {
    let mut running: Vec<Running<'_>> = Vec::with_capacity(pipeline.len());
    let mut upstream: Option<ChildStdout> = None;

    for stage in pipeline.stages() {
        let mut cmd = stage.command();
        if let Some(stdout) = upstream.take() {
            cmd.stdin(Stdio::from(stdout));
        }
        if stage.role == Role::Source {
            cmd.stdout(Stdio::piped());
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                terminate(&mut running);
                return Err(Error::ToolSpawn {
                    tool: stage.tool,
                    program: stage.program_name(),
                    source,
                });
            }
        };
        debug!("Started {} (pid {}): {}", stage.tool, child.id(), stage);

        if stage.role == Role::Source {
            upstream = child.stdout.take();
        }

        running.push(Running {
            stage,
            child,
            status: None,
        });
    }

    Ok(running)
}

fn poll(running: &mut [Running<'_>]) -> Result<()> {
    for run in running.iter_mut().filter(|r| r.status.is_none()) {
        if let Some(status) = run.child.try_wait()? {
            debug!(
                "{} '{}' exited with {}",
                run.stage.tool,
                run.stage.program_name(),
                exit_code_of(status)
            );
            run.status = Some(status);
        }
    }
    Ok(())
}

/// Kill every stage that is still running and reap all of them.
fn terminate(running: &mut [Running<'_>]) {
    for run in running.iter_mut().filter(|r| r.status.is_none()) {
        let _ = run.child.kill();
    }
    for run in running.iter_mut().filter(|r| r.status.is_none()) {
        run.status = run.child.wait().ok();
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pipeline::Tool;
    use std::fs;
    use std::sync::Arc;
    use std::time::Instant;
    use tempfile::TempDir;

    fn sh(tool: Tool, script: &str) -> Stage {
        Stage::new(tool, Role::Sink, "sh").args(["-c", script])
    }

    fn run(pipeline: &Pipeline) -> Result<PipelineStatus> {
        let cancel = AtomicBool::new(false);
        Executor::new(&cancel).run(pipeline)
    }

    #[test]
    fn test_pipefail_code() {
        assert_eq!(PipelineStatus::from_codes(vec![0, 0]).code(), 0);
        assert_eq!(PipelineStatus::from_codes(vec![2, 0]).code(), 2);
        assert_eq!(PipelineStatus::from_codes(vec![0, 3]).code(), 3);
        assert_eq!(PipelineStatus::from_codes(vec![2, 3]).code(), 3);
        assert!(!PipelineStatus::from_codes(vec![141, 0]).success());
    }

    #[test]
    fn test_single_stage_status() {
        let status = run(&Pipeline::single(sh(Tool::Resampler, "exit 4"))).unwrap();
        assert_eq!(status.codes(), [4]);
        assert_eq!(status.code(), 4);
    }

    #[test]
    fn test_bytes_flow_between_stages() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        let sink = format!("cat > '{}'", out.display());
        let pipeline = Pipeline::piped(
            sh(Tool::NativeDecoder, "printf 'pcm-bytes'"),
            sh(Tool::Encoder, &sink),
        );

        let status = run(&pipeline).unwrap();
        assert!(status.success());
        assert_eq!(fs::read_to_string(out).unwrap(), "pcm-bytes");
    }

    #[test]
    fn test_decoder_failure_is_not_masked_by_encoder_success() {
        let pipeline = Pipeline::piped(
            sh(Tool::NativeDecoder, "printf 'partial'; exit 2"),
            sh(Tool::Encoder, "cat > /dev/null; exit 0"),
        );

        let status = run(&pipeline).unwrap();
        assert_eq!(status.codes(), [2, 0]);
        assert_eq!(status.code(), 2);
    }

    #[test]
    fn test_encoder_failure_reported() {
        let pipeline = Pipeline::piped(
            sh(Tool::NativeDecoder, "printf 'data'"),
            sh(Tool::Encoder, "cat > /dev/null; exit 5"),
        );

        let status = run(&pipeline).unwrap();
        assert_eq!(status.code(), 5);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let stage = Stage::new(Tool::Encoder, Role::Sink, "/nonexistent/lame-binary");
        let result = run(&Pipeline::single(stage));
        assert!(matches!(
            result,
            Err(Error::ToolSpawn {
                tool: Tool::Encoder,
                ..
            })
        ));
    }

    #[test]
    fn test_spawn_failure_of_second_stage_reaps_first() {
        let pipeline = Pipeline::piped(
            sh(Tool::NativeDecoder, "sleep 30"),
            Stage::new(Tool::Encoder, Role::Sink, "/nonexistent/lame-binary"),
        );

        let started = Instant::now();
        let result = run(&pipeline);
        assert!(matches!(result, Err(Error::ToolSpawn { .. })));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_cancel_before_start() {
        let cancel = AtomicBool::new(true);
        let result = Executor::new(&cancel).run(&Pipeline::single(sh(Tool::Resampler, "exit 0")));
        assert!(matches!(result, Err(Error::Interrupted)));
    }

    #[test]
    fn test_cancel_tears_down_running_stages() {
        let cancel = Arc::new(AtomicBool::new(false));
        let trigger = Arc::clone(&cancel);
        let pipeline = Pipeline::piped(
            sh(Tool::NativeDecoder, "sleep 30"),
            sh(Tool::Encoder, "cat > /dev/null"),
        );

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            trigger.store(true, Ordering::SeqCst);
        });

        let started = Instant::now();
        let result = Executor::new(&cancel).run(&pipeline);
        handle.join().unwrap();

        assert!(matches!(result, Err(Error::Interrupted)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_killed_stage_reports_signal_code() {
        let status = run(&Pipeline::single(sh(Tool::Resampler, "kill -9 $$"))).unwrap();
        assert_eq!(status.code(), 128 + 9);
    }
}
