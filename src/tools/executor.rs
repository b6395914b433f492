//! Process execution for validated commands.
//!
//! A command runs as a single child of the platform shell. Completion (exit
//! plus both output streams reaching EOF) races a deadline; whichever loses
//! is cleaned up. The child leads its own process group, and that group is
//! killed before returning on every path, so background jobs the command
//! started do not outlive the call.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tracing::{debug, warn};

use super::validator::ValidatedCommand;
use crate::error::{ShellwardError, ShellwardResult};
use crate::shell::ShellOutput;
use crate::types::ExecutorConfig;
use crate::util::format_bytes;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Runs a validated command to completion or timeout.
///
/// A non-zero exit status is not an error here; it is reported through
/// [`ShellOutput::exit_code`].
///
/// # Errors
///
/// - `SpawnFailure` if the interpreter cannot be started
/// - `Timeout` if the command outlives its deadline
/// - `OutputCapture` if reading output or waiting on the child fails
pub async fn run(validated: &ValidatedCommand, config: &ExecutorConfig) -> ShellwardResult<ShellOutput> {
    let mut child = config
        .shell
        .build_command(validated.command(), validated.working_dir())
        .spawn()
        .map_err(|e| {
            warn!(
                error = %e,
                shell = %config.shell.command,
                working_dir = %validated.working_dir().display(),
                "Command spawn failed"
            );
            ShellwardError::spawn_failure(e.to_string())
        })?;

    // Captured now: once the child is reaped `id()` returns None.
    let pid = child.id();
    debug!(pid = ?pid, command = %validated.command(), "Spawned command");

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let limit = config.max_output_size;

    let outcome = tokio::time::timeout(validated.timeout(), async {
        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            read_capped(stdout, limit),
            read_capped(stderr, limit)
        );
        Ok::<_, io::Error>((status?, stdout?, stderr?))
    })
    .await;

    match outcome {
        Ok(Ok((status, stdout, stderr))) => {
            // Jobs that detached from the output pipes are still in the group.
            kill_process_group(pid);
            let exit_code = status.code().unwrap_or(-1);
            debug!(pid = ?pid, exit_code, "Command finished");
            Ok(ShellOutput {
                exit_code,
                stdout: stdout.into_string(limit),
                stderr: stderr.into_string(limit),
            })
        }
        Ok(Err(e)) => {
            warn!(pid = ?pid, error = %e, "Command output collection failed");
            terminate(&mut child, pid).await;
            Err(ShellwardError::output_capture(e.to_string()))
        }
        Err(_) => {
            let timeout_ms = u64::try_from(validated.timeout().as_millis()).unwrap_or(u64::MAX);
            warn!(
                pid = ?pid,
                timeout_ms,
                command = %validated.command(),
                "Command timed out and was killed"
            );
            terminate(&mut child, pid).await;
            Err(ShellwardError::timeout(timeout_ms))
        }
    }
}

/// Bytes read from one stream, keeping at most the output cap.
#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    total: usize,
}

impl Captured {
    fn into_string(self, limit: usize) -> String {
        let mut text = String::from_utf8_lossy(&self.bytes).into_owned();
        if self.total > limit {
            warn!(
                original_size = self.total,
                max_size = limit,
                "Command output truncated"
            );
            text.push_str(&format!(
                "\n\n[Output truncated: {} exceeded {} limit]",
                format_bytes(self.total as u64),
                format_bytes(limit as u64)
            ));
        }
        text
    }
}

/// Reads `stream` to EOF, storing the first `limit` bytes and counting the rest.
async fn read_capped<R>(stream: Option<R>, limit: usize) -> io::Result<Captured>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Captured::default();
    let Some(mut stream) = stream else {
        return Ok(captured);
    };

    let mut chunk = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        captured.total += n;
        let room = limit.saturating_sub(captured.bytes.len());
        captured.bytes.extend_from_slice(&chunk[..n.min(room)]);
    }
    Ok(captured)
}

/// Kills the child and everything in its process group, then reaps it.
async fn terminate(child: &mut Child, pid: Option<u32>) {
    kill_process_group(pid);
    if let Err(e) = child.kill().await {
        debug!(pid = ?pid, error = %e, "Child already gone");
    }
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    // The child leads its own group (see `ShellConfig::build_command`).
    let Some(pgid) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    if let Err(errno) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        debug!(pgid, error = %errno, "Process group already gone");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}
