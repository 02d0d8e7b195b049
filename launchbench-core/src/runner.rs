//! Subject process lifecycle.
//!
//! Launches the located artifact (directly when native, through the host
//! runtime otherwise), injects the shutdown-on-start contract plus any
//! resolved secrets, and waits for exit while draining both standard
//! streams concurrently. The concurrent drain is load-bearing: a subject
//! that fills one OS pipe buffer while the harness blocks reading the
//! other would hang both forever.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::artifact::Artifact;
use crate::error::RunError;

/// Environment variable telling the subject to terminate on its own right
/// after startup instead of serving indefinitely.
pub const SHUTDOWN_ON_START_VAR: &str = "SHUTDOWN_ON_START";

/// Poll interval while waiting with a timeout.
const WAIT_POLL: Duration = Duration::from_millis(10);

/// The sole externally visible result of a run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Exit code of the subject (always 0 here; non-zero exits are errors).
    pub exit_code: i32,
    /// Raw captured standard output.
    pub stdout: Vec<u8>,
    /// Raw captured standard error.
    pub stderr: Vec<u8>,
    /// Wall-clock timestamp taken immediately before the launch.
    pub started_at: DateTime<Utc>,
    /// Time from launch to exit.
    pub duration: Duration,
    /// Peak working-set size of waited children, when the platform
    /// exposes it.
    pub max_working_set_bytes: Option<u64>,
}

impl RunOutcome {
    /// Captured stdout as text (lossy).
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Captured stderr as text (lossy).
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Launches publish artifacts as child processes.
pub struct ProcessRunner {
    /// Host runtime binary used for non-native artifacts.
    dotnet: PathBuf,
}

impl ProcessRunner {
    /// Create a runner that uses `dotnet` as the host runtime.
    pub fn new(dotnet: impl Into<PathBuf>) -> Self {
        Self {
            dotnet: dotnet.into(),
        }
    }

    /// Launch the artifact, wait for it to exit, and classify the outcome.
    ///
    /// `env` is merged on top of the always-injected
    /// `SHUTDOWN_ON_START=true`. With a `timeout`, a subject that does not
    /// exit in time is killed (its whole process group on Unix) and
    /// reported as `RunError::TimedOut` - distinct from a non-zero exit.
    ///
    /// # Errors
    /// `RunError::LaunchFailed` when the process cannot start,
    /// `RunError::SubjectFailed` on non-zero exit (message embeds both
    /// captured streams), `RunError::TimedOut` on expiry.
    pub fn launch(
        &self,
        artifact: &Artifact,
        env: &[(String, String)],
        timeout: Option<Duration>,
    ) -> Result<RunOutcome, RunError> {
        let mut command = if artifact.native {
            Command::new(&artifact.path)
        } else {
            let mut c = Command::new(&self.dotnet);
            c.arg(&artifact.path);
            c
        };

        // Relative-path assumptions inside the subject hold only from the
        // artifact's own directory.
        if let Some(dir) = artifact.path.parent() {
            command.current_dir(dir);
        }

        command
            .env(SHUTDOWN_ON_START_VAR, "true")
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group, so a timeout kill reaches descendants too.
            command.process_group(0);
        }

        let program = if artifact.native {
            artifact.path.display().to_string()
        } else {
            format!("{} {}", self.dotnet.display(), artifact.path.display())
        };

        let started_at = Utc::now();
        let start = Instant::now();

        let mut child = command.spawn().map_err(|e| RunError::LaunchFailed {
            program: program.clone(),
            source: e,
        })?;

        tracing::debug!(program = %program, pid = child.id(), "Launched subject process");

        let stdout_handle = drain_thread(child.stdout.take(), "stdout")?;
        let stderr_handle = drain_thread(child.stderr.take(), "stderr")?;

        let (status, timed_out) = wait_with_timeout(&mut child, timeout)?;
        let duration = start.elapsed();

        let stdout = join_drain(stdout_handle)?;
        let stderr = join_drain(stderr_handle)?;

        if timed_out {
            return Err(RunError::TimedOut {
                timeout_secs: timeout.map(|t| t.as_secs()).unwrap_or(0),
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            });
        }

        let code = status.code().unwrap_or(-1);
        if code != 0 {
            return Err(RunError::SubjectFailed {
                code,
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            });
        }

        tracing::info!(
            program = %program,
            duration_ms = duration.as_millis(),
            "Subject exited cleanly"
        );

        Ok(RunOutcome {
            exit_code: code,
            stdout,
            stderr,
            started_at,
            duration,
            max_working_set_bytes: max_working_set(),
        })
    }
}

/// Spawn a reader thread for one captured stream.
fn drain_thread<R: Read + Send + 'static>(
    stream: Option<R>,
    name: &'static str,
) -> Result<JoinHandle<std::io::Result<Vec<u8>>>, RunError> {
    let mut stream = stream.ok_or_else(|| RunError::StreamCapture {
        reason: format!("{} was not piped", name),
    })?;
    Ok(thread::spawn(move || {
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf)?;
        Ok(buf)
    }))
}

/// Collect a drain thread's buffer.
fn join_drain(handle: JoinHandle<std::io::Result<Vec<u8>>>) -> Result<Vec<u8>, RunError> {
    handle
        .join()
        .map_err(|_| RunError::StreamCapture {
            reason: "drain thread panicked".to_string(),
        })?
        .map_err(|e| RunError::StreamCapture {
            reason: e.to_string(),
        })
}

/// Wait for exit, polling when a timeout is set. Returns the exit status
/// and whether the deadline fired.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Option<Duration>,
) -> Result<(ExitStatus, bool), RunError> {
    let Some(timeout) = timeout else {
        let status = child.wait().map_err(|e| RunError::StreamCapture {
            reason: format!("wait failed: {}", e),
        })?;
        return Ok((status, false));
    };

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status, false)),
            Ok(None) => {
                if Instant::now() >= deadline {
                    kill_tree(child);
                    let status = child.wait().map_err(|e| RunError::StreamCapture {
                        reason: format!("wait after kill failed: {}", e),
                    })?;
                    return Ok((status, true));
                }
                thread::sleep(WAIT_POLL);
            }
            Err(e) => {
                return Err(RunError::StreamCapture {
                    reason: format!("try_wait failed: {}", e),
                })
            }
        }
    }
}

/// Kill the child and, on Unix, its whole process group.
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;
        let _ = killpg(Pid::from_raw(child.id() as i32), Signal::SIGKILL);
    }
    let _ = child.kill();
}

/// Peak resident-set size of waited children, in bytes (Unix only).
#[cfg(unix)]
fn max_working_set() -> Option<u64> {
    use nix::sys::resource::{getrusage, UsageWho};
    let usage = getrusage(UsageWho::RUSAGE_CHILDREN).ok()?;
    // ru_maxrss is reported in kilobytes on Linux.
    let kb = usage.max_rss();
    if kb <= 0 {
        None
    } else {
        Some(kb as u64 * 1024)
    }
}

#[cfg(not(unix))]
fn max_working_set() -> Option<u64> {
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Drop a shell script into `dir` and return it as a native artifact.
    fn script_artifact(dir: &Path, name: &str, body: &str) -> Artifact {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        let size = std::fs::metadata(&path).unwrap().len();
        Artifact {
            path,
            native: true,
            size_bytes: size,
        }
    }

    #[test]
    fn test_clean_exit_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = script_artifact(dir.path(), "subject", "echo hello; echo oops >&2");
        let runner = ProcessRunner::new("dotnet");

        let outcome = runner.launch(&artifact, &[], None).unwrap();
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.stdout, b"hello\n");
        assert_eq!(outcome.stderr, b"oops\n");
        assert!(outcome.duration > Duration::ZERO);
    }

    #[test]
    fn test_shutdown_env_always_injected() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = script_artifact(dir.path(), "subject", "printf %s \"$SHUTDOWN_ON_START\"");
        let runner = ProcessRunner::new("dotnet");

        let outcome = runner.launch(&artifact, &[], None).unwrap();
        assert_eq!(outcome.stdout, b"true");
    }

    #[test]
    fn test_extra_env_merged() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = script_artifact(dir.path(), "subject", "printf %s \"$JWT_SIGNING_KEY\"");
        let runner = ProcessRunner::new("dotnet");

        let env = vec![("JWT_SIGNING_KEY".to_string(), "sekrit".to_string())];
        let outcome = runner.launch(&artifact, &env, None).unwrap();
        assert_eq!(outcome.stdout, b"sekrit");
    }

    #[test]
    fn test_working_directory_is_artifact_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sibling.txt"), b"here").unwrap();
        let artifact = script_artifact(dir.path(), "subject", "cat sibling.txt");
        let runner = ProcessRunner::new("dotnet");

        let outcome = runner.launch(&artifact, &[], None).unwrap();
        assert_eq!(outcome.stdout, b"here");
    }

    #[test]
    fn test_large_dual_stream_output_does_not_deadlock() {
        // >64KB on each stream; sequential post-wait reads would hang here.
        let dir = tempfile::tempdir().unwrap();
        let body = "i=0; while [ $i -lt 2000 ]; do \
                    printf '%064d\\n' $i; printf '%064d\\n' $i >&2; \
                    i=$((i+1)); done";
        let artifact = script_artifact(dir.path(), "subject", body);
        let runner = ProcessRunner::new("dotnet");

        let outcome = runner
            .launch(&artifact, &[], Some(Duration::from_secs(60)))
            .unwrap();
        assert_eq!(outcome.stdout.len(), 2000 * 65);
        assert_eq!(outcome.stderr.len(), 2000 * 65);
    }

    #[test]
    fn test_non_zero_exit_embeds_both_streams() {
        let dir = tempfile::tempdir().unwrap();
        let artifact =
            script_artifact(dir.path(), "subject", "echo from-out; echo from-err >&2; exit 7");
        let runner = ProcessRunner::new("dotnet");

        let err = runner.launch(&artifact, &[], None).unwrap_err();
        match &err {
            RunError::SubjectFailed { code, .. } => assert_eq!(*code, 7),
            other => panic!("expected SubjectFailed, got {:?}", other),
        }
        let msg = err.to_string();
        assert!(msg.contains("from-out"));
        assert!(msg.contains("from-err"));
    }

    #[test]
    fn test_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact {
            path: dir.path().join("missing"),
            native: true,
            size_bytes: 0,
        };
        let runner = ProcessRunner::new("dotnet");
        let err = runner.launch(&artifact, &[], None).unwrap_err();
        assert!(matches!(err, RunError::LaunchFailed { .. }));
    }

    #[test]
    fn test_timeout_is_distinct_from_failure() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = script_artifact(dir.path(), "subject", "echo early; sleep 30");
        let runner = ProcessRunner::new("dotnet");

        let err = runner
            .launch(&artifact, &[], Some(Duration::from_millis(200)))
            .unwrap_err();
        match err {
            RunError::TimedOut { stdout, .. } => assert!(stdout.contains("early")),
            other => panic!("expected TimedOut, got {:?}", other),
        }
    }
}
