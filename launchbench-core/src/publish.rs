// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! Build tool invocation.
//!
//! Runs `<dotnet> publish <args>` as a child process, captures its output,
//! and surfaces any non-zero exit as a build failure carrying the full
//! argument vector. Success is side-effect only: the artifact materializes
//! in the output directory.

use std::path::Path;
use std::process::Command;

use crate::config::HarnessConfig;
use crate::error::BuildError;

/// Remove a previous run's publish output, if any. Best effort: a missing
/// directory is not an error.
pub fn clean_output(dir: &Path) -> std::io::Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Invoke the build tool with a composed argument vector. The caller
/// supplies the complete vector including the `publish` verb.
///
/// # Errors
/// `BuildError::ToolLaunch` when the tool cannot be started at all,
/// `BuildError::PublishFailed` on non-zero exit (with the exit code, the
/// arguments used, and captured stderr).
pub fn invoke(config: &HarnessConfig, args: &[String]) -> Result<(), BuildError> {
    let program = config.dotnet.display().to_string();

    tracing::info!(tool = %program, args = ?args, "Invoking publish");

    let output = Command::new(&config.dotnet)
        .args(args)
        .output()
        .map_err(|e| BuildError::ToolLaunch {
            program: program.clone(),
            source: e,
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::error!(tool = %program, code = code, "Publish failed");
        return Err(BuildError::PublishFailed {
            code,
            args: args.to_vec(),
            stderr,
        });
    }

    tracing::debug!(
        tool = %program,
        stdout_bytes = output.stdout.len(),
        "Publish completed"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_clean_missing_dir_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-published");
        assert!(clean_output(&missing).is_ok());
    }

    #[test]
    fn test_clean_removes_contents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run-1");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("stale.dll"), b"x").unwrap();
        clean_output(&out).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn test_tool_launch_failure() {
        let config = HarnessConfig {
            dotnet: PathBuf::from("/nonexistent/launchbench-no-such-tool"),
            ..HarnessConfig::default()
        };
        let result = invoke(&config, &["proj".to_string()]);
        assert!(matches!(result, Err(BuildError::ToolLaunch { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_carries_args_and_stderr() {
        // A stand-in tool that writes to stderr and fails.
        let config = HarnessConfig {
            dotnet: PathBuf::from("/bin/sh"),
            ..HarnessConfig::default()
        };
        let result = invoke(
            &config,
            &["-c".to_string(), "echo boom >&2; exit 3".to_string()],
        );
        match result {
            Err(BuildError::PublishFailed { code, args, stderr }) => {
                assert_eq!(code, 3);
                assert!(stderr.contains("boom"));
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected PublishFailed, got {:?}", other),
        }
    }
}
