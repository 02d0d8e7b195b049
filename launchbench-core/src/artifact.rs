// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! Published-artifact discovery.
//!
//! After a successful publish, the native executable is preferred; a
//! managed entry-point assembly is the fallback and needs a host runtime
//! to launch. Neither being present means the composer or the tool
//! invocation is defective - that is fatal, never retried.

use std::path::{Path, PathBuf};

use crate::error::BuildError;
use crate::paths;

/// A located, runnable publish artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Absolute path of the file to run.
    pub path: PathBuf,
    /// True when the artifact is directly executable; false when it must
    /// be launched through the host runtime.
    pub native: bool,
    /// Size of the artifact on disk, for the binary-size measurement.
    pub size_bytes: u64,
}

/// Locate the artifact for `project` inside `output_dir` using the host
/// platform's executable naming convention.
pub fn locate(output_dir: &Path, project: &str) -> Result<Artifact, BuildError> {
    locate_with_suffix(output_dir, project, paths::EXE_SUFFIX)
}

/// Suffix-parameterized locator so both naming conventions are testable.
pub fn locate_with_suffix(
    output_dir: &Path,
    project: &str,
    exe_suffix: &str,
) -> Result<Artifact, BuildError> {
    let native_name = paths::native_artifact_name(project, exe_suffix);
    let managed_name = paths::managed_artifact_name(project);

    let native_path = output_dir.join(&native_name);
    if let Ok(meta) = std::fs::metadata(&native_path) {
        if meta.is_file() {
            tracing::debug!(path = %native_path.display(), "Located native artifact");
            return Ok(Artifact {
                path: native_path,
                native: true,
                size_bytes: meta.len(),
            });
        }
    }

    let managed_path = output_dir.join(&managed_name);
    if let Ok(meta) = std::fs::metadata(&managed_path) {
        if meta.is_file() {
            tracing::debug!(path = %managed_path.display(), "Located managed artifact");
            return Ok(Artifact {
                path: managed_path,
                native: false,
                size_bytes: meta.len(),
            });
        }
    }

    Err(BuildError::ArtifactMissing {
        project: project.to_string(),
        output_dir: output_dir.to_path_buf(),
        native_name,
        managed_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str, contents: &[u8]) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_prefers_native_when_both_present() {
        for suffix in ["", ".exe"] {
            let dir = tempfile::tempdir().unwrap();
            touch(dir.path(), &format!("app{}", suffix), b"native");
            touch(dir.path(), "app.dll", b"managed!");

            let artifact = locate_with_suffix(dir.path(), "app", suffix).unwrap();
            assert!(artifact.native, "suffix {:?}", suffix);
            assert_eq!(artifact.size_bytes, 6);
        }
    }

    #[test]
    fn test_falls_back_to_managed() {
        for suffix in ["", ".exe"] {
            let dir = tempfile::tempdir().unwrap();
            touch(dir.path(), "app.dll", b"managed!");

            let artifact = locate_with_suffix(dir.path(), "app", suffix).unwrap();
            assert!(!artifact.native);
            assert_eq!(artifact.path, dir.path().join("app.dll"));
            assert_eq!(artifact.size_bytes, 8);
        }
    }

    #[test]
    fn test_fails_when_neither_present() {
        for suffix in ["", ".exe"] {
            let dir = tempfile::tempdir().unwrap();
            let result = locate_with_suffix(dir.path(), "app", suffix);
            assert!(matches!(
                result,
                Err(BuildError::ArtifactMissing { .. })
            ));
        }
    }

    #[test]
    fn test_directory_with_artifact_name_is_not_an_artifact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("app.dll")).unwrap();
        let result = locate_with_suffix(dir.path(), "app", "");
        assert!(result.is_err());
    }
}
