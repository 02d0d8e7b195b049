// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! Deterministic filesystem locations for projects, publish output, and
//! artifacts.
//!
//! Pure functions only. Output directories are namespaced per run id so
//! concurrent or repeated runs never write artifacts to the same path;
//! that namespacing is the harness's sole concurrency-safety guarantee.

use std::path::{Path, PathBuf};

/// Platform executable suffix (".exe" on Windows, "" elsewhere).
pub const EXE_SUFFIX: &str = std::env::consts::EXE_SUFFIX;

/// Extension of the managed entry-point artifact.
const MANAGED_EXTENSION: &str = "dll";

/// Name of the persisted stdout sidecar.
const STDOUT_SIDECAR: &str = "output.txt";

/// Source directory of a sample project under the workspace root.
pub fn project_dir(root: &Path, project: &str) -> PathBuf {
    root.join(project)
}

/// Publish output directory for one run of one project.
pub fn output_dir(root: &Path, project: &str, run_id: &str) -> PathBuf {
    root.join("artifacts").join(project).join(run_id)
}

/// Name of the native executable for a project, given a platform suffix.
/// The suffix is a parameter so both naming conventions are testable.
pub fn native_artifact_name(project: &str, exe_suffix: &str) -> String {
    format!("{}{}", project, exe_suffix)
}

/// Name of the managed entry-point artifact for a project.
pub fn managed_artifact_name(project: &str) -> String {
    format!("{}.{}", project, MANAGED_EXTENSION)
}

/// Path of the persisted stdout sidecar inside an output directory.
pub fn stdout_sidecar(dir: &Path) -> PathBuf {
    dir.join(STDOUT_SIDECAR)
}
