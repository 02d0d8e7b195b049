// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! Captured-output persistence.
//!
//! Writes the captured stdout buffer byte-for-byte to an `output.txt`
//! sidecar next to the artifact. A failure here is reported to the caller
//! but never invalidates the run outcome already computed.

use std::path::{Path, PathBuf};

use crate::error::PersistError;
use crate::paths;
use crate::runner::RunOutcome;

/// Persist the outcome's stdout to the sidecar file, creating or
/// truncating it. Returns the sidecar path on success.
pub fn persist_stdout(dir: &Path, outcome: &RunOutcome) -> Result<PathBuf, PersistError> {
    let path = paths::stdout_sidecar(dir);
    std::fs::write(&path, &outcome.stdout).map_err(|e| PersistError::Write {
        path: path.clone(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), bytes = outcome.stdout.len(), "Persisted stdout");
    Ok(path)
}
