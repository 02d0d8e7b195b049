// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! Custom error types for the launchbench harness.
//!
//! This module defines explicit enum error types per subsystem.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed,
//! and every failure carries enough context (arguments used, captured
//! streams, exit codes) to diagnose without re-running.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the harness pipeline.
/// All failures are terminal for the current benchmark iteration;
/// nothing in this crate retries automatically.
#[derive(Debug, Error)]
pub enum HarnessError {
    // =========================================================================
    // Configuration Errors - raised before any subprocess is spawned
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // =========================================================================
    // Build Errors - publish invocation and artifact discovery
    // =========================================================================
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    // =========================================================================
    // Secrets Errors - per-user secrets store resolution
    // =========================================================================
    #[error("Secrets error: {0}")]
    Secrets(#[from] SecretsError),

    // =========================================================================
    // Run Errors - subject process lifecycle
    // =========================================================================
    #[error("Run error: {0}")]
    Run(#[from] RunError),

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors are raised before any subprocess runs and are
/// never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unrecognized scenario: {name}")]
    UnknownScenario { name: String },

    #[error("Project '{project}' is unsupported for ahead-of-time compilation (allowed: {allowed:?})")]
    AotUnsupported {
        project: String,
        allowed: Vec<String>,
    },

    #[error("Ahead-of-time compilation requires a trim level, but project '{project}' resolved to TrimPolicy::None")]
    AotRequiresTrimming { project: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Build failures from the external publish tool.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to launch build tool '{program}': {source}")]
    ToolLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Publish failed with exit code {code} (args: {args:?})\n--- stderr ---\n{stderr}")]
    PublishFailed {
        code: i32,
        args: Vec<String>,
        stderr: String,
    },

    #[error("Build succeeded but no artifact found for '{project}' in {output_dir} (looked for '{native_name}' and '{managed_name}')")]
    ArtifactMissing {
        project: String,
        output_dir: PathBuf,
        native_name: String,
        managed_name: String,
    },
}

/// Secrets store resolution errors.
/// A declared identifier whose store lacks the signing key is NOT an error;
/// only an absent store file is.
#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("User secrets store not found at {path} for id '{id}'. Run `dotnet user-jwts create` in the project directory to create it.")]
    StoreMissing { id: String, path: PathBuf },

    #[error("Failed to read secrets store {path}: {source}")]
    StoreRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse secrets store {path}: {message}")]
    StoreParse { path: PathBuf, message: String },

    #[error("Failed to read project file {path}: {source}")]
    ProjectFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Subject process lifecycle errors.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to launch '{program}': {source}")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Subject process exited with code {code}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}")]
    SubjectFailed {
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("Subject process did not exit within {timeout_secs}s and was killed\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}")]
    TimedOut {
        timeout_secs: u64,
        stdout: String,
        stderr: String,
    },

    #[error("Failed to capture subject process streams: {reason}")]
    StreamCapture { reason: String },
}

/// Sidecar persistence errors. Reported, but never unwinds a run outcome
/// that was already computed.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using HarnessError.
pub type HarnessResult<T> = Result<T, HarnessError>;
