// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! Build-argument composition for the publish tool.
//!
//! Maps a `(scenario, trim policy, project)` tuple to the exact argument
//! vector for `dotnet publish`, enforcing the scenario invariants before
//! any subprocess is spawned:
//!
//! - trimming requires self-containment
//! - ahead-of-time compilation excludes single-file and the standard
//!   trimming flag, and is limited to an allow-list of projects
//! - `TrimPolicy::None` emits an explicit empty `PublishTrimmed` value so
//!   a project-file default cannot silently re-enable trimming
//!
//! Argument order carries no semantics for the tool but is fixed here for
//! reproducibility and diffable logs.

use std::path::Path;

use crate::config::HarnessConfig;
use crate::error::ConfigError;
use crate::types::{ProjectName, RuntimeId, Scenario, TrimPolicy};

/// Compose the full publish argument vector for one build request.
///
/// # Errors
/// Returns `ConfigError::AotUnsupported` when ahead-of-time compilation is
/// requested for a project outside the allow-list, and
/// `ConfigError::AotRequiresTrimming` when it is requested with
/// `TrimPolicy::None`. Both are raised before any subprocess runs.
pub fn publish_args(
    config: &HarnessConfig,
    project: &ProjectName,
    scenario: Scenario,
    trim: TrimPolicy,
    runtime: &RuntimeId,
    project_path: &Path,
    output_dir: &Path,
) -> Result<Vec<String>, ConfigError> {
    if scenario.is_aot() {
        if !config.allows_aot(project) {
            let mut allowed: Vec<String> = config.aot_projects.iter().cloned().collect();
            allowed.sort();
            return Err(ConfigError::AotUnsupported {
                project: project.to_string(),
                allowed,
            });
        }
        if trim == TrimPolicy::None {
            return Err(ConfigError::AotRequiresTrimming {
                project: project.to_string(),
            });
        }
    }

    let self_contained = trim != TrimPolicy::None || scenario.wants_self_contained();

    let mut args = vec![
        project_path.display().to_string(),
        "--configuration".to_string(),
        config.configuration.clone(),
        "--output".to_string(),
        output_dir.display().to_string(),
        "--disable-build-servers".to_string(),
        "--runtime".to_string(),
        runtime.to_string(),
    ];

    if self_contained {
        args.push("--self-contained".to_string());
    } else {
        args.push("--no-self-contained".to_string());
    }

    if scenario.disables_apphost() {
        args.push("-p:UseAppHost=false".to_string());
    }

    if scenario.wants_single_file() {
        args.push("-p:PublishSingleFile=true".to_string());
    }

    if scenario.wants_ready_to_run() {
        args.push("-p:PublishReadyToRun=true".to_string());
    }

    if scenario.is_aot() {
        // AOT carries its own trim-mode flag; PublishTrimmed and
        // PublishSingleFile must stay out of the vector entirely.
        args.push("-p:PublishAot=true".to_string());
        if let Some(mode) = trim.mode_flag_value() {
            args.push(format!("-p:TrimMode={}", mode));
        }
    } else if trim == TrimPolicy::None {
        // Explicit empty value: an omitted property would leave a
        // project-file default in force, an empty one overrides it.
        args.push("-p:PublishTrimmed=".to_string());
    } else {
        args.push("-p:PublishTrimmed=true".to_string());
        if let Some(mode) = trim.mode_flag_value() {
            args.push(format!("-p:TrimMode={}", mode));
        }
    }

    Ok(args)
}
