// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! CLI command modules.

pub mod compose;
pub mod run;
pub mod scenarios;
pub mod validate;

use launchbench_core::{
    BuildRequest, HarnessConfig, HarnessResult, ProjectName, RunId, RuntimeId, Scenario,
};

/// Load the harness configuration from a file, or use the built-in rule
/// table when no file is given.
pub(crate) fn load_config(path: Option<&str>) -> HarnessResult<HarnessConfig> {
    match path {
        Some(path) => HarnessConfig::load_file(path),
        None => Ok(HarnessConfig::default()),
    }
}

/// Build a request from the raw CLI strings.
pub(crate) fn build_request(
    config: &HarnessConfig,
    project: &str,
    runtime: Option<&str>,
    scenario: &str,
    run_id: Option<&str>,
) -> HarnessResult<BuildRequest> {
    let project = ProjectName::new(project)?;
    let scenario: Scenario = scenario.parse()?;
    let runtime = match runtime {
        Some(rid) => RuntimeId::new(rid)?,
        None => RuntimeId::host(),
    };
    let run_id = run_id.map(RunId::new).transpose()?;
    Ok(BuildRequest::new(config, project, scenario, runtime, run_id))
}
