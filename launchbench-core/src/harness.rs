// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! Run orchestration: one build request flows through path resolution,
//! argument composition, the publish invocation, artifact discovery,
//! secrets resolution, the subject run, and output persistence.
//!
//! The harness is single-run synchronous. Requests are immutable once
//! created; nothing is shared across runs except the read-only
//! configuration, and output directories are namespaced per run id.

use std::path::PathBuf;
use std::time::Duration;

use crate::artifact::{self, Artifact};
use crate::compose;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::persist;
use crate::publish;
use crate::runner::{ProcessRunner, RunOutcome};
use crate::secrets;
use crate::types::{ProjectName, RunId, RuntimeId, Scenario, TrimPolicy};

/// One benchmark iteration's worth of build parameters. Immutable after
/// creation.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub project: ProjectName,
    pub scenario: Scenario,
    pub trim: TrimPolicy,
    pub run_id: RunId,
    pub runtime: RuntimeId,
}

impl BuildRequest {
    /// Create a request, deriving the trim policy from the configuration's
    /// classification rules and generating a run id when none is supplied.
    pub fn new(
        config: &HarnessConfig,
        project: ProjectName,
        scenario: Scenario,
        runtime: RuntimeId,
        run_id: Option<RunId>,
    ) -> Self {
        let trim = config.trim_policy_for(&project, scenario);
        Self {
            project,
            scenario,
            trim,
            run_id: run_id.unwrap_or_else(RunId::random),
            runtime,
        }
    }
}

/// Result of a successful publish, consumed by the run stage and
/// discarded at run end.
#[derive(Debug, Clone)]
pub struct PublishResult {
    pub artifact: Artifact,
    pub output_dir: PathBuf,
    pub secrets_id: Option<String>,
}

/// The publish/run pipeline for one workspace root.
pub struct Harness {
    config: HarnessConfig,
    root: PathBuf,
    secrets_root: PathBuf,
}

impl Harness {
    /// Create a harness rooted at the sample-project workspace.
    pub fn new(config: HarnessConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
            secrets_root: secrets::default_store_root(),
        }
    }

    /// Override the secrets store root (tests substitute a temp dir).
    pub fn with_secrets_root(mut self, secrets_root: impl Into<PathBuf>) -> Self {
        self.secrets_root = secrets_root.into();
        self
    }

    /// The harness configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Publish output directory for a request.
    pub fn output_dir(&self, request: &BuildRequest) -> PathBuf {
        crate::paths::output_dir(
            &self.root,
            request.project.as_str(),
            request.run_id.as_str(),
        )
    }

    /// Compose the publish argument vector for a request without running
    /// anything. Configuration errors surface here.
    pub fn compose_args(&self, request: &BuildRequest) -> HarnessResult<Vec<String>> {
        let project_path = crate::paths::project_dir(&self.root, request.project.as_str());
        let output_dir = self.output_dir(request);
        Ok(compose::publish_args(
            &self.config,
            &request.project,
            request.scenario,
            request.trim,
            &request.runtime,
            &project_path,
            &output_dir,
        )?)
    }

    /// Clean the output directory and publish the project, returning the
    /// located artifact and the project's declared secrets identifier.
    pub fn publish(&self, request: &BuildRequest) -> HarnessResult<PublishResult> {
        let args = self.compose_args(request)?;
        let output_dir = self.output_dir(request);

        tracing::info!(
            project = %request.project,
            scenario = %request.scenario,
            trim = %request.trim,
            run_id = %request.run_id,
            "Publishing"
        );

        publish::clean_output(&output_dir).map_err(|e| HarnessError::Io {
            context: "cleaning output directory",
            source: e,
        })?;

        let mut invocation = Vec::with_capacity(args.len() + 1);
        invocation.push("publish".to_string());
        invocation.extend(args);
        publish::invoke(&self.config, &invocation)?;

        let found = artifact::locate(&output_dir, request.project.as_str())?;
        tracing::info!(
            path = %found.path.display(),
            native = found.native,
            size_bytes = found.size_bytes,
            "Located artifact"
        );

        let project_file = self.project_file(&request.project);
        let secrets_id = secrets::user_secrets_id(&project_file)?;

        Ok(PublishResult {
            artifact: found,
            output_dir,
            secrets_id,
        })
    }

    /// Run the published artifact and persist its captured stdout.
    ///
    /// A persist failure is reported via the log but never unwinds the
    /// outcome already computed.
    pub fn run(
        &self,
        published: &PublishResult,
        timeout: Option<Duration>,
    ) -> HarnessResult<RunOutcome> {
        let env = match secrets::resolve(&self.secrets_root, published.secrets_id.as_deref())? {
            Some(binding) => vec![binding],
            None => Vec::new(),
        };

        let runner = ProcessRunner::new(&self.config.dotnet);
        let outcome = runner.launch(&published.artifact, &env, timeout)?;

        if let Err(e) = persist::persist_stdout(&published.output_dir, &outcome) {
            tracing::warn!(error = %e, "Failed to persist stdout sidecar");
        }

        Ok(outcome)
    }

    /// One full clean/publish/run cycle.
    pub fn execute(
        &self,
        request: &BuildRequest,
        timeout: Option<Duration>,
    ) -> HarnessResult<RunOutcome> {
        let published = self.publish(request)?;
        self.run(&published, timeout)
    }

    fn project_file(&self, project: &ProjectName) -> PathBuf {
        crate::paths::project_dir(&self.root, project.as_str())
            .join(format!("{}.csproj", project.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(project: &str, scenario: Scenario) -> BuildRequest {
        BuildRequest::new(
            &HarnessConfig::default(),
            ProjectName::new(project).unwrap(),
            scenario,
            RuntimeId::new("linux-x64").unwrap(),
            None,
        )
    }

    #[test]
    fn test_request_derives_trim_policy() {
        let req = request("console", Scenario::Trimmed);
        assert_eq!(req.trim, TrimPolicy::Full);

        let req = request("console", Scenario::SelfContained);
        assert_eq!(req.trim, TrimPolicy::None);
    }

    #[test]
    fn test_request_generates_distinct_run_ids() {
        let a = request("console", Scenario::Default);
        let b = request("console", Scenario::Default);
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn test_output_dirs_namespaced_by_run_id() {
        let harness = Harness::new(HarnessConfig::default(), "/bench");
        let a = request("console", Scenario::Default);
        let b = request("console", Scenario::Default);
        assert_ne!(harness.output_dir(&a), harness.output_dir(&b));
    }

    #[test]
    fn test_compose_args_surfaces_config_errors() {
        let harness = Harness::new(HarnessConfig::default(), "/bench");
        let req = request("workerservice", Scenario::AheadOfTime);
        let result = harness.compose_args(&req);
        assert!(matches!(result, Err(HarnessError::Config(_))));
    }

    #[test]
    fn test_compose_args_self_contained() {
        let harness = Harness::new(HarnessConfig::default(), "/bench");
        let req = request("console", Scenario::SelfContained);
        let args = harness.compose_args(&req).unwrap();
        assert!(args.contains(&"--self-contained".to_string()));
    }
}
