// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! Newtype wrappers and closed enums for validated inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by
//! construction. All types validate their invariants at creation time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum project name length.
const MAX_PROJECT_NAME: usize = 128;

/// Publish scenario. A closed set chosen by the caller before a run begins;
/// immutable for the lifetime of a build request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    Default,
    NoAppHost,
    ReadyToRun,
    SelfContained,
    SelfContainedReadyToRun,
    SingleFile,
    SingleFileReadyToRun,
    Trimmed,
    TrimmedReadyToRun,
    AheadOfTime,
}

impl Scenario {
    /// Every scenario in the matrix, in a fixed order.
    pub const ALL: [Scenario; 10] = [
        Scenario::Default,
        Scenario::NoAppHost,
        Scenario::ReadyToRun,
        Scenario::SelfContained,
        Scenario::SelfContainedReadyToRun,
        Scenario::SingleFile,
        Scenario::SingleFileReadyToRun,
        Scenario::Trimmed,
        Scenario::TrimmedReadyToRun,
        Scenario::AheadOfTime,
    ];

    /// Whether the scenario itself requests a self-contained deployment.
    /// Trimming forces self-containment on top of this (see the composer).
    pub fn wants_self_contained(&self) -> bool {
        matches!(
            self,
            Scenario::SelfContained
                | Scenario::SelfContainedReadyToRun
                | Scenario::Trimmed
                | Scenario::TrimmedReadyToRun
                | Scenario::AheadOfTime
        )
    }

    /// Whether single-file packaging is requested.
    pub fn wants_single_file(&self) -> bool {
        matches!(
            self,
            Scenario::SingleFile | Scenario::SingleFileReadyToRun
        )
    }

    /// Whether ready-to-run compilation is requested.
    pub fn wants_ready_to_run(&self) -> bool {
        matches!(
            self,
            Scenario::ReadyToRun
                | Scenario::SelfContainedReadyToRun
                | Scenario::SingleFileReadyToRun
                | Scenario::TrimmedReadyToRun
        )
    }

    /// Whether the scenario trims the published output.
    pub fn wants_trimming(&self) -> bool {
        matches!(
            self,
            Scenario::Trimmed | Scenario::TrimmedReadyToRun | Scenario::AheadOfTime
        )
    }

    /// Whether the scenario compiles ahead-of-time.
    pub fn is_aot(&self) -> bool {
        matches!(self, Scenario::AheadOfTime)
    }

    /// Whether the default app-host wrapper is explicitly disabled.
    pub fn disables_apphost(&self) -> bool {
        matches!(self, Scenario::NoAppHost)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scenario::Default => "default",
            Scenario::NoAppHost => "no-apphost",
            Scenario::ReadyToRun => "ready-to-run",
            Scenario::SelfContained => "self-contained",
            Scenario::SelfContainedReadyToRun => "self-contained-ready-to-run",
            Scenario::SingleFile => "single-file",
            Scenario::SingleFileReadyToRun => "single-file-ready-to-run",
            Scenario::Trimmed => "trimmed",
            Scenario::TrimmedReadyToRun => "trimmed-ready-to-run",
            Scenario::AheadOfTime => "ahead-of-time",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Scenario {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Scenario::Default),
            "no-apphost" => Ok(Scenario::NoAppHost),
            "ready-to-run" => Ok(Scenario::ReadyToRun),
            "self-contained" => Ok(Scenario::SelfContained),
            "self-contained-ready-to-run" => Ok(Scenario::SelfContainedReadyToRun),
            "single-file" => Ok(Scenario::SingleFile),
            "single-file-ready-to-run" => Ok(Scenario::SingleFileReadyToRun),
            "trimmed" => Ok(Scenario::Trimmed),
            "trimmed-ready-to-run" => Ok(Scenario::TrimmedReadyToRun),
            "ahead-of-time" => Ok(Scenario::AheadOfTime),
            other => Err(ConfigError::UnknownScenario {
                name: other.to_string(),
            }),
        }
    }
}

/// Trim policy applied to a publish.
/// Derived from the project's classification and the chosen scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimPolicy {
    /// No trimming; the composer emits an explicit empty override.
    None,
    /// Trimming on, tool-default trim mode.
    Default,
    /// Partial trim mode.
    Partial,
    /// Full trim mode.
    Full,
}

impl TrimPolicy {
    /// The `TrimMode` value for this policy, if the policy names one.
    pub fn mode_flag_value(&self) -> Option<&'static str> {
        match self {
            TrimPolicy::None | TrimPolicy::Default => None,
            TrimPolicy::Partial => Some("partial"),
            TrimPolicy::Full => Some("full"),
        }
    }
}

impl fmt::Display for TrimPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrimPolicy::None => "none",
            TrimPolicy::Default => "default",
            TrimPolicy::Partial => "partial",
            TrimPolicy::Full => "full",
        };
        write!(f, "{}", name)
    }
}

/// Validated project name.
/// Must be non-empty, free of path separators, max 128 chars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    /// Create a new ProjectName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "project",
                value: name,
                reason: "Project name cannot be empty".to_string(),
            });
        }

        if name.len() > MAX_PROJECT_NAME {
            return Err(ConfigError::InvalidFieldValue {
                field: "project",
                value: name.clone(),
                reason: format!(
                    "Project name too long: {} chars (max {})",
                    name.len(),
                    MAX_PROJECT_NAME
                ),
            });
        }

        if name.contains('/') || name.contains('\\') {
            return Err(ConfigError::InvalidFieldValue {
                field: "project",
                value: name,
                reason: "Project name must not contain path separators".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ProjectName {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectName> for String {
    fn from(name: ProjectName) -> Self {
        name.0
    }
}

/// Run identifier used to namespace publish output directories so
/// sequential or parallel runs never collide. Callers must not reuse a
/// run id across simultaneous builds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunId(String);

impl RunId {
    /// Create a new RunId with validation.
    /// Must be non-empty and safe to use as a directory name.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();

        if id.is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "run_id",
                value: id,
                reason: "Run id cannot be empty".to_string(),
            });
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::InvalidFieldValue {
                field: "run_id",
                value: id,
                reason: "Run id must contain only alphanumeric characters, hyphens, and underscores"
                    .to_string(),
            });
        }

        Ok(Self(id))
    }

    /// Generate a random run id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RunId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RunId> for String {
    fn from(id: RunId) -> Self {
        id.0
    }
}

/// Target runtime identifier (architecture + OS), e.g. `linux-x64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuntimeId(String);

impl RuntimeId {
    /// Create a new RuntimeId with validation.
    pub fn new(rid: impl Into<String>) -> Result<Self, ConfigError> {
        let rid = rid.into();

        if rid.is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "runtime",
                value: rid,
                reason: "Runtime identifier cannot be empty".to_string(),
            });
        }

        Ok(Self(rid))
    }

    /// The host's runtime identifier, computed from compile-time target info.
    pub fn host() -> Self {
        let os = if cfg!(target_os = "windows") {
            "win"
        } else if cfg!(target_os = "macos") {
            "osx"
        } else {
            "linux"
        };
        let arch = if cfg!(target_arch = "aarch64") {
            "arm64"
        } else {
            "x64"
        };
        Self(format!("{}-{}", os, arch))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuntimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RuntimeId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RuntimeId> for String {
    fn from(rid: RuntimeId) -> Self {
        rid.0
    }
}
