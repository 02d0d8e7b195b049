// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! YAML harness configuration with strict validation.
//!
//! The ahead-of-time allow-list and the trim-classification rules are
//! injected configuration data, not code: new sample projects get a rule
//! entry instead of a source change. A built-in rule table covers the
//! stock samples when no file is supplied.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, HarnessError, HarnessResult};
use crate::types::{ProjectName, Scenario, TrimPolicy};

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_dotnet")]
    dotnet: String,
    #[serde(default = "default_configuration")]
    configuration: String,
    #[serde(default = "default_aot_projects")]
    aot_projects: Vec<String>,
    #[serde(default = "default_trim_rules")]
    trim_rules: Vec<RawTrimRule>,
    #[serde(default = "default_trim_policy")]
    default_trim: TrimPolicy,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawTrimRule {
    fragment: String,
    policy: TrimPolicy,
}

fn default_dotnet() -> String {
    "dotnet".to_string()
}

fn default_configuration() -> String {
    "Release".to_string()
}

fn default_aot_projects() -> Vec<String> {
    ["console", "consolejson", "minimalapi", "emptywebapp"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_trim_rules() -> Vec<RawTrimRule> {
    vec![
        RawTrimRule {
            fragment: "api".to_string(),
            policy: TrimPolicy::Partial,
        },
        RawTrimRule {
            fragment: "web".to_string(),
            policy: TrimPolicy::Partial,
        },
        RawTrimRule {
            fragment: "console".to_string(),
            policy: TrimPolicy::Full,
        },
    ]
}

fn default_trim_policy() -> TrimPolicy {
    TrimPolicy::Default
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            dotnet: default_dotnet(),
            configuration: default_configuration(),
            aot_projects: default_aot_projects(),
            trim_rules: default_trim_rules(),
            default_trim: default_trim_policy(),
        }
    }
}

/// A single name-classification rule: projects whose lower-cased name
/// contains `fragment` receive `policy` when a trimming scenario runs.
#[derive(Debug, Clone)]
pub struct TrimRule {
    pub fragment: String,
    pub policy: TrimPolicy,
}

/// Validated harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Path or name of the build tool binary.
    pub dotnet: PathBuf,
    /// Build configuration passed as `--configuration`.
    pub configuration: String,
    /// Projects for which ahead-of-time compilation is permitted.
    pub aot_projects: HashSet<String>,
    /// Ordered classification rules; first match wins.
    pub trim_rules: Vec<TrimRule>,
    /// Fallback policy for trimming scenarios when no rule matches.
    pub default_trim: TrimPolicy,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        // The built-in table always validates.
        Self::validate(RawConfig::default()).unwrap()
    }
}

impl HarnessConfig {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::ConfigNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> HarnessResult<Self> {
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Ok(Self::validate(raw)?)
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        if raw.dotnet.is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "dotnet",
                value: raw.dotnet,
                reason: "Build tool path cannot be empty".to_string(),
            });
        }

        if raw.configuration.is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "configuration",
                value: raw.configuration,
                reason: "Build configuration cannot be empty".to_string(),
            });
        }

        let mut aot_projects = HashSet::with_capacity(raw.aot_projects.len());
        for name in raw.aot_projects {
            if name.is_empty() {
                return Err(ConfigError::InvalidFieldValue {
                    field: "aot_projects",
                    value: name,
                    reason: "Allow-list entries cannot be empty".to_string(),
                });
            }
            aot_projects.insert(name.to_lowercase());
        }

        let mut trim_rules = Vec::with_capacity(raw.trim_rules.len());
        for rule in raw.trim_rules {
            if rule.fragment.is_empty() {
                return Err(ConfigError::InvalidFieldValue {
                    field: "trim_rules",
                    value: rule.fragment,
                    reason: "Rule fragments cannot be empty".to_string(),
                });
            }
            trim_rules.push(TrimRule {
                fragment: rule.fragment.to_lowercase(),
                policy: rule.policy,
            });
        }

        Ok(Self {
            dotnet: PathBuf::from(raw.dotnet),
            configuration: raw.configuration,
            aot_projects,
            trim_rules,
            default_trim: raw.default_trim,
        })
    }

    /// Whether a project may be compiled ahead-of-time.
    pub fn allows_aot(&self, project: &ProjectName) -> bool {
        self.aot_projects.contains(&project.as_str().to_lowercase())
    }

    /// Derive the effective trim policy for a project under a scenario.
    ///
    /// Non-trimming scenarios always resolve to `TrimPolicy::None`;
    /// trimming scenarios classify by the first matching rule, falling back
    /// to the configured default.
    pub fn trim_policy_for(&self, project: &ProjectName, scenario: Scenario) -> TrimPolicy {
        if !scenario.wants_trimming() {
            return TrimPolicy::None;
        }

        let name = project.as_str().to_lowercase();
        self.trim_rules
            .iter()
            .find(|rule| name.contains(&rule.fragment))
            .map(|rule| rule.policy)
            .unwrap_or(self.default_trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"
dotnet: /usr/local/bin/dotnet
configuration: Release
aot_projects:
  - console
  - minimalapi
trim_rules:
  - fragment: api
    policy: partial
  - fragment: console
    policy: full
default_trim: default
"#;

    #[test]
    fn test_valid_config() {
        let config = HarnessConfig::load_string(VALID_CONFIG).unwrap();
        assert_eq!(config.configuration, "Release");
        assert_eq!(config.aot_projects.len(), 2);
        assert_eq!(config.trim_rules.len(), 2);
    }

    #[test]
    fn test_defaults_applied() {
        let config = HarnessConfig::load_string("{}").unwrap();
        assert_eq!(config.dotnet, PathBuf::from("dotnet"));
        assert_eq!(config.configuration, "Release");
        assert!(!config.aot_projects.is_empty());
    }

    #[test]
    fn test_empty_fragment_rejected() {
        let yaml = r#"
trim_rules:
  - fragment: ""
    policy: full
"#;
        assert!(HarnessConfig::load_string(yaml).is_err());
    }

    #[test]
    fn test_empty_allow_list_entry_rejected() {
        let yaml = r#"
aot_projects:
  - ""
"#;
        assert!(HarnessConfig::load_string(yaml).is_err());
    }

    #[test]
    fn test_allow_list_case_insensitive() {
        let config = HarnessConfig::default();
        let project = ProjectName::new("MinimalApi").unwrap();
        assert!(config.allows_aot(&project));
    }

    #[test]
    fn test_trim_policy_non_trimming_scenario_is_none() {
        let config = HarnessConfig::default();
        let project = ProjectName::new("console").unwrap();
        assert_eq!(
            config.trim_policy_for(&project, Scenario::SelfContained),
            TrimPolicy::None
        );
        assert_eq!(
            config.trim_policy_for(&project, Scenario::Default),
            TrimPolicy::None
        );
    }

    #[test]
    fn test_trim_policy_first_match_wins() {
        let config = HarnessConfig::default();
        // "minimalapi" matches the "api" rule before "console" could apply.
        let project = ProjectName::new("minimalapi").unwrap();
        assert_eq!(
            config.trim_policy_for(&project, Scenario::Trimmed),
            TrimPolicy::Partial
        );
        let console = ProjectName::new("consolejson").unwrap();
        assert_eq!(
            config.trim_policy_for(&console, Scenario::Trimmed),
            TrimPolicy::Full
        );
    }

    #[test]
    fn test_trim_policy_fallback() {
        let config = HarnessConfig::default();
        let project = ProjectName::new("workerservice").unwrap();
        assert_eq!(
            config.trim_policy_for(&project, Scenario::TrimmedReadyToRun),
            TrimPolicy::Default
        );
    }

    #[test]
    fn test_config_file_not_found() {
        let result = HarnessConfig::load_file("/nonexistent/launchbench.yaml");
        assert!(matches!(
            result,
            Err(HarnessError::Config(ConfigError::ConfigNotFound { .. }))
        ));
    }
}
