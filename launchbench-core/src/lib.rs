//! Launchbench Core Library
//!
//! Publish-scenario benchmarking pipeline: argument composition for the
//! publish toolchain, artifact discovery, secrets resolution, subject
//! process execution with deadlock-free stream capture, and output
//! persistence.

pub mod artifact;
pub mod compose;
pub mod config;
pub mod error;
pub mod harness;
pub mod paths;
pub mod persist;
pub mod publish;
pub mod runner;
pub mod secrets;
pub mod types;

// Re-export commonly used types
pub use artifact::Artifact;
pub use config::{HarnessConfig, TrimRule};
pub use error::{
    BuildError, ConfigError, HarnessError, HarnessResult, PersistError, RunError, SecretsError,
};
pub use harness::{BuildRequest, Harness, PublishResult};
pub use runner::{ProcessRunner, RunOutcome};
pub use types::{ProjectName, RunId, RuntimeId, Scenario, TrimPolicy};
