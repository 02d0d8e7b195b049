// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! `launchbench compose` command - print the publish argument vector.
//!
//! Lets a scenario's composed arguments be inspected (and diffed between
//! runs) without invoking the toolchain.

use super::{build_request, load_config};
use launchbench_core::Harness;

pub fn execute(
    config_path: Option<&str>,
    project: &str,
    runtime: Option<&str>,
    scenario: &str,
    root: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let request = build_request(&config, project, runtime, scenario, None)?;
    let harness = Harness::new(config, root);

    let args = harness.compose_args(&request)?;

    println!(
        "Arguments for {} ({}, trim: {}):",
        request.project, request.scenario, request.trim
    );
    println!();
    println!("  {} publish \\", harness.config().dotnet.display());
    for (i, arg) in args.iter().enumerate() {
        if i + 1 == args.len() {
            println!("    {}", arg);
        } else {
            println!("    {} \\", arg);
        }
    }

    Ok(())
}
