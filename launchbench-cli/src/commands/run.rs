// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! `launchbench run` command - one clean/publish/run cycle.

use std::time::Duration;

use super::{build_request, load_config};
use launchbench_core::Harness;

pub fn execute(
    config_path: Option<&str>,
    project: &str,
    runtime: Option<&str>,
    scenario: &str,
    run_id: Option<&str>,
    root: &str,
    timeout_secs: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let request = build_request(&config, project, runtime, scenario, run_id)?;
    let harness = Harness::new(config, root);
    let timeout = timeout_secs.map(Duration::from_secs);

    println!(
        "Publishing {} ({}, trim: {}, runtime: {}, run: {})",
        request.project, request.scenario, request.trim, request.runtime, request.run_id
    );

    let published = harness.publish(&request)?;
    println!(
        "✓ Published {} ({}, {} bytes)",
        published.artifact.path.display(),
        if published.artifact.native {
            "native"
        } else {
            "managed"
        },
        published.artifact.size_bytes
    );

    println!("Running subject...");
    let outcome = harness.run(&published, timeout)?;

    println!("✓ Subject exited with code {}", outcome.exit_code);
    println!("  started:       {}", outcome.started_at.to_rfc3339());
    println!("  duration:      {} ms", outcome.duration.as_millis());
    println!("  stdout bytes:  {}", outcome.stdout.len());
    println!("  stderr bytes:  {}", outcome.stderr.len());
    if let Some(bytes) = outcome.max_working_set_bytes {
        println!("  working set:   {} KB (peak)", bytes / 1024);
    }
    println!(
        "  stdout copied to {}",
        published.output_dir.join("output.txt").display()
    );

    Ok(())
}
