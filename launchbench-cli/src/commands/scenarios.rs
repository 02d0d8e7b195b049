// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! `launchbench scenarios` command - list the scenario matrix.

use launchbench_core::Scenario;

pub fn execute() -> Result<(), Box<dyn std::error::Error>> {
    println!("Publish scenarios:");
    for scenario in Scenario::ALL {
        let mut traits = Vec::new();
        if scenario.wants_self_contained() {
            traits.push("self-contained");
        }
        if scenario.wants_single_file() {
            traits.push("single-file");
        }
        if scenario.wants_ready_to_run() {
            traits.push("ready-to-run");
        }
        if scenario.wants_trimming() {
            traits.push("trimmed");
        }
        if scenario.is_aot() {
            traits.push("aot");
        }
        if scenario.disables_apphost() {
            traits.push("no apphost");
        }
        if traits.is_empty() {
            println!("  • {}", scenario);
        } else {
            println!("  • {} ({})", scenario, traits.join(", "));
        }
    }
    Ok(())
}
