// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! `launchbench validate` command - validate a harness configuration file.

use launchbench_core::HarnessConfig;

pub fn execute(file: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(file = %file, "Validating harness configuration");

    let config = HarnessConfig::load_file(file)?;

    println!("✓ Configuration validated successfully");
    println!();
    println!("  build tool:     {}", config.dotnet.display());
    println!("  configuration:  {}", config.configuration);
    println!("  default trim:   {}", config.default_trim);
    println!();
    println!("Ahead-of-time allow-list:");
    let mut projects: Vec<&String> = config.aot_projects.iter().collect();
    projects.sort();
    for project in projects {
        println!("  • {}", project);
    }
    println!();
    println!("Trim classification rules (first match wins):");
    for rule in &config.trim_rules {
        println!("  • *{}* → {}", rule.fragment, rule.policy);
    }

    Ok(())
}
