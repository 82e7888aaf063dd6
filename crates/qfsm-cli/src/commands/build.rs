//! Build command implementation.

use std::fs;

use anyhow::{Context, Result};
use console::style;

use super::common::ProblemArgs;
use crate::report::{print_problem, print_stats};

/// Execute the build command.
pub fn execute(args: &ProblemArgs, output: Option<&str>) -> Result<()> {
    println!("{} Building matching circuit", style("→").cyan().bold());

    let fsm = args.build_fsm()?;
    print_problem(fsm.problem());
    print_stats(&fsm.stats());

    if let Some(path) = output {
        let json = fsm
            .circuit()
            .to_json()
            .context("Failed to serialize circuit")?;
        fs::write(path, json).with_context(|| format!("Failed to write output file: {path}"))?;
        println!("\n  Written: {}", style(path).green());
    }

    Ok(())
}
