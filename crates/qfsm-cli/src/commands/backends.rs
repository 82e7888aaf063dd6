//! Backends command implementation.

use anyhow::Result;
use console::style;

use qfsm_hal::Availability;

use super::common::{backend_registry, create_backend};
use crate::config::Config;

/// Execute the backends command.
pub async fn execute(config: &Config) -> Result<()> {
    println!("{} Available backends:\n", style("QFSM").cyan().bold());

    let registry = backend_registry();
    let default = registry.resolve(&config.backend).ok();

    for name in registry.names() {
        let backend = create_backend(&name, config)?;
        let caps = backend.capabilities();
        let availability = backend.availability().await?;

        println!(
            "  {} {} {}{}",
            if availability.is_online() {
                style("●").green()
            } else {
                style("○").red()
            },
            style(&name).bold(),
            if caps.is_simulator { "(local)" } else { "" },
            if default.as_ref() == Some(&name) { " [default]" } else { "" }
        );
        if let Availability::Online { pending } = availability {
            println!("    Pending jobs: {pending}");
        }
        println!("    Cells: {}", caps.num_cells);
        println!("    Max shots: {}", caps.max_shots);
        println!("    Gates: {}", caps.gate_set.gates.join(", "));
        if !caps.features.is_empty() {
            println!("    Features: {}", caps.features.join(", "));
        }
        println!();
    }

    Ok(())
}
