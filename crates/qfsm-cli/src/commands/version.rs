//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - reversible circuits for fixed-length substring matching",
        style("QFSM").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qfsm-ir           Cells, registers and the instruction log");
    println!("  qfsm-gates        Reversible gate library");
    println!("  qfsm-core         Circuit builder and classical reference");
    println!("  qfsm-hal          Execution backend abstraction");
    println!("  qfsm-adapter-sim  Local reversible-circuit simulator");
    println!("  qfsm-cli          Command-line interface");
    println!();
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
