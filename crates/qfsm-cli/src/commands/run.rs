//! Run command implementation.

use anyhow::Result;
use console::style;

use super::common::{ProblemArgs, create_backend, execute_with_spinner};
use crate::config::Config;
use crate::report::{print_outcome, print_problem, print_results};

/// Execute the run command.
pub async fn execute(
    args: &ProblemArgs,
    shots: Option<u32>,
    backend: Option<&str>,
    config: &Config,
) -> Result<()> {
    let shots = shots.unwrap_or(config.shots);
    let backend_name = backend.unwrap_or(&config.backend);

    println!(
        "{} Running on {} ({} shots)",
        style("→").cyan().bold(),
        style(backend_name).yellow(),
        shots
    );

    let mut fsm = args.build_fsm()?;
    print_problem(fsm.problem());
    let stats = fsm.stats();
    println!(
        "  Built: {} cells, {} gates, depth {}",
        stats.cells, stats.gates, stats.depth
    );

    let backend_impl = create_backend(backend_name, config)?;
    execute_with_spinner(&mut fsm, backend_impl.as_ref(), shots).await?;

    print_results(fsm.execution_result()?);
    print_outcome(&fsm.outcome()?, fsm.problem().d());

    Ok(())
}
