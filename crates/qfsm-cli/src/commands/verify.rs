//! Verify command implementation.
//!
//! Runs circuits on a backend and compares the decoded outcome with the
//! classical scan.

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qfsm_core::{Fsm, Mode, Outcome, Problem, classical};
use qfsm_hal::Backend;

use super::common::{ProblemArgs, create_backend};
use crate::config::Config;
use crate::report::describe_outcome;

/// One compared problem.
#[derive(Debug)]
pub struct Check {
    /// The input.
    pub problem: Problem,
    /// What the circuit reported.
    pub measured: Outcome,
    /// What the classical scan expects.
    pub expected: Outcome,
}

impl Check {
    /// Whether circuit and scan agree.
    pub fn passed(&self) -> bool {
        self.measured == self.expected
    }
}

/// Expected outcome of `problem`.
pub fn expected_outcome(problem: &Problem) -> Outcome {
    let positions = classical::expected_positions(problem);
    Outcome {
        found: !positions.is_empty(),
        positions,
    }
}

/// Build, run and compare one problem.
pub async fn check(problem: Problem, backend: &dyn Backend) -> Result<Check> {
    let expected = expected_outcome(&problem);
    let mut fsm = Fsm::new(problem).context("Failed to allocate registers")?;
    fsm.build().context("Failed to build circuit")?;
    fsm.execute(backend, 1).await.context("Execution failed")?;
    let measured = fsm.outcome()?;
    debug!(?measured, ?expected, "checked problem");
    Ok(Check {
        problem: fsm.problem().clone(),
        measured,
        expected,
    })
}

/// Every problem over `args`' strings: each length, each mode and, for
/// from-position, each start.
pub fn sweep(args: &ProblemArgs) -> Result<Vec<Problem>> {
    let base = args.to_problem()?;
    let n = base.original_len();
    let mut problems = vec![];
    for d in 2..=n {
        for mode in [Mode::FixedPosition, Mode::FreeSearch] {
            problems.push(
                Problem::builder(&args.x, &args.y, d)
                    .mode(mode)
                    .padded(args.pad)
                    .build()?,
            );
        }
        for start in 0..=n {
            problems.push(
                Problem::builder(&args.x, &args.y, d)
                    .mode(Mode::FromPosition)
                    .starting_position(start)
                    .padded(args.pad)
                    .build()?,
            );
        }
    }
    Ok(problems)
}

/// Execute the verify command.
pub async fn execute(
    args: &ProblemArgs,
    sweep_all: bool,
    backend: Option<&str>,
    config: &Config,
) -> Result<()> {
    let backend_name = backend.unwrap_or(&config.backend);
    let backend_impl = create_backend(backend_name, config)?;

    let problems = if sweep_all {
        sweep(args)?
    } else {
        vec![args.to_problem()?]
    };
    println!(
        "{} Verifying {} problem{} on {}",
        style("→").cyan().bold(),
        problems.len(),
        if problems.len() == 1 { "" } else { "s" },
        style(backend_name).yellow()
    );

    let mut failures = 0usize;
    for problem in problems {
        let result = check(problem, backend_impl.as_ref()).await?;
        let label = format!(
            "d={} mode={}{}",
            result.problem.d(),
            result.problem.mode(),
            result
                .problem
                .starting_position()
                .map(|s| format!(" start={s}"))
                .unwrap_or_default()
        );
        if result.passed() {
            println!(
                "  {} {label}: {}",
                style("✓").green(),
                describe_outcome(&result.measured, result.problem.d())
            );
        } else {
            failures += 1;
            println!(
                "  {} {label}: circuit reported {}, expected {}",
                style("✗").red().bold(),
                describe_outcome(&result.measured, result.problem.d()),
                describe_outcome(&result.expected, result.problem.d())
            );
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} problem(s) disagree with the classical scan");
    }
    println!("\n{} All outcomes match", style("✓").green().bold());
    Ok(())
}
