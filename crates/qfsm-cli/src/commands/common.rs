//! Shared helpers for CLI commands.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qfsm_adapter_sim::SimulatorBackend;
use qfsm_core::{Fsm, Mode, Problem};
use qfsm_hal::{Availability, Backend, BackendConfig, BackendRegistry};

use crate::config::Config;

/// Problem input shared by `build`, `run` and `verify`.
#[derive(Args, Debug, Clone)]
pub struct ProblemArgs {
    /// First bit string
    pub x: String,

    /// Second bit string
    pub y: String,

    /// Length of the common substring
    #[arg(short = 'd', long = "length")]
    pub d: usize,

    /// Problem variant (fixed, from, free)
    #[arg(short, long, default_value = "free")]
    pub mode: Mode,

    /// Starting position (from mode only)
    #[arg(short, long)]
    pub start: Option<usize>,

    /// Pad inputs to the next power of two
    #[arg(long)]
    pub pad: bool,
}

impl ProblemArgs {
    /// Validate the arguments into a problem.
    pub fn to_problem(&self) -> Result<Problem> {
        let mut builder = Problem::builder(&self.x, &self.y, self.d)
            .mode(self.mode)
            .padded(self.pad);
        if let Some(start) = self.start {
            builder = builder.starting_position(start);
        }
        builder.build().context("Invalid problem")
    }

    /// Validate and build the circuit.
    pub fn build_fsm(&self) -> Result<Fsm> {
        let mut fsm = Fsm::new(self.to_problem()?).context("Failed to allocate registers")?;
        fsm.build().context("Failed to build circuit")?;
        Ok(fsm)
    }
}

/// Registry of every backend this binary ships.
pub fn backend_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register::<SimulatorBackend>("simulator");
    registry.alias("sim", "simulator");
    registry
}

/// Resolve a backend by name or alias and apply the configured limits.
pub fn create_backend(name: &str, config: &Config) -> Result<Box<dyn Backend>> {
    let registry = backend_registry();
    let name = registry.resolve(name)?;

    let mut backend_config = BackendConfig::new(&name);
    if let Some(max_cells) = config.max_cells {
        backend_config = backend_config.with_extra("max_cells", serde_json::json!(max_cells));
    }
    registry
        .create(&name, backend_config)
        .with_context(|| format!("Failed to create backend '{name}'"))
}

/// Execute a built circuit behind a spinner.
pub async fn execute_with_spinner(
    fsm: &mut Fsm,
    backend: &dyn Backend,
    shots: u32,
) -> Result<()> {
    if let Availability::Offline(reason) = backend.availability().await? {
        anyhow::bail!("Backend '{}' is offline: {reason}", backend.name());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message(format!("Running on {}...", style(backend.name()).yellow()));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = fsm.execute(backend, shots).await;
    spinner.finish_and_clear();
    result.context("Execution failed")?;
    Ok(())
}
