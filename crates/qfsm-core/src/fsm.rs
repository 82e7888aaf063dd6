//! The circuit builder and its lifecycle.

use std::fmt;

use qfsm_gates::{Application, Gate, apply};
use qfsm_hal::{Backend, Counts, ExecutionResult, HalError};
use qfsm_ir::{CellId, Circuit, Control, Register};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::ancilla::AncillaAllocator;
use crate::error::{FsmError, FsmResult};
use crate::layout::Registry;
use crate::outcome::Outcome;
use crate::problem::{Mode, Problem};
use crate::stats::CircuitStats;

/// Lifecycle of a matching circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Registers allocated, no gates yet.
    Instantiated,
    /// Every gate appended; measurement handles are available.
    Ready,
    /// A backend returned a distribution.
    Executed,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Instantiated => write!(f, "instantiated"),
            State::Ready => write!(f, "ready"),
            State::Executed => write!(f, "executed"),
        }
    }
}

/// Reversible circuit deciding whether `x` and `y` share a common substring
/// of length `d`.
///
/// ```text
/// new() ──► Instantiated ──build()──► Ready ──execute()──► Executed
///                ▲                      │                     │
///                └──────revert()────────┴─────────────────────┘
/// ```
///
/// Construction allocates every register. [`build`](Self::build) appends the
/// gate list in one pass and either leaves the circuit `Ready` or fails with
/// the gate list empty.
#[derive(Debug, Clone)]
pub struct Fsm {
    problem: Problem,
    circuit: Circuit,
    registry: Registry,
    ancilla: AncillaAllocator,
    state: State,
    result: Option<ExecutionResult>,
}

impl Fsm {
    /// Allocate the registers of `problem`.
    pub fn new(problem: Problem) -> FsmResult<Self> {
        let mut circuit = Circuit::new(format!("fsm-{}", problem.mode()));
        let registry = Registry::allocate(&mut circuit, &problem)?;
        let ancilla =
            AncillaAllocator::new(registry.ancilla().clone(), problem.n(), problem.d_len())?;

        debug!(
            n = problem.n(),
            d = problem.d(),
            mode = %problem.mode(),
            cells = circuit.num_cells(),
            "instantiated matching circuit"
        );

        Ok(Self {
            problem,
            circuit,
            registry,
            ancilla,
            state: State::Instantiated,
            result: None,
        })
    }

    /// Append the whole matching circuit.
    ///
    /// Fails if the circuit is not freshly instantiated. Any construction
    /// error leaves the gate list empty.
    #[instrument(skip(self), fields(n = self.problem.n(), d = self.problem.d(), mode = %self.problem.mode()))]
    pub fn build(&mut self) -> FsmResult<&mut Self> {
        if self.state != State::Instantiated {
            return Err(FsmError::State {
                operation: "build",
                state: self.state,
            });
        }

        let mut ancilla = self.ancilla.clone();
        if let Err(err) = compose(&mut self.circuit, &self.registry, &mut ancilla, &self.problem) {
            self.circuit.clear();
            return Err(err);
        }

        self.state = State::Ready;
        info!(
            instructions = self.circuit.len(),
            depth = self.circuit.depth(),
            "circuit ready"
        );
        Ok(self)
    }

    /// Drop every gate and any execution result, keeping the registers.
    pub fn revert(&mut self) -> &mut Self {
        self.circuit.clear();
        self.result = None;
        self.state = State::Instantiated;
        debug!("reverted to a register-only circuit");
        self
    }

    /// Run the circuit on `backend` and keep its distribution.
    #[instrument(skip(self, backend), fields(backend = backend.name()))]
    pub async fn execute(&mut self, backend: &dyn Backend, shots: u32) -> FsmResult<&Counts> {
        let measured = self.measured_cells()?;
        let job = backend.submit(&self.circuit, &measured, shots).await?;
        let result = backend.wait(&job).await?;

        info!(
            job = %job,
            outcomes = result.counts.len(),
            elapsed_ms = ?result.execution_time_ms,
            "execution finished"
        );
        self.state = State::Executed;
        Ok(&self.result.insert(result).counts)
    }

    fn require_built(&self, operation: &'static str) -> FsmResult<()> {
        match self.state {
            State::Ready | State::Executed => Ok(()),
            State::Instantiated => Err(FsmError::State {
                operation,
                state: self.state,
            }),
        }
    }

    /// The "found" cell.
    pub fn found_cell(&self) -> FsmResult<CellId> {
        self.require_built("measure the found cell")?;
        Ok(self.registry.out().cell(0)?)
    }

    /// The `n + 1` cell register whose set cells mark `start + d`.
    pub fn begins(&self) -> FsmResult<&Register> {
        self.require_built("measure the begins register")?;
        Ok(self.registry.begins())
    }

    /// Cells a backend measures: `out` followed by every `begins` cell.
    pub fn measured_cells(&self) -> FsmResult<Vec<CellId>> {
        let found = self.found_cell()?;
        let mut cells = vec![found];
        cells.extend(self.begins()?.iter());
        Ok(cells)
    }

    /// The distribution of the last execution.
    pub fn distribution(&self) -> FsmResult<&Counts> {
        match (&self.result, self.state) {
            (Some(result), State::Executed) => Ok(&result.counts),
            _ => Err(FsmError::State {
                operation: "read the distribution",
                state: self.state,
            }),
        }
    }

    /// The full result of the last execution.
    pub fn execution_result(&self) -> FsmResult<&ExecutionResult> {
        match (&self.result, self.state) {
            (Some(result), State::Executed) => Ok(result),
            _ => Err(FsmError::State {
                operation: "read the execution result",
                state: self.state,
            }),
        }
    }

    /// Decode the most frequent outcome of the last execution.
    pub fn outcome(&self) -> FsmResult<Outcome> {
        let counts = self.distribution()?;
        let (bits, _) = counts
            .most_frequent()
            .ok_or(FsmError::Backend(HalError::EmptyResult))?;
        Outcome::decode(bits, self.problem.d())
    }

    /// The starting position of a from-position circuit.
    pub fn starting_position(&self) -> FsmResult<usize> {
        match (self.problem.mode(), self.problem.starting_position()) {
            (Mode::FromPosition, Some(p)) => Ok(p),
            _ => Err(FsmError::WrongMode {
                operation: "starting_position",
                expected: Mode::FromPosition.as_str(),
            }),
        }
    }

    /// Size and depth figures of the current gate list.
    pub fn stats(&self) -> CircuitStats {
        CircuitStats::from_circuit(&self.circuit)
    }

    /// The circuit built so far.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// The register handles.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The ancilla partition.
    pub fn ancilla(&self) -> &AncillaAllocator {
        &self.ancilla
    }

    /// The validated input.
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }
}

/// Append every gate of the matching circuit in stage order.
fn compose(
    circuit: &mut Circuit,
    registry: &Registry,
    ancilla: &mut AncillaAllocator,
    problem: &Problem,
) -> FsmResult<()> {
    let mut push = |gate: Application| apply(circuit, &gate);

    // Classical inputs.
    push(Gate::SetBits { target: registry.x().clone(), bits: problem.x().to_vec() }.into())?;
    push(Gate::SetBits { target: registry.y().clone(), bits: problem.y().to_vec() }.into())?;
    push(Gate::SetBits { target: registry.d().clone(), bits: problem.d_bits_msb_first() }.into())?;
    push(
        Gate::SetBits {
            target: registry.d_init().clone(),
            bits: problem.initial_pointers(),
        }
        .into(),
    )?;

    // Cell i of d now carries weight 2^i.
    push(Gate::Reverse { target: registry.d().clone() }.into())?;

    let lambda = registry.lambda();
    push(
        Gate::Match {
            x: registry.x().clone(),
            y: registry.y().clone(),
            result: lambda[0].clone(),
        }
        .into(),
    )?;
    for (order, pair) in (1u32..).zip(lambda.windows(2)) {
        push(
            Gate::Extend {
                lambda: pair[0].clone(),
                result: pair[1].clone(),
                order,
            }
            .into(),
        )?;
    }

    for (stage, current) in registry.d_chain().iter().enumerate() {
        let bit = Control::positive(registry.d().cell(stage)?);
        let previous = registry.stage_input(stage).ok_or_else(|| {
            FsmError::Allocation(format!("no pointer vector feeds stage {stage}"))
        })?;
        let link = lambda.get(stage).ok_or_else(|| {
            FsmError::Allocation(format!("λ-chain has no link for stage {stage}"))
        })?;

        let window = ancilla.acquire(stage)?;
        push(
            Application::new(Gate::BitwiseCand {
                x: link.clone(),
                y: previous.clone(),
                anc: window.cand.clone(),
                result: current.clone(),
            })
            .controlled_by(bit),
        )?;
        push(
            Application::new(Gate::Rotate {
                target: current.clone(),
                anc: window.rotate.clone(),
                amount: 1 << stage,
            })
            .controlled_by(bit),
        )?;
        push(
            Application::new(Gate::ConditionalCopy {
                source: previous.clone(),
                result: current.clone(),
            })
            .controlled_by(Control::negative(bit.cell)),
        )?;
        ancilla.release(window)?;
        debug!(stage, chunk = 1usize << stage, "appended stage");
    }

    push(
        Gate::UnaryOr {
            source: registry.begins().clone(),
            result: registry.out().clone(),
        }
        .into(),
    )?;
    Ok(())
}
