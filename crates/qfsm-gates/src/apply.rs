//! Expansion of gate applications into primitive instructions.

use qfsm_ir::{CellId, Circuit, Control, Instruction, Register};
use tracing::debug;

use crate::error::GateResult;
use crate::gate::{Application, Gate};
use crate::inverse::inverse;

/// Expand an application into its primitive fragment.
///
/// Gates without an ancilla operand get every control appended to each
/// primitive. `BitwiseCand` and `Rotate` instead fold the controls into
/// `anc[0]`, broadcast it across the ancilla, control each lane by its own
/// ancilla cell and finally undo the broadcast, leaving every ancilla at 0.
pub fn expand(application: &Application) -> GateResult<Vec<Instruction>> {
    application.validate()?;

    let gate = &application.gate;
    let controls = &application.controls;
    let label = gate.label();

    let fragment = match gate.ancilla() {
        Some(anc) if !controls.is_empty() && !anc.is_empty() => {
            let broadcast = broadcast(controls, anc);
            let mut fragment = broadcast.clone();
            fragment.extend(primitives(gate, Some(anc)));
            fragment.extend(inverse(&broadcast));
            fragment
        }
        _ => primitives(gate, None)
            .into_iter()
            .map(|inst| inst.with_controls(controls.iter().copied()))
            .collect(),
    };

    Ok(fragment
        .into_iter()
        .map(|inst| inst.with_label(label.clone()))
        .collect())
}

/// Expand an application and append it to `circuit`.
///
/// Returns the number of appended instructions. On error nothing is appended.
pub fn apply(circuit: &mut Circuit, application: &Application) -> GateResult<usize> {
    let fragment = expand(application)?;
    let count = circuit.append(fragment)?;
    debug!(
        gate = %application.gate.label(),
        controls = application.controls.len(),
        instructions = count,
        "applied gate"
    );
    Ok(count)
}

/// Fold `controls` into `anc[0]` and spread it over the whole ancilla.
fn broadcast(controls: &[Control], anc: &Register) -> Vec<Instruction> {
    let cells = anc.cells();
    let mut fragment = vec![Instruction::mcx(controls.iter().copied(), cells[0])];
    fragment.extend(doubling_tree(&cells));
    fragment
}

/// Copy `cells[0]` into every other cell in ⌈log₂ len⌉ layers.
fn doubling_tree(cells: &[CellId]) -> Vec<Instruction> {
    let mut fragment = vec![];
    let mut step = 1;
    while step < cells.len() {
        for i in 0..step {
            if i + step < cells.len() {
                fragment.push(Instruction::cx(cells[i], cells[i + step]));
            }
        }
        step *= 2;
    }
    fragment
}

/// Attach the lane control `anc[lane]` when broadcasting.
fn lane(inst: Instruction, lanes: Option<&[CellId]>, index: usize) -> Instruction {
    match lanes {
        Some(anc) => inst.with_controls([Control::positive(anc[index])]),
        None => inst,
    }
}

fn primitives(gate: &Gate, lane_controls: Option<&Register>) -> Vec<Instruction> {
    let lanes = lane_controls.map(Register::cells);
    let lanes = lanes.as_deref();

    match gate {
        Gate::SetBits { target, bits } => target
            .iter()
            .zip(bits)
            .filter(|(_, bit)| **bit)
            .map(|(cell, _)| Instruction::x(cell))
            .collect(),

        Gate::Reverse { target } => {
            let cells = target.cells();
            let len = cells.len();
            (0..len / 2)
                .map(|i| Instruction::swap(cells[i], cells[len - 1 - i]))
                .collect()
        }

        Gate::Match { x, y, result } => {
            let equal_ones = x
                .iter()
                .zip(y.iter())
                .zip(result.iter())
                .map(|((a, b), r)| Instruction::ccx(a, b, r));
            let equal_zeros = x.iter().zip(y.iter()).zip(result.iter()).map(|((a, b), r)| {
                Instruction::mcx([Control::negative(a), Control::negative(b)], r)
            });
            equal_ones.chain(equal_zeros).collect()
        }

        Gate::Extend {
            lambda,
            result,
            order,
        } => {
            let src = lambda.cells();
            let dst = result.cells();
            let shift = 1usize << (order - 1);
            let positions: Vec<usize> = if *order == 1 {
                (0..dst.len())
                    .step_by(2)
                    .chain((1..dst.len()).step_by(2))
                    .collect()
            } else {
                (0..dst.len()).collect()
            };
            positions
                .into_iter()
                .filter(|j| j + shift < dst.len())
                .map(|j| Instruction::ccx(src[j], src[j + shift], dst[j]))
                .collect()
        }

        Gate::Fanout { source, target } => {
            let cells = target.cells();
            let Some(&first) = cells.first() else {
                return vec![];
            };
            let mut fragment: Vec<Instruction> = source
                .iter()
                .map(|src| Instruction::cx(src, first))
                .collect();
            fragment.extend(doubling_tree(&cells));
            fragment
        }

        Gate::BitwiseCand { x, y, result, .. } => x
            .iter()
            .zip(y.iter())
            .zip(result.iter())
            .enumerate()
            .map(|(t, ((a, b), r))| lane(Instruction::ccx(a, b, r), lanes, t))
            .collect(),

        Gate::ConditionalCopy { source, result } => source
            .iter()
            .zip(result.iter())
            .map(|(s, r)| Instruction::cx(s, r))
            .collect(),

        Gate::Rotate { target, amount, .. } => {
            let cells = target.cells();
            let len = cells.len();
            if len < 2 || amount % len == 0 {
                return vec![];
            }
            let k = amount % len;
            let mut fragment = vec![];

            // Layer 1: reverse the whole register.
            for j in 0..len / 2 {
                fragment.push(lane(
                    Instruction::swap(cells[j], cells[len - 1 - j]),
                    lanes,
                    j,
                ));
            }

            // Layer 2: reverse [0, k) and [k, len) side by side.
            for j in 0..k / 2 {
                fragment.push(lane(Instruction::swap(cells[j], cells[k - 1 - j]), lanes, j));
            }
            for j in 0..(len - k) / 2 {
                fragment.push(lane(
                    Instruction::swap(cells[k + j], cells[len - 1 - j]),
                    lanes,
                    k / 2 + j,
                ));
            }
            fragment
        }

        Gate::UnaryOr { source, result } => {
            let r = result.cells();
            vec![
                Instruction::mcx(source.iter().map(Control::negative), r[0]),
                Instruction::x(r[0]),
            ]
        }
    }
}
