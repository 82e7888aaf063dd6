//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::cell::{CellId, Control};
use crate::gate::{Gate, StandardGate};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A primitive gate operation.
    Gate(Gate),
    /// Barrier (stage boundary, no boolean effect).
    Barrier,
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Control cells with their polarity. Empty for uncontrolled gates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<Control>,
    /// Cells the gate acts on (or the cells a barrier spans).
    pub targets: Vec<CellId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(
        gate: impl Into<Gate>,
        controls: impl IntoIterator<Item = Control>,
        targets: impl IntoIterator<Item = CellId>,
    ) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            controls: controls.into_iter().collect(),
            targets: targets.into_iter().collect(),
        }
    }

    /// NOT on a single cell.
    pub fn x(target: CellId) -> Self {
        Self::gate(StandardGate::X, [], [target])
    }

    /// Controlled NOT.
    pub fn cx(control: CellId, target: CellId) -> Self {
        Self::gate(StandardGate::X, [Control::positive(control)], [target])
    }

    /// Toffoli.
    pub fn ccx(c1: CellId, c2: CellId, target: CellId) -> Self {
        Self::gate(
            StandardGate::X,
            [Control::positive(c1), Control::positive(c2)],
            [target],
        )
    }

    /// Multi-controlled NOT with per-control polarity.
    pub fn mcx(controls: impl IntoIterator<Item = Control>, target: CellId) -> Self {
        Self::gate(StandardGate::X, controls, [target])
    }

    /// Exchange two cells.
    pub fn swap(a: CellId, b: CellId) -> Self {
        Self::gate(StandardGate::Swap, [], [a, b])
    }

    /// Fredkin (controlled swap).
    pub fn cswap(control: CellId, a: CellId, b: CellId) -> Self {
        Self::gate(StandardGate::Swap, [Control::positive(control)], [a, b])
    }

    /// Create a barrier instruction.
    pub fn barrier(cells: impl IntoIterator<Item = CellId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            controls: vec![],
            targets: cells.into_iter().collect(),
        }
    }

    /// Label the gate of this instruction. Barriers are left unchanged.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        if let InstructionKind::Gate(gate) = &mut self.kind {
            gate.label = Some(label.into());
        }
        self
    }

    /// Append extra controls. Barriers are left unchanged.
    #[must_use]
    pub fn with_controls(mut self, extra: impl IntoIterator<Item = Control>) -> Self {
        if self.is_gate() {
            self.controls.extend(extra);
        }
        self
    }

    /// Iterate over every cell touched by this instruction, controls first.
    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.controls
            .iter()
            .map(|c| c.cell)
            .chain(self.targets.iter().copied())
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            InstructionKind::Barrier => None,
        }
    }

    /// Get the label of the gate, if any.
    pub fn label(&self) -> Option<&str> {
        self.as_gate().and_then(|g| g.label.as_deref())
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            InstructionKind::Gate(g) => g.kind.name(self.controls.len()),
            InstructionKind::Barrier => "barrier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::ccx(CellId(0), CellId(1), CellId(2));
        assert!(inst.is_gate());
        assert_eq!(inst.controls.len(), 2);
        assert_eq!(inst.targets, vec![CellId(2)]);
        assert_eq!(inst.name(), "ccx");
    }

    #[test]
    fn test_with_controls_promotes_name() {
        let inst = Instruction::swap(CellId(1), CellId(2))
            .with_controls([Control::negative(CellId(0))])
            .with_label("ROT");
        assert_eq!(inst.name(), "cswap");
        assert_eq!(inst.label(), Some("ROT"));
        assert_eq!(
            inst.cells().collect::<Vec<_>>(),
            vec![CellId(0), CellId(1), CellId(2)]
        );
    }

    #[test]
    fn test_barrier_ignores_controls_and_labels() {
        let inst = Instruction::barrier([CellId(0), CellId(1)])
            .with_controls([Control::positive(CellId(5))])
            .with_label("stage");
        assert!(inst.is_barrier());
        assert!(inst.controls.is_empty());
        assert_eq!(inst.label(), None);
        assert_eq!(inst.name(), "barrier");
    }
}
