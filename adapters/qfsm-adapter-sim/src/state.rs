//! Classical basis-state evaluation of reversible circuits.

use qfsm_ir::{CellId, Circuit, Instruction, InstructionKind, Register, StandardGate};

/// The boolean value of every cell of a circuit.
///
/// X and SWAP (with any controls) map basis states to basis states, so a
/// circuit built from them is evaluated exactly by tracking one bit per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitState {
    bits: Vec<bool>,
}

impl BitState {
    /// All cells at 0.
    pub fn zeros(num_cells: usize) -> Self {
        Self {
            bits: vec![false; num_cells],
        }
    }

    /// A zero state sized for `circuit`.
    pub fn for_circuit(circuit: &Circuit) -> Self {
        Self::zeros(circuit.num_cells())
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check whether the state has no cells.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Value of a cell.
    #[inline]
    pub fn get(&self, cell: CellId) -> bool {
        self.bits[cell.index()]
    }

    /// Set a cell.
    #[inline]
    pub fn set(&mut self, cell: CellId, value: bool) {
        self.bits[cell.index()] = value;
    }

    /// Load `values` into the cells of `register`, index 0 first.
    pub fn load(&mut self, register: &Register, values: &[bool]) {
        for (cell, &value) in register.iter().zip(values) {
            self.set(cell, value);
        }
    }

    /// Read the cells of `register`, index 0 first.
    pub fn read(&self, register: &Register) -> Vec<bool> {
        register.iter().map(|c| self.get(c)).collect()
    }

    /// Check whether every cell of `register` is 0.
    pub fn is_clear(&self, register: &Register) -> bool {
        register.iter().all(|c| !self.get(c))
    }

    /// Render `cells` as a bitstring, one character per cell in order.
    pub fn bitstring(&self, cells: &[CellId]) -> String {
        cells
            .iter()
            .map(|&c| if self.get(c) { '1' } else { '0' })
            .collect()
    }

    /// Apply a single instruction.
    pub fn apply(&mut self, instruction: &Instruction) {
        let InstructionKind::Gate(gate) = &instruction.kind else {
            return;
        };
        let fires = instruction
            .controls
            .iter()
            .all(|c| c.is_active(self.get(c.cell)));
        if !fires {
            return;
        }
        match gate.kind {
            StandardGate::X => {
                let t = instruction.targets[0];
                self.set(t, !self.get(t));
            }
            StandardGate::Swap => {
                let (a, b) = (instruction.targets[0], instruction.targets[1]);
                let (va, vb) = (self.get(a), self.get(b));
                self.set(a, vb);
                self.set(b, va);
            }
        }
    }

    /// Apply a sequence of instructions in order.
    pub fn run<'a>(&mut self, instructions: impl IntoIterator<Item = &'a Instruction>) {
        for instruction in instructions {
            self.apply(instruction);
        }
    }

    /// Evaluate a whole circuit from the all-zero state.
    pub fn evaluate(circuit: &Circuit) -> Self {
        let mut state = Self::for_circuit(circuit);
        state.run(circuit.instructions());
        state
    }
}
