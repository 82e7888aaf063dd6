//! Append-only reversible circuit log.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellId, Control};
use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::register::Register;

/// A reversible boolean circuit.
///
/// Cells are allocated register by register and never freed. Instructions are
/// appended in order and only removed all at once by [`Circuit::clear`], which
/// keeps the registers. Every appended instruction is validated against the
/// allocated cells, so the log is always well formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Every allocated cell, indexed by [`CellId`].
    cells: Vec<Cell>,
    /// Owning registers in allocation order.
    registers: Vec<Register>,
    /// The instruction log.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: vec![],
            registers: vec![],
            instructions: vec![],
        }
    }

    /// Allocate a register of `width` fresh cells, all starting at 0.
    pub fn add_register(&mut self, name: impl Into<String>, width: usize) -> IrResult<Register> {
        let name = name.into();
        if self.registers.iter().any(|r| r.name() == name) {
            return Err(IrError::DuplicateRegister(name));
        }

        let start = self.cells.len() as u32;
        for i in 0..width as u32 {
            self.cells.push(Cell::new(CellId(start + i), &name, i));
        }
        let register = Register::owning(name, start, width as u32);
        self.registers.push(register.clone());
        Ok(register)
    }

    /// Look up an owning register by name.
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name() == name)
    }

    /// Append an instruction after validating its operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    /// Append every instruction of a fragment, in order.
    ///
    /// Validation happens before anything is appended, so a failing fragment
    /// leaves the log untouched.
    pub fn append(&mut self, fragment: impl IntoIterator<Item = Instruction>) -> IrResult<usize> {
        let fragment: Vec<_> = fragment.into_iter().collect();
        for instruction in &fragment {
            self.validate(instruction)?;
        }
        let count = fragment.len();
        self.instructions.extend(fragment);
        Ok(count)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = instruction.is_gate().then(|| instruction.name().to_string());

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.kind.num_targets();
            let got = instruction.targets.len();
            if expected != got {
                return Err(IrError::TargetCountMismatch {
                    gate_name: instruction.name().to_string(),
                    expected,
                    got,
                });
            }
        }

        let mut seen = FxHashSet::default();
        for cell in instruction.cells() {
            if cell.index() >= self.cells.len() {
                return Err(IrError::CellNotFound {
                    cell,
                    gate_name: gate_name.clone(),
                });
            }
            if !seen.insert(cell) {
                return Err(IrError::DuplicateCell {
                    cell,
                    gate_name: gate_name.clone(),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Primitive gates
    // =========================================================================

    /// Apply NOT.
    pub fn x(&mut self, target: CellId) -> IrResult<&mut Self> {
        self.apply(Instruction::x(target))
    }

    /// Apply controlled NOT.
    pub fn cx(&mut self, control: CellId, target: CellId) -> IrResult<&mut Self> {
        self.apply(Instruction::cx(control, target))
    }

    /// Apply Toffoli.
    pub fn ccx(&mut self, c1: CellId, c2: CellId, target: CellId) -> IrResult<&mut Self> {
        self.apply(Instruction::ccx(c1, c2, target))
    }

    /// Apply multi-controlled NOT.
    pub fn mcx(
        &mut self,
        controls: impl IntoIterator<Item = Control>,
        target: CellId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::mcx(controls, target))
    }

    /// Apply SWAP.
    pub fn swap(&mut self, a: CellId, b: CellId) -> IrResult<&mut Self> {
        self.apply(Instruction::swap(a, b))
    }

    /// Apply Fredkin.
    pub fn cswap(&mut self, control: CellId, a: CellId, b: CellId) -> IrResult<&mut Self> {
        self.apply(Instruction::cswap(control, a, b))
    }

    /// Apply a barrier across the given cells.
    pub fn barrier(&mut self, cells: impl IntoIterator<Item = CellId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(cells))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of allocated cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Get the allocated cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get a cell by id.
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index())
    }

    /// Get the owning registers in allocation order.
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Get the instruction log.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions, barriers included.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of gate instructions.
    pub fn num_gates(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Remove every instruction, keeping registers and cells.
    pub fn clear(&mut self) {
        self.instructions.clear();
    }

    /// Get the circuit depth.
    ///
    /// Each gate sits one layer above the deepest gate sharing a cell with it.
    /// Barriers align their cells without adding a layer.
    pub fn depth(&self) -> usize {
        let mut frontier = vec![0usize; self.cells.len()];
        let mut max_depth = 0usize;

        for instruction in &self.instructions {
            let below = instruction
                .cells()
                .map(|c| frontier[c.index()])
                .max()
                .unwrap_or(0);
            let level = if instruction.is_gate() { below + 1 } else { below };
            for cell in instruction.cells() {
                frontier[cell.index()] = level;
            }
            max_depth = max_depth.max(level);
        }

        max_depth
    }

    /// Count gate instructions by name (`x`, `cx`, `ccx`, `mcx`, `swap`, ...).
    pub fn gate_counts(&self) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for instruction in self.instructions.iter().filter(|i| i.is_gate()) {
            *counts.entry(instruction.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Serialize the circuit to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a circuit from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
