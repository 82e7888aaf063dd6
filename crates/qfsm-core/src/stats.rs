//! Circuit size figures.

use std::collections::BTreeMap;
use std::fmt;

use qfsm_ir::Circuit;
use serde::{Deserialize, Serialize};

/// Size and depth of a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitStats {
    /// Circuit name.
    pub name: String,
    /// Allocated cells.
    pub cells: usize,
    /// Allocated registers.
    pub registers: usize,
    /// Gate instructions.
    pub gates: usize,
    /// Layered depth.
    pub depth: usize,
    /// Gate instructions per primitive name.
    pub gate_counts: BTreeMap<String, usize>,
}

impl CircuitStats {
    /// Measure `circuit`.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self {
            name: circuit.name().to_string(),
            cells: circuit.num_cells(),
            registers: circuit.registers().len(),
            gates: circuit.num_gates(),
            depth: circuit.depth(),
            gate_counts: circuit
                .gate_counts()
                .into_iter()
                .map(|(name, count)| (name.to_string(), count))
                .collect(),
        }
    }
}

impl fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit:   {}", self.name)?;
        writeln!(f, "Cells:     {}", self.cells)?;
        writeln!(f, "Registers: {}", self.registers)?;
        writeln!(f, "Gates:     {}", self.gates)?;
        write!(f, "Depth:     {}", self.depth)?;
        for (name, count) in &self.gate_counts {
            write!(f, "\n  {name:<8} {count}")?;
        }
        Ok(())
    }
}
