//! Backend capabilities.

use serde::{Deserialize, Serialize};

/// Capabilities of an execution backend.
///
/// Backends cache their capabilities at construction time. Orchestrators use
/// them to reject circuits before submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of boolean cells available.
    pub num_cells: u32,
    /// Supported primitives.
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Maximum number of instructions per circuit, if limited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_instructions: Option<u32>,
    /// Whether the backend is a simulator.
    pub is_simulator: bool,
    /// Additional capability flags, e.g. `"deterministic"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Capabilities of a classical reversible-circuit simulator.
    pub fn simulator(num_cells: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_cells,
            gate_set: GateSet::reversible(),
            max_shots: 100_000,
            max_instructions: None,
            is_simulator: true,
            features: vec!["deterministic".into()],
        }
    }

    /// Set the instruction limit.
    #[must_use]
    pub fn with_max_instructions(mut self, limit: u32) -> Self {
        self.max_instructions = Some(limit);
        self
    }
}

/// Primitive gate names a backend accepts.
///
/// Names follow the instruction naming of `qfsm-ir`, which encodes the number
/// of controls: `x`, `cx`, `ccx`, `mcx`, `swap`, `cswap`, `mcswap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSet {
    /// Supported gate names.
    pub gates: Vec<String>,
}

impl GateSet {
    /// Every primitive `qfsm-ir` can emit.
    pub fn reversible() -> Self {
        Self {
            gates: ["x", "cx", "ccx", "mcx", "swap", "cswap", "mcswap"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Check whether a gate name is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.gates.iter().any(|g| g == gate)
    }
}
