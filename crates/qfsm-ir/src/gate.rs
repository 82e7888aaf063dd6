//! Primitive reversible gates.

use serde::{Deserialize, Serialize};

/// Primitive gates with known boolean semantics.
///
/// Controls are carried by the [`Instruction`](crate::Instruction), so a
/// Toffoli is an `X` with two controls and a Fredkin is a `Swap` with one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    /// NOT gate: flips its target.
    X,
    /// Exchanges the values of its two targets.
    Swap,
}

impl StandardGate {
    /// Get the name of this gate with `num_controls` controls attached.
    #[inline]
    pub fn name(&self, num_controls: usize) -> &'static str {
        match (self, num_controls) {
            (StandardGate::X, 0) => "x",
            (StandardGate::X, 1) => "cx",
            (StandardGate::X, 2) => "ccx",
            (StandardGate::X, _) => "mcx",
            (StandardGate::Swap, 0) => "swap",
            (StandardGate::Swap, 1) => "cswap",
            (StandardGate::Swap, _) => "mcswap",
        }
    }

    /// Get the number of target cells this gate operates on.
    #[inline]
    pub fn num_targets(&self) -> usize {
        match self {
            StandardGate::X => 1,
            StandardGate::Swap => 2,
        }
    }

    /// Every primitive is its own inverse.
    #[inline]
    pub fn is_self_inverse(&self) -> bool {
        true
    }
}

/// A primitive gate with an optional label.
///
/// The label records which library gate emitted the primitive
/// (for example `"CAND1"`), which keeps the flat log readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: StandardGate,
    /// Optional label for the gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new unlabeled gate.
    pub fn standard(kind: StandardGate) -> Self {
        Self { kind, label: None }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl From<StandardGate> for Gate {
    fn from(kind: StandardGate) -> Self {
        Gate::standard(kind)
    }
}
