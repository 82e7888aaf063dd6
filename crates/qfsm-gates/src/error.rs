//! Error types for the gate library.

use qfsm_ir::{CellId, IrError};
use thiserror::Error;

/// Errors raised while expanding a gate application.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GateError {
    /// An operand register has the wrong width.
    #[error("{gate}: operand '{operand}' must have {expected} cells, got {got}")]
    WidthMismatch {
        /// Gate label.
        gate: &'static str,
        /// Operand role.
        operand: &'static str,
        /// Required width.
        expected: usize,
        /// Actual width.
        got: usize,
    },

    /// The ancilla register does not match the gate's declared requirement.
    #[error("{gate}: ancilla register must have {expected} cells, got {got}")]
    AncillaSize {
        /// Gate label.
        gate: &'static str,
        /// Required ancilla width.
        expected: usize,
        /// Actual ancilla width.
        got: usize,
    },

    /// Rotation amount is not a power of two.
    #[error("Rotation by {0} positions is not supported (must be a power of two)")]
    UnsupportedRotation(usize),

    /// Extension order must be at least 1.
    #[error("Extension order {0} is not supported (must be >= 1)")]
    UnsupportedOrder(u32),

    /// Fanout source must be exactly one cell.
    #[error("Fanout source must be exactly one cell, got {0}")]
    FanoutSource(usize),

    /// A control cell is also an operand of the controlled gate.
    #[error("{gate}: control cell {cell} is also an operand")]
    ControlOverlap {
        /// Gate label.
        gate: &'static str,
        /// The offending cell.
        cell: CellId,
    },

    /// Circuit-level error while appending the fragment.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;
