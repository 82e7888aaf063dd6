//! Error types for the IR crate.

use crate::cell::CellId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Cell not found in circuit.
    #[error("Cell {cell} not found in circuit{}", format_gate_context(.gate_name))]
    CellNotFound {
        /// The cell that was not found.
        cell: CellId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Duplicate cell in operation.
    #[error("Duplicate cell {cell} in operation{}", format_gate_context(.gate_name))]
    DuplicateCell {
        /// The duplicate cell.
        cell: CellId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires a different number of target cells.
    #[error("Gate '{gate_name}' requires {expected} targets, got {got}")]
    TargetCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of targets.
        expected: usize,
        /// Actual number of targets provided.
        got: usize,
    },

    /// A register view does not fit inside its parent.
    #[error("View '{name}' [{offset}, {offset}+{len}) exceeds parent '{parent}' of width {width}")]
    ViewOutOfBounds {
        /// Name requested for the view.
        name: String,
        /// Name of the parent register.
        parent: String,
        /// Offset of the view inside the parent.
        offset: usize,
        /// Requested view length.
        len: usize,
        /// Width of the parent register.
        width: usize,
    },

    /// Cell index outside a register.
    #[error("Index {index} out of bounds for register '{register}' of width {width}")]
    IndexOutOfBounds {
        /// Register name.
        register: String,
        /// Requested index.
        index: usize,
        /// Register width.
        width: usize,
    },

    /// A register with this name already exists.
    #[error("Register '{0}' already allocated")]
    DuplicateRegister(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
