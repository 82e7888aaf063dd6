//! Error types for the circuit builder.

use qfsm_gates::GateError;
use qfsm_hal::HalError;
use qfsm_ir::IrError;
use thiserror::Error;

use crate::fsm::State;

/// Abstract error categories of the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed problem input.
    InvalidInput,
    /// A register or ancilla window does not match a gate's requirement.
    Allocation,
    /// A gate parameter outside what the library supports.
    UnsupportedParameter,
    /// An accessor was used in the wrong lifecycle state.
    State,
    /// The execution backend failed.
    Execution,
}

/// Errors raised by the substring-matching circuit builder.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FsmError {
    /// Malformed problem input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Ancilla or register sizing error.
    #[error("Allocation error: {0}")]
    Allocation(String),

    /// Unsupported gate parameter.
    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(String),

    /// Lifecycle violation.
    #[error("Cannot {operation} while the circuit is {state}")]
    State {
        /// The rejected operation.
        operation: &'static str,
        /// The state the circuit was in.
        state: State,
    },

    /// Accessor that only applies to another mode.
    #[error("{operation} is only available in {expected} mode")]
    WrongMode {
        /// The rejected operation.
        operation: &'static str,
        /// The mode the accessor belongs to.
        expected: &'static str,
    },

    /// Gate expansion failed.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Circuit-level error.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Execution backend error.
    #[error("Execution failed: {0}")]
    Backend(#[from] HalError),
}

impl FsmError {
    /// The abstract category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FsmError::InvalidInput(_) => ErrorKind::InvalidInput,
            FsmError::Allocation(_) | FsmError::Ir(_) => ErrorKind::Allocation,
            FsmError::UnsupportedParameter(_) => ErrorKind::UnsupportedParameter,
            FsmError::State { .. } | FsmError::WrongMode { .. } => ErrorKind::State,
            FsmError::Gate(err) => match err {
                GateError::UnsupportedRotation(_) | GateError::UnsupportedOrder(_) => {
                    ErrorKind::UnsupportedParameter
                }
                GateError::FanoutSource(_) | GateError::ControlOverlap { .. } => {
                    ErrorKind::InvalidInput
                }
                _ => ErrorKind::Allocation,
            },
            FsmError::Backend(_) => ErrorKind::Execution,
        }
    }
}

/// Result type for builder operations.
pub type FsmResult<T> = Result<T, FsmError>;
