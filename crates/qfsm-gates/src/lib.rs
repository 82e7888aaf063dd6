//! Reversible gate library for fixed substring matching.
//!
//! Each [`Gate`] variant is a pure boolean operation over [`qfsm_ir::Register`]
//! operands with a declared ancilla requirement. An [`Application`] attaches
//! control cells with polarity, and the single [`apply`] routine expands it into
//! primitive X/SWAP instructions on a [`qfsm_ir::Circuit`].
//!
//! | Gate | Effect |
//! |------|--------|
//! | `SetBits` | load a classical value into a zero register |
//! | `Reverse` | reverse a register in place |
//! | `Match` | `result[i] ^= x[i] == y[i]` |
//! | `Extend` | `result[j] ^= λ[j] & λ[j + 2^(i-1)]` |
//! | `Fanout` | broadcast one cell with a doubling tree |
//! | `BitwiseCand` | lane-wise AND with ancilla-broadcast controls |
//! | `ConditionalCopy` | `result ^= source` |
//! | `Rotate` | cyclic rotation by a power of two in two swap layers |
//! | `UnaryOr` | `r ^= OR(x)` |
//!
//! # Example
//!
//! ```rust
//! use qfsm_gates::{apply, Application, Gate};
//! use qfsm_ir::Circuit;
//!
//! let mut circuit = Circuit::new("match");
//! let x = circuit.add_register("X", 4).unwrap();
//! let y = circuit.add_register("Y", 4).unwrap();
//! let result = circuit.add_register("L0", 4).unwrap();
//!
//! apply(&mut circuit, &Application::new(Gate::Match { x, y, result })).unwrap();
//! assert_eq!(circuit.depth(), 2);
//! ```

pub mod apply;
pub mod error;
pub mod gate;
pub mod inverse;

pub use apply::{apply, expand};
pub use error::{GateError, GateResult};
pub use gate::{Application, Gate};
pub use inverse::{expand_inverse, inverse};
