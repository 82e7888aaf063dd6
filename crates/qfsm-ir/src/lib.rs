//! QFSM Circuit Intermediate Representation
//!
//! This crate provides the data structures the substring-matching circuits are
//! built from: boolean cells, named registers, primitive reversible gates and
//! the append-only [`Circuit`] log.
//!
//! # Core Components
//!
//! - **Cells**: [`CellId`] addresses a single boolean cell; [`Control`] pairs a
//!   cell with a [`Polarity`]
//! - **Registers**: [`Register`] is a named run of cells, either owning or a
//!   non-owning view of a parent
//! - **Gates**: [`StandardGate`] holds the two primitives, X and SWAP, which
//!   take any number of controls
//! - **Instructions**: [`Instruction`] combining a gate with its operands
//! - **Circuit**: [`Circuit`] with operand validation and depth analysis
//!
//! # Example
//!
//! ```rust
//! use qfsm_ir::{Circuit, Control};
//!
//! let mut circuit = Circuit::new("and");
//! let q = circuit.add_register("q", 3).unwrap();
//!
//! circuit.x(q.cell(0).unwrap()).unwrap();
//! circuit
//!     .mcx(
//!         [Control::positive(q.cell(0).unwrap()), Control::negative(q.cell(1).unwrap())],
//!         q.cell(2).unwrap(),
//!     )
//!     .unwrap();
//!
//! assert_eq!(circuit.depth(), 2);
//! assert_eq!(circuit.gate_counts()["ccx"], 1);
//! ```

pub mod cell;
pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod register;

pub use cell::{Cell, CellId, Control, Polarity};
pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use register::Register;
