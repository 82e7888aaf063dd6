//! Reversible circuit builder for fixed-length common substrings.
//!
//! Given two bit strings `x` and `y` of power-of-two length `n` and a length
//! `2 <= d <= n`, the builder emits a reversible circuit whose `out` cell is 1
//! iff `x` and `y` agree on some window of length `d` admitted by the mode.
//!
//! # Construction
//!
//! ```text
//! SetBits(X, Y, d, D₋₁) ─► Reverse(d) ─► Match(X, Y) = λ₀ ─► Extend ─► λ₁ … λ_k
//!                                                                     │
//!     for each bit i of d:                                            ▼
//!       d[i] = 1 : Dᵢ = Rotate(λᵢ ∧ Dᵢ₋₁, 2^i)      (anc window i)
//!       d[i] = 0 : Dᵢ = Dᵢ₋₁
//!                                                                     │
//! UnaryOr(D_{m-1}) ─► out ◄───────────────────────────────────────────┘
//! ```
//!
//! `λᵢ[j]` is 1 iff the windows of length `2^i` at `j` agree. Cell `p` of a
//! pointer vector `Dᵢ` marks "every chunk so far matched and the next starts
//! at `p`", so the final vector holds `start + d` for each match.
//!
//! # Example
//!
//! ```rust
//! use qfsm_core::{Fsm, Mode, Problem, classical};
//!
//! let problem = Problem::new("1100", "1110", 2, Mode::FreeSearch).unwrap();
//! let mut fsm = Fsm::new(problem).unwrap();
//! fsm.build().unwrap();
//!
//! assert_eq!(fsm.measured_cells().unwrap().len(), 1 + 5);
//! assert!(classical::expected_found(fsm.problem()));
//! ```
//!
//! Executing needs a [`qfsm_hal::Backend`]; see [`Fsm::execute`].

pub mod ancilla;
pub mod classical;
pub mod error;
pub mod fsm;
pub mod layout;
pub mod outcome;
pub mod problem;
pub mod stats;

pub use ancilla::{AncillaAllocator, StageWindow};
pub use error::{ErrorKind, FsmError, FsmResult};
pub use fsm::{Fsm, State};
pub use layout::{Handle, Registry};
pub use outcome::Outcome;
pub use problem::{Mode, Problem, ProblemBuilder, format_bits, parse_bitstring};
pub use stats::CircuitStats;
