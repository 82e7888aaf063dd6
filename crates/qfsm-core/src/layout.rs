//! Register layout of a substring-matching circuit.

use std::fmt;

use qfsm_ir::{Circuit, Register};
use tracing::debug;

use crate::ancilla::AncillaAllocator;
use crate::error::FsmResult;
use crate::problem::Problem;

/// Closed set of registers a matching circuit owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    /// First input string.
    X,
    /// Second input string.
    Y,
    /// Binary representation of `d`.
    D,
    /// Link `i` of the λ-chain.
    Lambda(usize),
    /// Initial pointer vector `D₋₁`.
    DInit,
    /// Pointer vector after stage `i`.
    DChain(usize),
    /// Shared ancilla pool.
    Ancilla,
    /// The "found" cell.
    Out,
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::X => write!(f, "X"),
            Handle::Y => write!(f, "Y"),
            Handle::D => write!(f, "d"),
            Handle::Lambda(i) => write!(f, "L{i}"),
            Handle::DInit => write!(f, "D-1"),
            Handle::DChain(i) => write!(f, "D{i}"),
            Handle::Ancilla => write!(f, "anc"),
            Handle::Out => write!(f, "out"),
        }
    }
}

/// Every register of a matching circuit, resolved by [`Handle`].
///
/// Widths: X, Y and every λ link have `n` cells, `d` has `m` cells, `D₋₁` and
/// every `Dᵢ` have `n + 1` cells, the ancilla pool has `3·⌊n/2⌋·m` cells and
/// `out` has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    x: Register,
    y: Register,
    d: Register,
    lambda: Vec<Register>,
    d_init: Register,
    d_chain: Vec<Register>,
    ancilla: Register,
    out: Register,
}

impl Registry {
    /// Allocate every register of `problem` on `circuit`.
    pub fn allocate(circuit: &mut Circuit, problem: &Problem) -> FsmResult<Self> {
        let n = problem.n();
        let m = problem.d_len();
        let k = problem.log_n();

        let d = circuit.add_register(Handle::D.to_string(), m)?;
        let x = circuit.add_register(Handle::X.to_string(), n)?;
        let y = circuit.add_register(Handle::Y.to_string(), n)?;
        let lambda = (0..=k)
            .map(|i| circuit.add_register(Handle::Lambda(i).to_string(), n))
            .collect::<Result<Vec<_>, _>>()?;
        let d_init = circuit.add_register(Handle::DInit.to_string(), n + 1)?;
        let d_chain = (0..m)
            .map(|i| circuit.add_register(Handle::DChain(i).to_string(), n + 1))
            .collect::<Result<Vec<_>, _>>()?;
        let ancilla = circuit.add_register(
            Handle::Ancilla.to_string(),
            AncillaAllocator::pool_width(n, m),
        )?;
        let out = circuit.add_register(Handle::Out.to_string(), 1)?;

        debug!(
            n,
            m,
            lambda = lambda.len(),
            cells = circuit.num_cells(),
            "allocated registers"
        );

        Ok(Self {
            x,
            y,
            d,
            lambda,
            d_init,
            d_chain,
            ancilla,
            out,
        })
    }

    /// Resolve a handle, if the register exists.
    pub fn get(&self, handle: Handle) -> Option<&Register> {
        match handle {
            Handle::X => Some(&self.x),
            Handle::Y => Some(&self.y),
            Handle::D => Some(&self.d),
            Handle::Lambda(i) => self.lambda.get(i),
            Handle::DInit => Some(&self.d_init),
            Handle::DChain(i) => self.d_chain.get(i),
            Handle::Ancilla => Some(&self.ancilla),
            Handle::Out => Some(&self.out),
        }
    }

    /// First input string.
    pub fn x(&self) -> &Register {
        &self.x
    }

    /// Second input string.
    pub fn y(&self) -> &Register {
        &self.y
    }

    /// Bits of `d`.
    pub fn d(&self) -> &Register {
        &self.d
    }

    /// The λ-chain, `λ₀ … λ_k`.
    pub fn lambda(&self) -> &[Register] {
        &self.lambda
    }

    /// `D₋₁`.
    pub fn d_init(&self) -> &Register {
        &self.d_init
    }

    /// `D₀ … D_{m-1}`.
    pub fn d_chain(&self) -> &[Register] {
        &self.d_chain
    }

    /// Pointer vector feeding stage `i`: `D₋₁` for stage 0, else `D_{i-1}`.
    pub fn stage_input(&self, stage: usize) -> Option<&Register> {
        match stage {
            0 => Some(&self.d_init),
            i => self.d_chain.get(i - 1),
        }
    }

    /// The ancilla pool.
    pub fn ancilla(&self) -> &Register {
        &self.ancilla
    }

    /// The found cell's register.
    pub fn out(&self) -> &Register {
        &self.out
    }

    /// The final pointer vector, measured to locate matches.
    pub fn begins(&self) -> &Register {
        self.d_chain.last().unwrap_or(&self.d_init)
    }

    /// All registers in allocation order, with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Register)> {
        let lambda = self
            .lambda
            .iter()
            .enumerate()
            .map(|(i, r)| (Handle::Lambda(i), r));
        let chain = self
            .d_chain
            .iter()
            .enumerate()
            .map(|(i, r)| (Handle::DChain(i), r));
        [(Handle::D, &self.d), (Handle::X, &self.x), (Handle::Y, &self.y)]
            .into_iter()
            .chain(lambda)
            .chain(std::iter::once((Handle::DInit, &self.d_init)))
            .chain(chain)
            .chain([(Handle::Ancilla, &self.ancilla), (Handle::Out, &self.out)])
    }
}
