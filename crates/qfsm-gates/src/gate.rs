//! The library of reversible gates.

use qfsm_ir::{CellId, Control, Register};

use crate::error::{GateError, GateResult};

/// A library gate together with its operand registers and parameters.
///
/// Every variant is a pure reversible boolean operation. Results are written
/// by XOR into their target, so a target that starts at 0 ends up holding the
/// documented value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Set the cells of `target` whose bit is 1 (X on a zero register).
    SetBits {
        /// Register to initialize.
        target: Register,
        /// One bit per cell of `target`.
        bits: Vec<bool>,
    },

    /// Swap cell `i` with cell `len - 1 - i` for `i < len / 2`.
    Reverse {
        /// Register reversed in place.
        target: Register,
    },

    /// `result[i] ^= (x[i] == y[i])`.
    Match {
        /// First operand.
        x: Register,
        /// Second operand, same width as `x`.
        y: Register,
        /// Target, same width as `x`.
        result: Register,
    },

    /// `result[j] ^= lambda[j] & lambda[j + 2^(order-1)]` where the second
    /// index is in range; other result cells are left untouched.
    ///
    /// For order 1 even positions are visited before odd ones, so the fragment
    /// has depth 2.
    Extend {
        /// Previous link of the chain.
        lambda: Register,
        /// Target, same width as `lambda`.
        result: Register,
        /// Extension order, at least 1.
        order: u32,
    },

    /// Broadcast one cell into every cell of `target` with a doubling tree.
    Fanout {
        /// Exactly one cell.
        source: Register,
        /// Broadcast target.
        target: Register,
    },

    /// Lane-wise conjunction `result[t] ^= x[t] & y[t]` for `t < |x|`.
    ///
    /// `y` and `result` carry one extra trailing cell that no lane touches.
    /// Lane `t` writes `result[t]`, not `result[t + 1]`; the one-cell shift
    /// of a matched pointer is left to the `Rotate` that follows.
    /// When the application is controlled, the controls are broadcast over
    /// `anc` so that every lane runs in parallel.
    BitwiseCand {
        /// Left operand.
        x: Register,
        /// Right operand, one cell wider than `x`.
        y: Register,
        /// Broadcast ancilla, as wide as `x`.
        anc: Register,
        /// Target, as wide as `y`.
        result: Register,
    },

    /// `result ^= source`. Controlled negatively it copies only when the
    /// control holds 0.
    ConditionalCopy {
        /// Copied register.
        source: Register,
        /// Target, same width as `source`.
        result: Register,
    },

    /// Cyclic rotation of `target` by `amount` positions toward higher
    /// indices: cell `(j + amount) % len` receives the old cell `j`.
    ///
    /// Built as two swap layers (reverse everything, then reverse both
    /// halves), so each layer has at most `len / 2` swaps.
    Rotate {
        /// Register rotated in place.
        target: Register,
        /// Broadcast ancilla of `len / 2` cells.
        anc: Register,
        /// Rotation amount, a power of two.
        amount: usize,
    },

    /// `result ^= OR(source)`.
    UnaryOr {
        /// Register reduced.
        source: Register,
        /// One-cell target.
        result: Register,
    },
}

impl Gate {
    /// Short label used to tag every primitive the gate expands into.
    pub fn label(&self) -> String {
        match self {
            Gate::SetBits { .. } => "SET".into(),
            Gate::Reverse { .. } => "REV".into(),
            Gate::Match { .. } => "M".into(),
            Gate::Extend { order, .. } => format!("EXT{order}"),
            Gate::Fanout { .. } => "FAN".into(),
            Gate::BitwiseCand { .. } => "CAND".into(),
            Gate::ConditionalCopy { .. } => "CRC".into(),
            Gate::Rotate { amount, .. } => format!("ROT{amount}"),
            Gate::UnaryOr { .. } => "OR".into(),
        }
    }

    /// Static name of the gate kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Gate::SetBits { .. } => "SetBits",
            Gate::Reverse { .. } => "Reverse",
            Gate::Match { .. } => "Match",
            Gate::Extend { .. } => "Extend",
            Gate::Fanout { .. } => "Fanout",
            Gate::BitwiseCand { .. } => "BitwiseCand",
            Gate::ConditionalCopy { .. } => "ConditionalCopy",
            Gate::Rotate { .. } => "Rotate",
            Gate::UnaryOr { .. } => "UnaryOr",
        }
    }

    /// Ancilla cells a `BitwiseCand` over operands of width `n` requires.
    pub const fn cand_ancilla(n: usize) -> usize {
        n
    }

    /// Ancilla cells a `Rotate` of a register of width `len` requires.
    pub const fn rotate_ancilla(len: usize) -> usize {
        len / 2
    }

    /// The ancilla operand, if this gate owns one.
    pub fn ancilla(&self) -> Option<&Register> {
        match self {
            Gate::BitwiseCand { anc, .. } | Gate::Rotate { anc, .. } => Some(anc),
            _ => None,
        }
    }

    /// Every cell the gate reads or writes, ancilla included.
    pub fn operand_cells(&self) -> Vec<CellId> {
        let registers: Vec<&Register> = match self {
            Gate::SetBits { target, .. } | Gate::Reverse { target } => vec![target],
            Gate::Match { x, y, result } => vec![x, y, result],
            Gate::Extend { lambda, result, .. } => vec![lambda, result],
            Gate::Fanout { source, target } => vec![source, target],
            Gate::BitwiseCand { x, y, anc, result } => vec![x, y, anc, result],
            Gate::ConditionalCopy { source, result } => vec![source, result],
            Gate::Rotate { target, anc, .. } => vec![target, anc],
            Gate::UnaryOr { source, result } => vec![source, result],
        };
        registers.into_iter().flat_map(Register::iter).collect()
    }

    /// Check operand widths and parameters.
    pub fn validate(&self) -> GateResult<()> {
        let gate = self.kind_name();
        match self {
            Gate::SetBits { target, bits } => expect_width(gate, "bits", target.len(), bits.len()),
            Gate::Reverse { .. } => Ok(()),
            Gate::Match { x, y, result } => {
                expect_width(gate, "y", x.len(), y.len())?;
                expect_width(gate, "result", x.len(), result.len())
            }
            Gate::Extend {
                lambda,
                result,
                order,
            } => {
                if *order == 0 {
                    return Err(GateError::UnsupportedOrder(*order));
                }
                expect_width(gate, "result", lambda.len(), result.len())
            }
            Gate::Fanout { source, .. } => {
                if source.len() != 1 {
                    return Err(GateError::FanoutSource(source.len()));
                }
                Ok(())
            }
            Gate::BitwiseCand { x, y, anc, result } => {
                if anc.len() != Gate::cand_ancilla(x.len()) {
                    return Err(GateError::AncillaSize {
                        gate,
                        expected: Gate::cand_ancilla(x.len()),
                        got: anc.len(),
                    });
                }
                if anc.len() + 1 != y.len() {
                    return Err(GateError::AncillaSize {
                        gate,
                        expected: y.len().saturating_sub(1),
                        got: anc.len(),
                    });
                }
                expect_width(gate, "result", y.len(), result.len())
            }
            Gate::ConditionalCopy { source, result } => {
                expect_width(gate, "result", source.len(), result.len())
            }
            Gate::Rotate {
                target,
                anc,
                amount,
            } => {
                if !amount.is_power_of_two() {
                    return Err(GateError::UnsupportedRotation(*amount));
                }
                if anc.len() != Gate::rotate_ancilla(target.len()) {
                    return Err(GateError::AncillaSize {
                        gate,
                        expected: Gate::rotate_ancilla(target.len()),
                        got: anc.len(),
                    });
                }
                Ok(())
            }
            Gate::UnaryOr { result, .. } => expect_width(gate, "result", 1, result.len()),
        }
    }
}

fn expect_width(
    gate: &'static str,
    operand: &'static str,
    expected: usize,
    got: usize,
) -> GateResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(GateError::WidthMismatch {
            gate,
            operand,
            expected,
            got,
        })
    }
}

/// A gate applied under an optional list of control cells.
///
/// The gate takes effect only when every control holds its polarity's active
/// value; otherwise the application is the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    /// The library gate.
    pub gate: Gate,
    /// Controls attached at application time.
    pub controls: Vec<Control>,
}

impl Application {
    /// An uncontrolled application.
    pub fn new(gate: Gate) -> Self {
        Self {
            gate,
            controls: vec![],
        }
    }

    /// Add one control.
    #[must_use]
    pub fn controlled_by(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    /// Add several controls.
    #[must_use]
    pub fn with_controls(mut self, controls: impl IntoIterator<Item = Control>) -> Self {
        self.controls.extend(controls);
        self
    }

    /// Check the gate and make sure no control is also an operand.
    pub fn validate(&self) -> GateResult<()> {
        self.gate.validate()?;
        if self.controls.is_empty() {
            return Ok(());
        }
        let operands = self.gate.operand_cells();
        for control in &self.controls {
            if operands.contains(&control.cell) {
                return Err(GateError::ControlOverlap {
                    gate: self.gate.kind_name(),
                    cell: control.cell,
                });
            }
        }
        Ok(())
    }
}

impl From<Gate> for Application {
    fn from(gate: Gate) -> Self {
        Application::new(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qfsm_ir::Circuit;

    fn regs(widths: &[usize]) -> Vec<Register> {
        let mut circuit = Circuit::new("t");
        widths
            .iter()
            .enumerate()
            .map(|(i, &w)| circuit.add_register(format!("r{i}"), w).unwrap())
            .collect()
    }

    #[test]
    fn test_cand_ancilla_checks() {
        let r = regs(&[4, 5, 3, 5]);
        let gate = Gate::BitwiseCand {
            x: r[0].clone(),
            y: r[1].clone(),
            anc: r[2].clone(),
            result: r[3].clone(),
        };
        assert!(matches!(
            gate.validate(),
            Err(GateError::AncillaSize {
                expected: 4,
                got: 3,
                ..
            })
        ));

        let r = regs(&[4, 4, 4, 4]);
        let gate = Gate::BitwiseCand {
            x: r[0].clone(),
            y: r[1].clone(),
            anc: r[2].clone(),
            result: r[3].clone(),
        };
        assert!(matches!(gate.validate(), Err(GateError::AncillaSize { .. })));
    }

    #[test]
    fn test_rotate_parameter_checks() {
        let r = regs(&[5, 2]);
        let bad_amount = Gate::Rotate {
            target: r[0].clone(),
            anc: r[1].clone(),
            amount: 3,
        };
        assert!(matches!(
            bad_amount.validate(),
            Err(GateError::UnsupportedRotation(3))
        ));

        let r = regs(&[5, 3]);
        let bad_anc = Gate::Rotate {
            target: r[0].clone(),
            anc: r[1].clone(),
            amount: 2,
        };
        assert!(matches!(
            bad_anc.validate(),
            Err(GateError::AncillaSize {
                expected: 2,
                got: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_fanout_source_width() {
        let r = regs(&[2, 4]);
        let gate = Gate::Fanout {
            source: r[0].clone(),
            target: r[1].clone(),
        };
        assert!(matches!(gate.validate(), Err(GateError::FanoutSource(2))));
    }

    #[test]
    fn test_control_overlap() {
        let r = regs(&[4]);
        let app = Application::new(Gate::Reverse {
            target: r[0].clone(),
        })
        .controlled_by(Control::positive(r[0].cell(1).unwrap()));
        assert!(matches!(
            app.validate(),
            Err(GateError::ControlOverlap { .. })
        ));
    }

    #[test]
    fn test_labels() {
        let r = regs(&[4, 4]);
        let ext = Gate::Extend {
            lambda: r[0].clone(),
            result: r[1].clone(),
            order: 2,
        };
        assert_eq!(ext.label(), "EXT2");
        assert!(ext.ancilla().is_none());
    }
}
