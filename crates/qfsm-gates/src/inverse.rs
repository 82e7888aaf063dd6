//! Fragment inversion.

use qfsm_ir::Instruction;

use crate::apply::expand;
use crate::error::GateResult;
use crate::gate::Application;

/// Compute the inverse of a primitive fragment.
///
/// X and SWAP are self-inverse under any set of controls, so the inverse is
/// the same instructions in reverse order. Barriers are kept as markers.
pub fn inverse(fragment: &[Instruction]) -> Vec<Instruction> {
    debug_assert!(
        fragment
            .iter()
            .filter_map(Instruction::as_gate)
            .all(|g| g.kind.is_self_inverse())
    );
    fragment.iter().rev().cloned().collect()
}

/// Expand the inverse of an application.
pub fn expand_inverse(application: &Application) -> GateResult<Vec<Instruction>> {
    Ok(inverse(&expand(application)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qfsm_ir::{CellId, Control};

    #[test]
    fn test_inverse_reverses_order() {
        let fragment = vec![
            Instruction::x(CellId(0)),
            Instruction::cx(CellId(0), CellId(1)),
            Instruction::mcx([Control::negative(CellId(1))], CellId(2)),
        ];
        let inv = inverse(&fragment);
        assert_eq!(inv.len(), 3);
        assert_eq!(inv[0], fragment[2]);
        assert_eq!(inv[2], fragment[0]);
    }

    #[test]
    fn test_double_inverse_is_identity() {
        let fragment = vec![
            Instruction::swap(CellId(0), CellId(1)),
            Instruction::barrier([CellId(0), CellId(1)]),
            Instruction::x(CellId(1)),
        ];
        assert_eq!(inverse(&inverse(&fragment)), fragment);
    }
}
