//! Named cell registers and sub-range views.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::cell::CellId;
use crate::error::{IrError, IrResult};

/// A named, contiguous run of cells.
///
/// Registers are allocated by [`Circuit::add_register`](crate::Circuit::add_register),
/// which owns the underlying cells. A view created with [`Register::view`] is a
/// non-owning alias of a sub-range: it copies no cells, only the bounds.
/// Cells are ordered from index 0 upwards; when a register holds an integer,
/// index 0 is whatever bit the caller loaded first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    /// Register name (for display and lookup by humans).
    name: String,
    /// First cell of the run.
    start: u32,
    /// Number of cells.
    width: u32,
    /// Name of the parent register for views.
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
}

impl Register {
    /// Create an owning register over `[start, start + width)`.
    pub(crate) fn owning(name: impl Into<String>, start: u32, width: u32) -> Self {
        Self {
            name: name.into(),
            start,
            width,
            parent: None,
        }
    }

    /// Get the register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of cells.
    pub fn len(&self) -> usize {
        self.width as usize
    }

    /// Check if the register has no cells.
    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// Name of the register this view aliases, if it is a view.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Check if this register is a non-owning view.
    pub fn is_view(&self) -> bool {
        self.parent.is_some()
    }

    /// Get the cell at `index`.
    pub fn cell(&self, index: usize) -> IrResult<CellId> {
        self.get(index).ok_or_else(|| IrError::IndexOutOfBounds {
            register: self.name.clone(),
            index,
            width: self.len(),
        })
    }

    /// Get the cell at `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<CellId> {
        (index < self.len()).then(|| CellId(self.start + index as u32))
    }

    /// Iterate over the cells in index order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = CellId> + ExactSizeIterator + '_ {
        (self.start..self.start + self.width).map(CellId)
    }

    /// Collect the cells into a vector.
    pub fn cells(&self) -> Vec<CellId> {
        self.iter().collect()
    }

    /// The id range covered by this register.
    pub fn id_range(&self) -> Range<u32> {
        self.start..self.start + self.width
    }

    /// Check whether `cell` belongs to this register.
    pub fn contains(&self, cell: CellId) -> bool {
        self.id_range().contains(&cell.0)
    }

    /// Check whether two registers share at least one cell.
    pub fn overlaps(&self, other: &Register) -> bool {
        let a = self.id_range();
        let b = other.id_range();
        a.start < b.end && b.start < a.end
    }

    /// Create a non-owning view of `len` cells starting at `offset`.
    pub fn view(&self, offset: usize, len: usize, name: impl Into<String>) -> IrResult<Register> {
        let name = name.into();
        if offset.checked_add(len).is_none_or(|end| end > self.len()) {
            return Err(IrError::ViewOutOfBounds {
                name,
                parent: self.name.clone(),
                offset,
                len,
                width: self.len(),
            });
        }
        Ok(Register {
            name,
            start: self.start + offset as u32,
            width: len as u32,
            parent: Some(self.parent.clone().unwrap_or_else(|| self.name.clone())),
        })
    }

    /// Split into two views at `index`, returning (lower, upper).
    pub fn split_at(&self, index: usize) -> IrResult<(Register, Register)> {
        let lower = self.view(0, index, format!("{}.lo", self.name))?;
        let upper = self.view(
            index,
            self.len().saturating_sub(index),
            format!("{}.hi", self.name),
        )?;
        Ok((lower, upper))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.width)
    }
}

impl<'a> IntoIterator for &'a Register {
    type Item = CellId;
    type IntoIter = std::iter::Map<Range<u32>, fn(u32) -> CellId>;

    fn into_iter(self) -> Self::IntoIter {
        self.id_range().map(CellId as fn(u32) -> CellId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_cells() {
        let reg = Register::owning("X", 4, 3);
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.cells(), vec![CellId(4), CellId(5), CellId(6)]);
        assert_eq!(reg.cell(2).unwrap(), CellId(6));
        assert!(reg.cell(3).is_err());
        assert!(!reg.is_view());
    }

    #[test]
    fn test_view_aliases_parent() {
        let reg = Register::owning("anc", 10, 12);
        let view = reg.view(6, 2, "anc.rot").unwrap();
        assert_eq!(view.cells(), vec![CellId(16), CellId(17)]);
        assert_eq!(view.parent(), Some("anc"));
        assert!(reg.overlaps(&view));

        let nested = view.view(1, 1, "anc.rot.1").unwrap();
        assert_eq!(nested.parent(), Some("anc"));
        assert_eq!(nested.cell(0).unwrap(), CellId(17));
    }

    #[test]
    fn test_view_out_of_bounds() {
        let reg = Register::owning("D", 0, 4);
        assert!(matches!(
            reg.view(3, 2, "bad"),
            Err(IrError::ViewOutOfBounds { .. })
        ));
        assert!(reg.view(4, 0, "empty").is_ok());
    }

    #[test]
    fn test_disjoint_registers_do_not_overlap() {
        let a = Register::owning("a", 0, 4);
        let b = Register::owning("b", 4, 4);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_split_at() {
        let reg = Register::owning("D", 2, 5);
        let (lo, hi) = reg.split_at(2).unwrap();
        assert_eq!(lo.cells(), vec![CellId(2), CellId(3)]);
        assert_eq!(hi.cells(), vec![CellId(4), CellId(5), CellId(6)]);
    }
}
