//! Boolean cell identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a boolean cell within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellId(pub u32);

impl CellId {
    /// Index of this cell in the circuit's cell table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for CellId {
    fn from(id: u32) -> Self {
        CellId(id)
    }
}

/// A cell with its owning register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// The unique identifier.
    pub id: CellId,
    /// The name of the register this cell was allocated in.
    pub register: String,
    /// The index within the register.
    pub index: u32,
}

impl Cell {
    /// Create a new cell with register membership.
    pub fn new(id: CellId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: register.into(),
            index,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

/// Polarity of a control cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// The gate fires when the control holds 1.
    Positive,
    /// The gate fires when the control holds 0.
    Negative,
}

impl Polarity {
    /// The cell value that activates a control with this polarity.
    #[inline]
    pub fn active_value(self) -> bool {
        matches!(self, Polarity::Positive)
    }
}

/// A control cell with its polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Control {
    /// The controlling cell.
    pub cell: CellId,
    /// Required value for the gate to fire.
    pub polarity: Polarity,
}

impl Control {
    /// A control that fires on 1.
    pub fn positive(cell: CellId) -> Self {
        Self {
            cell,
            polarity: Polarity::Positive,
        }
    }

    /// A control that fires on 0.
    pub fn negative(cell: CellId) -> Self {
        Self {
            cell,
            polarity: Polarity::Negative,
        }
    }

    /// Whether this control is satisfied by the given cell value.
    #[inline]
    pub fn is_active(&self, value: bool) -> bool {
        value == self.polarity.active_value()
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.polarity {
            Polarity::Positive => write!(f, "{}", self.cell),
            Polarity::Negative => write!(f, "!{}", self.cell),
        }
    }
}
