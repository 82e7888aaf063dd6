//! Decoding measured bitstrings.

use serde::{Deserialize, Serialize};

use crate::error::{FsmError, FsmResult};

/// A decoded measurement: the found flag and every match start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Whether a common substring of length `d` exists.
    pub found: bool,
    /// Start positions of the matches, ascending.
    pub positions: Vec<usize>,
}

impl Outcome {
    /// Decode a bitstring measured over `[out, begins[0], …, begins[n]]`.
    ///
    /// A set begins cell `c` marks a match starting at `c - d`.
    pub fn decode(bitstring: &str, d: usize) -> FsmResult<Self> {
        let mut chars = bitstring.chars();
        let found = match chars.next() {
            Some('1') => true,
            Some('0') => false,
            _ => {
                return Err(FsmError::InvalidInput(format!(
                    "cannot decode outcome '{bitstring}'"
                )));
            }
        };

        let mut positions = vec![];
        for (cell, c) in chars.enumerate() {
            match c {
                '1' if cell >= d => positions.push(cell - d),
                '1' => {
                    return Err(FsmError::InvalidInput(format!(
                        "begins cell {cell} is set but no match of length {d} can end there"
                    )));
                }
                '0' => {}
                other => {
                    return Err(FsmError::InvalidInput(format!(
                        "unexpected character '{other}' in outcome '{bitstring}'"
                    )));
                }
            }
        }

        Ok(Self { found, positions })
    }

    /// Whether the found flag agrees with the decoded positions.
    pub fn is_consistent(&self) -> bool {
        self.found == !self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let outcome = Outcome::decode("100100", 2).unwrap();
        assert!(outcome.found);
        assert_eq!(outcome.positions, vec![0]);
        assert!(outcome.is_consistent());

        let none = Outcome::decode("000000", 2).unwrap();
        assert_eq!(none, Outcome::default());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Outcome::decode("", 2).is_err());
        assert!(Outcome::decode("10x", 2).is_err());
        assert!(Outcome::decode("110000", 2).is_err());
    }
}
