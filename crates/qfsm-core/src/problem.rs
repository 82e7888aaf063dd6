//! Validated problem input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FsmError, FsmResult};

/// The three substring-matching variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// The common substring must start at position 0.
    FixedPosition,
    /// The common substring must start at a caller-supplied position.
    FromPosition,
    /// The common substring may start anywhere.
    #[default]
    FreeSearch,
}

impl Mode {
    /// Short name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::FixedPosition => "fixed",
            Mode::FromPosition => "from",
            Mode::FreeSearch => "free",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = FsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" | "fixed-position" | "fpm" => Ok(Mode::FixedPosition),
            "from" | "from-position" | "ffp" => Ok(Mode::FromPosition),
            "free" | "free-search" | "sfsc" => Ok(Mode::FreeSearch),
            other => Err(FsmError::InvalidInput(format!(
                "unknown mode '{other}' (expected fixed, from or free)"
            ))),
        }
    }
}

/// Parse a string of `0`/`1` characters, index 0 first.
pub fn parse_bitstring(s: &str) -> FsmResult<Vec<bool>> {
    s.chars()
        .enumerate()
        .map(|(i, c)| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(FsmError::InvalidInput(format!(
                "'{s}' is not a binary string (character {i} is '{other}')"
            ))),
        })
        .collect()
}

/// Render bits as a `0`/`1` string.
pub fn format_bits(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// A validated substring-matching instance.
///
/// `x` and `y` have the same power-of-two length `n`, and `2 <= d <= n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    x: Vec<bool>,
    y: Vec<bool>,
    d: usize,
    mode: Mode,
    starting_position: Option<usize>,
    original_len: usize,
}

impl Problem {
    /// Validate a problem without a starting position.
    pub fn new(x: &str, y: &str, d: usize, mode: Mode) -> FsmResult<Self> {
        Self::builder(x, y, d).mode(mode).build()
    }

    /// Start building a problem. The mode defaults to free search.
    pub fn builder(x: impl Into<String>, y: impl Into<String>, d: usize) -> ProblemBuilder {
        ProblemBuilder {
            x: x.into(),
            y: y.into(),
            d,
            mode: Mode::default(),
            starting_position: None,
            pad: false,
        }
    }

    /// First input string.
    pub fn x(&self) -> &[bool] {
        &self.x
    }

    /// Second input string.
    pub fn y(&self) -> &[bool] {
        &self.y
    }

    /// Length of the (possibly padded) inputs.
    pub fn n(&self) -> usize {
        self.x.len()
    }

    /// Length of the inputs before padding.
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Whether the inputs were padded.
    pub fn is_padded(&self) -> bool {
        self.original_len != self.x.len()
    }

    /// Target substring length.
    pub fn d(&self) -> usize {
        self.d
    }

    /// Problem variant.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Starting position, present exactly in [`Mode::FromPosition`].
    pub fn starting_position(&self) -> Option<usize> {
        self.starting_position
    }

    /// `k = log2(n)`: index of the last λ link.
    pub fn log_n(&self) -> usize {
        self.n().trailing_zeros() as usize
    }

    /// `m`: number of bits of `d`, one builder stage each.
    pub fn d_len(&self) -> usize {
        (usize::BITS - self.d.leading_zeros()) as usize
    }

    /// Binary representation of `d`, most significant bit first.
    pub fn d_bits_msb_first(&self) -> Vec<bool> {
        let m = self.d_len();
        (0..m).rev().map(|i| (self.d >> i) & 1 == 1).collect()
    }

    /// Whether bit `i` (weight `2^i`) of `d` is set.
    pub fn d_bit(&self, i: usize) -> bool {
        (self.d >> i) & 1 == 1
    }

    /// Initial pointer pattern `D₋₁` of width `n + 1`.
    pub fn initial_pointers(&self) -> Vec<bool> {
        let width = self.n() + 1;
        match (self.mode, self.starting_position) {
            (Mode::FixedPosition, _) => (0..width).map(|p| p == 0).collect(),
            (Mode::FromPosition, Some(start)) => (0..width).map(|p| p == start).collect(),
            (Mode::FromPosition, None) => vec![false; width],
            (Mode::FreeSearch, _) => vec![true; width],
        }
    }
}

/// Builder for [`Problem`].
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    x: String,
    y: String,
    d: usize,
    mode: Mode,
    starting_position: Option<usize>,
    pad: bool,
}

impl ProblemBuilder {
    /// Set the mode.
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the starting position (from-position mode only).
    #[must_use]
    pub fn starting_position(mut self, position: usize) -> Self {
        self.starting_position = Some(position);
        self
    }

    /// Pad inputs whose length is not a power of two.
    ///
    /// `x` is padded with `0` and `y` with `1`, so padded positions never
    /// match.
    #[must_use]
    pub fn padded(mut self, pad: bool) -> Self {
        self.pad = pad;
        self
    }

    /// Validate and build the problem.
    pub fn build(self) -> FsmResult<Problem> {
        if self.x.is_empty() || self.y.is_empty() {
            return Err(FsmError::InvalidInput(
                "input strings cannot be empty".into(),
            ));
        }
        let mut x = parse_bitstring(&self.x)?;
        let mut y = parse_bitstring(&self.y)?;
        if x.len() != y.len() {
            return Err(FsmError::InvalidInput(format!(
                "input lengths do not match ({} vs {})",
                x.len(),
                y.len()
            )));
        }

        let original_len = x.len();
        if self.pad {
            let target = original_len.next_power_of_two();
            x.resize(target, false);
            y.resize(target, true);
        }
        if !x.len().is_power_of_two() {
            return Err(FsmError::InvalidInput(format!(
                "input length {} is not a power of two",
                x.len()
            )));
        }

        if self.d < 2 {
            return Err(FsmError::InvalidInput(format!(
                "substring length must be at least 2, got {}",
                self.d
            )));
        }
        if self.d > original_len {
            return Err(FsmError::InvalidInput(format!(
                "substring length {} exceeds input length {original_len}",
                self.d
            )));
        }

        match (self.mode, self.starting_position) {
            (Mode::FromPosition, None) => {
                return Err(FsmError::InvalidInput(
                    "from-position mode requires a starting position".into(),
                ));
            }
            (Mode::FromPosition, Some(p)) if p > original_len => {
                return Err(FsmError::InvalidInput(format!(
                    "starting position {p} is outside 0..={original_len}"
                )));
            }
            (Mode::FixedPosition | Mode::FreeSearch, Some(_)) => {
                return Err(FsmError::InvalidInput(format!(
                    "a starting position only applies to from-position mode, not {}",
                    self.mode
                )));
            }
            _ => {}
        }

        Ok(Problem {
            x,
            y,
            d: self.d,
            mode: self.mode,
            starting_position: self.starting_position,
            original_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn kind(result: FsmResult<Problem>) -> ErrorKind {
        result.unwrap_err().kind()
    }

    #[test]
    fn test_valid_problem() {
        let p = Problem::new("1100", "1110", 2, Mode::FreeSearch).unwrap();
        assert_eq!(p.n(), 4);
        assert_eq!(p.log_n(), 2);
        assert_eq!(p.d_len(), 2);
        assert_eq!(p.d_bits_msb_first(), vec![true, false]);
        assert!(!p.d_bit(0));
        assert!(p.d_bit(1));
        assert_eq!(p.initial_pointers(), vec![true; 5]);
    }

    #[test]
    fn test_input_errors() {
        assert_eq!(kind(Problem::new("", "", 2, Mode::FreeSearch)), ErrorKind::InvalidInput);
        assert_eq!(kind(Problem::new("10", "101", 2, Mode::FreeSearch)), ErrorKind::InvalidInput);
        assert_eq!(kind(Problem::new("1a", "10", 2, Mode::FreeSearch)), ErrorKind::InvalidInput);
        assert_eq!(kind(Problem::new("101", "101", 2, Mode::FreeSearch)), ErrorKind::InvalidInput);
        assert_eq!(kind(Problem::new("1010", "1010", 1, Mode::FreeSearch)), ErrorKind::InvalidInput);
        assert_eq!(kind(Problem::new("1010", "1010", 5, Mode::FreeSearch)), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_starting_position_rules() {
        assert_eq!(kind(Problem::new("1010", "1010", 2, Mode::FromPosition)), ErrorKind::InvalidInput);

        let out_of_range = Problem::builder("1010", "1010", 2)
            .mode(Mode::FromPosition)
            .starting_position(5)
            .build();
        assert_eq!(kind(out_of_range), ErrorKind::InvalidInput);

        let wrong_mode = Problem::builder("1010", "1010", 2)
            .mode(Mode::FixedPosition)
            .starting_position(1)
            .build();
        assert_eq!(kind(wrong_mode), ErrorKind::InvalidInput);

        let p = Problem::builder("1010", "1010", 2)
            .mode(Mode::FromPosition)
            .starting_position(4)
            .build()
            .unwrap();
        assert_eq!(p.initial_pointers(), vec![false, false, false, false, true]);
    }

    #[test]
    fn test_padding() {
        let p = Problem::builder("101", "101", 2).padded(true).build().unwrap();
        assert_eq!(p.n(), 4);
        assert_eq!(p.original_len(), 3);
        assert!(p.is_padded());
        assert_eq!(format_bits(p.x()), "1010");
        assert_eq!(format_bits(p.y()), "1011");
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("fixed".parse::<Mode>().unwrap(), Mode::FixedPosition);
        assert_eq!("FFP".parse::<Mode>().unwrap(), Mode::FromPosition);
        assert_eq!("free-search".parse::<Mode>().unwrap(), Mode::FreeSearch);
        assert!("anywhere".parse::<Mode>().is_err());
        assert_eq!(Mode::FromPosition.to_string(), "from");
    }
}
