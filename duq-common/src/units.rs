//! Storage unit ladder and conversion arithmetic
//!
//! The ladder runs bit → byte → kilobyte → ... → petabyte. Everything from
//! the byte upwards uses the decimal convention (each unit is 1000× the
//! previous one); the bit is the odd one out at 1/8 of a byte.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Bytes per kilobyte (decimal convention)
pub const DECIMAL_STEP: f64 = 1000.0;

/// Bits per byte
pub const BITS_PER_BYTE: f64 = 8.0;

/// Storage units in ladder order
///
/// The derived `Ord` follows declaration order, which is the ladder order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Bit,
    Byte,
    Kilobyte,
    Megabyte,
    Gigabyte,
    Terabyte,
    Petabyte,
}

impl Unit {
    /// Every unit, smallest first
    pub const ALL: [Unit; 7] = [
        Unit::Bit,
        Unit::Byte,
        Unit::Kilobyte,
        Unit::Megabyte,
        Unit::Gigabyte,
        Unit::Terabyte,
        Unit::Petabyte,
    ];

    /// Position on the ladder (bit = 0)
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Unit at a ladder position, if any
    pub fn from_ordinal(ordinal: usize) -> Option<Unit> {
        Self::ALL.get(ordinal).copied()
    }

    /// Largest unit on the ladder
    pub fn largest() -> Unit {
        Unit::Petabyte
    }

    /// Size of one of this unit in bytes
    ///
    /// byte = 1, every following unit ×1000, bit = 1/8.
    pub fn multiplier(self) -> f64 {
        match self {
            Unit::Bit => 1.0 / BITS_PER_BYTE,
            other => DECIMAL_STEP.powi(other.ordinal() as i32 - 1),
        }
    }

    /// Next unit up the ladder
    pub fn next_larger(self) -> Option<Unit> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Next unit down the ladder
    pub fn next_smaller(self) -> Option<Unit> {
        self.ordinal().checked_sub(1).and_then(Self::from_ordinal)
    }

    /// Plural display name ("bits", "kilobytes", ...)
    pub fn display_name(&self) -> &'static str {
        match self {
            Unit::Bit => "bits",
            Unit::Byte => "bytes",
            Unit::Kilobyte => "kilobytes",
            Unit::Megabyte => "megabytes",
            Unit::Gigabyte => "gigabytes",
            Unit::Terabyte => "terabytes",
            Unit::Petabyte => "petabytes",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Unit {
    type Err = Error;

    /// Accepts singular, plural and symbol forms. Symbols are case-sensitive
    /// only for "b" (bit) versus "B" (byte).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "b" => return Ok(Unit::Bit),
            "B" => return Ok(Unit::Byte),
            _ => {}
        }

        match trimmed.to_lowercase().as_str() {
            "bit" | "bits" => Ok(Unit::Bit),
            "byte" | "bytes" => Ok(Unit::Byte),
            "kb" | "kilobyte" | "kilobytes" => Ok(Unit::Kilobyte),
            "mb" | "megabyte" | "megabytes" => Ok(Unit::Megabyte),
            "gb" | "gigabyte" | "gigabytes" => Ok(Unit::Gigabyte),
            "tb" | "terabyte" | "terabytes" => Ok(Unit::Terabyte),
            "pb" | "petabyte" | "petabytes" => Ok(Unit::Petabyte),
            _ => Err(Error::InvalidInput(format!("Unknown storage unit: {:?}", s))),
        }
    }
}

/// Convert a value between any two units by normalising to bytes
pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
    let value_in_bytes = if from == Unit::Bit {
        value / BITS_PER_BYTE
    } else {
        value * from.multiplier()
    };

    if to == Unit::Bit {
        value_in_bytes * BITS_PER_BYTE
    } else {
        value_in_bytes / to.multiplier()
    }
}

/// Number of ladder rungs between two units
pub fn steps_between(from: Unit, to: Unit) -> usize {
    from.ordinal().abs_diff(to.ordinal())
}

/// Every unit visited walking one rung at a time from `from` to `to`,
/// both ends included
pub fn conversion_path(from: Unit, to: Unit) -> Vec<Unit> {
    let (start, end) = (from.ordinal(), to.ordinal());
    if start <= end {
        Unit::ALL[start..=end].to_vec()
    } else {
        Unit::ALL[end..=start].iter().rev().copied().collect()
    }
}
