//! Qubit and classical bit identifiers.
//!
//! Both identifiers are 1-based: `QubitId(1)` is the first qubit of a
//! register and occupies the most significant bit of a basis-state index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a qubit within a circuit (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Zero-based position of this qubit.
    #[inline]
    pub fn index(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }

    /// Bit position of this qubit in a basis-state index of an
    /// `qubit_count`-qubit register (qubit 1 is the most significant bit).
    #[inline]
    pub fn bit_position(self, qubit_count: u32) -> u32 {
        qubit_count - self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Identifier of a classical bit within a circuit (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}
