//! Sort metadata model.
//!
//! # Responsibility
//! - Define the per-node classification result (`distance` + `quadrant`).
//!
//! # Invariants
//! - `distance` is within `[0, 1]`.
//! - `Quadrant` serializes as its number `1..=4`; downstream notes store it
//!   as a priority value.

use serde::de::{Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Sign-based bucket of an offset vector from the center.
///
/// Screen coordinates: negative `dy` is above the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quadrant {
    /// `dx < 0`, `dy < 0`.
    TopLeft = 1,
    /// `dx >= 0`, `dy < 0`.
    TopRight = 2,
    /// `dx < 0`, `dy >= 0`.
    BottomLeft = 3,
    /// `dx >= 0`, `dy >= 0`.
    BottomRight = 4,
}

impl Quadrant {
    /// Buckets an offset; zero counts as non-negative on both axes.
    pub fn from_offset(dx: f64, dy: f64) -> Self {
        match (dx >= 0.0, dy >= 0.0) {
            (false, false) => Self::TopLeft,
            (true, false) => Self::TopRight,
            (false, true) => Self::BottomLeft,
            (true, true) => Self::BottomRight,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::TopLeft),
            2 => Some(Self::TopRight),
            3 => Some(Self::BottomLeft),
            4 => Some(Self::BottomRight),
            _ => None,
        }
    }
}

impl Display for Quadrant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl Serialize for Quadrant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for Quadrant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Self::from_number(value)
            .ok_or_else(|| D::Error::custom(format!("quadrant must be 1..=4, got {value}")))
    }
}

/// Relative position of one node with respect to the center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SortEntry {
    /// Euclidean distance scaled by the batch maximum, 3 decimals.
    pub distance: f64,
    pub quadrant: Quadrant,
}

/// Classification output keyed by node id.
pub type SortResult = BTreeMap<String, SortEntry>;
