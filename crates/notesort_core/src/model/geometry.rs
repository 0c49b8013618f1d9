//! Planar geometry primitives shared by canvas nodes and the classifier.
//!
//! # Invariants
//! - Coordinates are canvas units; `y` grows downward as in the canvas editor.
//! - Integral coordinates serialize as JSON integers so documents round-trip
//!   byte-compatible with the editor's own output.

use serde::{Deserialize, Serialize, Serializer};

/// Positioned, sized box carried by every canvas node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default, serialize_with = "serialize_coord")]
    pub x: f64,
    #[serde(default, serialize_with = "serialize_coord")]
    pub y: f64,
    #[serde(default, serialize_with = "serialize_coord")]
    pub width: f64,
    #[serde(default, serialize_with = "serialize_coord")]
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the center point `(x + width/2, y + height/2)`.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Identified rectangle used as classifier input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rect {
    pub id: String,
    pub bounds: Bounds,
}

impl Rect {
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            bounds: Bounds::new(x, y, width, height),
        }
    }

    /// Zero-sized rectangle at the origin, used when no center is designated.
    pub fn origin() -> Self {
        Self::default()
    }

    pub fn center(&self) -> (f64, f64) {
        self.bounds.center()
    }

    /// Returns the same rectangle moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let mut moved = self.clone();
        moved.bounds.x += dx;
        moved.bounds.y += dy;
        moved
    }
}

fn serialize_coord<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // i64 range guard keeps huge values from saturating on the cast.
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
