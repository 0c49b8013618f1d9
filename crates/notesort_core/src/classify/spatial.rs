//! Distance/quadrant classifier.
//!
//! # Invariants
//! - Output holds one entry per distinct input id (last write wins).
//! - Distances are in `[0, 1]`; the farthest rectangle maps to `1.0`.
//! - A zero maximum distance yields `0.0` everywhere instead of NaN.

use crate::model::geometry::Rect;
use crate::model::sort::{Quadrant, SortEntry, SortResult};

const DISTANCE_SCALE: f64 = 1000.0;

/// Classifies every rectangle relative to `center`.
///
/// Offsets are measured between rectangle centers. Raw distances are divided
/// by the batch maximum and rounded to 3 decimals.
pub fn classify(rects: &[Rect], center: &Rect) -> SortResult {
    let (center_x, center_y) = center.center();

    let measured: Vec<(&str, f64, Quadrant)> = rects
        .iter()
        .map(|rect| {
            let (x, y) = rect.center();
            let (dx, dy) = (x - center_x, y - center_y);
            (rect.id.as_str(), dx.hypot(dy), Quadrant::from_offset(dx, dy))
        })
        .collect();

    let max_distance = measured
        .iter()
        .map(|(_, distance, _)| *distance)
        .fold(0.0_f64, f64::max);

    measured
        .into_iter()
        .map(|(id, raw, quadrant)| {
            (
                id.to_string(),
                SortEntry {
                    distance: normalize_distance(raw, max_distance),
                    quadrant,
                },
            )
        })
        .collect()
}

/// Scales `raw` by `max` and rounds to 3 decimals; `max == 0` maps to `0`.
pub fn normalize_distance(raw: f64, max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return 0.0;
    }
    (raw * DISTANCE_SCALE / max).round() / DISTANCE_SCALE
}
