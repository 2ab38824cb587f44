use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::EARTH_RADIUS_M;
use super::point::RoofPolygon;

/// Traversal direction of an outline in an east/north frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    CounterClockwise,
    Clockwise,
    /// Zero enclosed area (collinear points or fewer than three).
    Degenerate,
}

/// Signed spherical-excess area of the outline in square metres.
///
/// Positive for counter-clockwise outlines, negative for clockwise ones.
/// Uses `A = -R²/2 · Σ (λ[i+1] - λ[i-1]) · (sin φ[i] - sin φ_min)`, with
/// longitude differences wrapped into `(-π, π]`. The `sin φ_min` offset
/// leaves the exact sum unchanged (the longitude differences telescope to
/// zero) but keeps the terms small for building-sized outlines. Returns
/// `0.0` for fewer than three points. Self-intersecting outlines yield the
/// net signed sum of their lobes rather than failing.
pub fn signed_area(polygon: &RoofPolygon) -> f64 {
    let pts = polygon.points();
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }

    let min_lat = pts.iter().map(|p| p.lat).fold(f64::INFINITY, f64::min);
    let sin_ref = min_lat.to_radians().sin();

    let mut sum = 0.0_f64;
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let next = pts[(i + 1) % n];
        let d_lng = wrap_radians((next.lng - prev.lng).to_radians());
        sum += d_lng * (pts[i].lat.to_radians().sin() - sin_ref);
    }

    -sum * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0
}

/// Unsigned outline area in square metres.
///
/// Invariant to the starting vertex and the traversal direction.
pub fn compute_area(polygon: &RoofPolygon) -> f64 {
    signed_area(polygon).abs()
}

/// Winding order derived from the sign of [`signed_area`].
pub fn winding(polygon: &RoofPolygon) -> Winding {
    let a = signed_area(polygon);
    if a > 0.0 {
        Winding::CounterClockwise
    } else if a < 0.0 {
        Winding::Clockwise
    } else {
        Winding::Degenerate
    }
}

impl RoofPolygon {
    /// Returns the outline in counter-clockwise order.
    pub fn normalized(&self) -> RoofPolygon {
        match winding(self) {
            Winding::Clockwise => self.reversed(),
            Winding::CounterClockwise | Winding::Degenerate => self.clone(),
        }
    }
}

fn wrap_radians(x: f64) -> f64 {
    if x > PI {
        x - 2.0 * PI
    } else if x <= -PI {
        x + 2.0 * PI
    } else {
        x
    }
}
