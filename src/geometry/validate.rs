use serde::{Deserialize, Serialize};

use super::area::{Winding, signed_area, winding};
use super::point::{GeoPoint, RoofPolygon};
use super::projection::LocalFrame;
use crate::error::CalcError;

/// Non-fatal finding about a drawn outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometryWarning {
    /// Edges `first_edge` and `second_edge` cross. Edge `i` runs from
    /// point `i` to point `i + 1` (wrapping).
    SelfIntersection { first_edge: usize, second_edge: usize },
}

/// Measurements of an outline that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofGeometry {
    /// Unsigned enclosed area (m²).
    pub area_m2: f64,
    /// Drawing direction of the outline as supplied.
    pub winding: Winding,
    /// Vertex centroid.
    pub centroid: GeoPoint,
    /// Non-fatal findings, e.g. self-intersections.
    pub warnings: Vec<GeometryWarning>,
}

/// Validates a drawn outline and measures it.
///
/// # Errors
///
/// - [`CalcError::InsufficientVertices`] for fewer than three points.
/// - [`CalcError::DegenerateArea`] when any coordinate is non-finite or out
///   of range, or the area is below `min_area_m2`.
///
/// Self-intersections are reported as warnings, not errors.
pub fn validate(polygon: &RoofPolygon, min_area_m2: f64) -> Result<RoofGeometry, CalcError> {
    if polygon.len() < 3 {
        return Err(CalcError::InsufficientVertices {
            found: polygon.len(),
        });
    }

    if !polygon.points().iter().all(GeoPoint::is_valid) {
        return Err(CalcError::DegenerateArea {
            area_m2: f64::NAN,
            min_m2: min_area_m2,
        });
    }

    let area_m2 = signed_area(polygon).abs();
    if !area_m2.is_finite() || area_m2 < min_area_m2 {
        return Err(CalcError::DegenerateArea {
            area_m2,
            min_m2: min_area_m2,
        });
    }

    let warnings: Vec<GeometryWarning> = find_self_intersections(polygon)
        .into_iter()
        .map(|(first_edge, second_edge)| GeometryWarning::SelfIntersection {
            first_edge,
            second_edge,
        })
        .collect();
    if !warnings.is_empty() {
        tracing::warn!(
            crossings = warnings.len(),
            area_m2,
            "roof outline intersects itself; area may be understated"
        );
    }

    Ok(RoofGeometry {
        area_m2,
        winding: winding(polygon),
        centroid: centroid(polygon).unwrap_or(polygon.points()[0]),
        warnings,
    })
}

/// Arithmetic mean of the outline vertices, or `None` when empty.
pub fn centroid(polygon: &RoofPolygon) -> Option<GeoPoint> {
    let pts = polygon.points();
    if pts.is_empty() {
        return None;
    }
    let n = pts.len() as f64;
    let (lat, lng) = pts
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Some(GeoPoint::new(lat / n, lng / n))
}

/// Returns index pairs `(i, j)`, `i < j`, of non-adjacent edges that touch
/// or cross.
pub fn find_self_intersections(polygon: &RoofPolygon) -> Vec<(usize, usize)> {
    let n = polygon.len();
    if n < 4 {
        return Vec::new();
    }
    let Some(origin) = centroid(polygon) else {
        return Vec::new();
    };
    let frame = LocalFrame::new(origin);
    let pts: Vec<(f64, f64)> = polygon.points().iter().map(|p| frame.project(*p)).collect();
    let edge = |i: usize| (pts[i], pts[(i + 1) % n]);

    let mut hits = Vec::new();
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (p1, p2) = edge(i);
            let (q1, q2) = edge(j);
            if segments_intersect(p1, p2, q1, q2) {
                hits.push((i, j));
            }
        }
    }
    hits
}

type Xy = (f64, f64);

fn orient(a: Xy, b: Xy, c: Xy) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

fn on_segment(a: Xy, b: Xy, p: Xy) -> bool {
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}

fn segments_intersect(p1: Xy, p2: Xy, q1: Xy, q2: Xy) -> bool {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}
