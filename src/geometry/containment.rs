use super::point::{GeoPoint, RoofPolygon};

/// Even-odd containment test in the longitude/latitude plane.
///
/// Casts a ray from `point` towards increasing longitude and counts edge
/// crossings. Each edge covers the half-open latitude interval
/// `[min, max)`, so a ray through a shared vertex is counted exactly once
/// and horizontal edges never count. Points on the boundary therefore get
/// a fixed answer for a given outline: on left/bottom edges they are
/// inside, on right/top edges outside.
///
/// Outlines with fewer than three points contain nothing.
pub fn is_point_inside(point: GeoPoint, polygon: &RoofPolygon) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    for (a, b) in polygon.edges() {
        if (a.lat > point.lat) != (b.lat > point.lat) {
            let t = (point.lat - a.lat) / (b.lat - a.lat);
            let crossing_lng = a.lng + t * (b.lng - a.lng);
            if point.lng < crossing_lng {
                inside = !inside;
            }
        }
    }
    inside
}
