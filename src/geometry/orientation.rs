use super::point::RoofPolygon;
use super::projection::LocalFrame;
use super::validate::centroid;

/// Normalizes an azimuth to `[0, 360)` degrees.
pub fn normalize_azimuth(deg: f64) -> f64 {
    let a = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Smallest angle between two azimuths, in `[0, 180]` degrees.
pub fn angular_distance_deg(a: f64, b: f64) -> f64 {
    let d = normalize_azimuth(a - b);
    if d > 180.0 { 360.0 - d } else { d }
}

/// Facing of the longest roof edge, picking the edge normal closest to
/// `preferred_deg`.
///
/// On a pitched roof the longest eave usually runs along the ridge, so its
/// normal approximates the slope direction. Returns `None` when the outline
/// has no edge of non-zero length.
pub fn principal_azimuth(polygon: &RoofPolygon, preferred_deg: f64) -> Option<f64> {
    let frame = LocalFrame::new(centroid(polygon)?);

    let (dx, dy) = polygon
        .edges()
        .map(|(a, b)| {
            let (ax, ay) = frame.project(a);
            let (bx, by) = frame.project(b);
            (bx - ax, by - ay)
        })
        .filter(|(dx, dy)| dx.hypot(*dy) > 0.0)
        .max_by(|l, r| l.0.hypot(l.1).total_cmp(&r.0.hypot(r.1)))?;

    let bearing = dx.atan2(dy).to_degrees();
    let left = normalize_azimuth(bearing - 90.0);
    let right = normalize_azimuth(bearing + 90.0);

    if angular_distance_deg(left, preferred_deg) <= angular_distance_deg(right, preferred_deg) {
        Some(left)
    } else {
        Some(right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::GeoPoint;

    #[test]
    fn normalize_wraps_both_directions() {
        assert_eq!(normalize_azimuth(370.0), 10.0);
        assert_eq!(normalize_azimuth(-90.0), 270.0);
        assert_eq!(normalize_azimuth(360.0), 0.0);
    }

    #[test]
    fn angular_distance_is_symmetric_and_bounded() {
        assert_eq!(angular_distance_deg(350.0, 10.0), 20.0);
        assert_eq!(angular_distance_deg(10.0, 350.0), 20.0);
        assert_eq!(angular_distance_deg(0.0, 180.0), 180.0);
        assert_eq!(angular_distance_deg(90.0, 90.0), 0.0);
    }

    #[test]
    fn east_west_ridge_faces_south() {
        let frame = LocalFrame::new(GeoPoint::new(48.0, 11.0));
        let roof = RoofPolygon::new(vec![
            frame.unproject(0.0, 0.0),
            frame.unproject(12.0, 0.0),
            frame.unproject(12.0, 5.0),
            frame.unproject(0.0, 5.0),
        ]);
        let az = principal_azimuth(&roof, 180.0).unwrap();
        assert!(angular_distance_deg(az, 180.0) < 0.01, "got {az}");

        let az_south_hemi = principal_azimuth(&roof, 0.0).unwrap();
        assert!(angular_distance_deg(az_south_hemi, 0.0) < 0.01);
    }

    #[test]
    fn rotated_building_follows_longest_edge() {
        let frame = LocalFrame::new(GeoPoint::new(40.0, -3.7));
        let (c, s) = (30f64.to_radians().cos(), 30f64.to_radians().sin());
        let rot = |x: f64, y: f64| frame.unproject(x * c - y * s, x * s + y * c);
        let roof = RoofPolygon::new(vec![rot(0.0, 0.0), rot(15.0, 0.0), rot(15.0, 6.0), rot(0.0, 6.0)]);
        let az = principal_azimuth(&roof, 180.0).unwrap();
        // long edge bearing is 60°, its normals are 150° and 330°
        assert!(angular_distance_deg(az, 150.0) < 0.01, "got {az}");
    }

    #[test]
    fn empty_outline_has_no_azimuth() {
        assert!(principal_azimuth(&RoofPolygon::default(), 180.0).is_none());
    }
}
