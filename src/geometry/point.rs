//! Geographic points and the user-drawn roof outline.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude (degrees, positive north).
    pub lat: f64,
    /// Longitude (degrees, positive east).
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude in degrees.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` when both coordinates are finite and within WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Ordered roof outline in drawing order; the closing edge is implicit.
///
/// Edits never mutate an outline in place: each `with_*` method returns a
/// new polygon which replaces the previous one wholesale.
///
/// # Examples
///
/// ```
/// use solar_quote::geometry::{GeoPoint, RoofPolygon};
///
/// let roof = RoofPolygon::default()
///     .with_point_added(GeoPoint::new(48.0, 11.0))
///     .with_point_added(GeoPoint::new(48.0, 11.0001))
///     .with_point_added(GeoPoint::new(48.0001, 11.0001));
/// assert_eq!(roof.len(), 3);
/// assert_eq!(roof.edges().count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoofPolygon {
    points: Vec<GeoPoint>,
}

impl RoofPolygon {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over edges `(from, to)` including the closing edge.
    ///
    /// Yields nothing for outlines with fewer than two points.
    pub fn edges(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let n = if self.points.len() < 2 {
            0
        } else {
            self.points.len()
        };
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Returns a copy with `point` appended.
    pub fn with_point_added(&self, point: GeoPoint) -> Self {
        let mut points = Vec::with_capacity(self.points.len() + 1);
        points.extend_from_slice(&self.points);
        points.push(point);
        Self { points }
    }

    /// Returns a copy with the point at `index` moved, or `None` if out of range.
    pub fn with_point_moved(&self, index: usize, to: GeoPoint) -> Option<Self> {
        if index >= self.points.len() {
            return None;
        }
        let mut points = self.points.clone();
        points[index] = to;
        Some(Self { points })
    }

    /// Returns a copy without the point at `index`, or `None` if out of range.
    pub fn with_point_removed(&self, index: usize) -> Option<Self> {
        if index >= self.points.len() {
            return None;
        }
        let mut points = self.points.clone();
        points.remove(index);
        Some(Self { points })
    }

    /// Same outline traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Same outline starting at vertex `start` (modulo length).
    pub fn rotated(&self, start: usize) -> Self {
        if self.points.is_empty() {
            return self.clone();
        }
        let mut points = self.points.clone();
        points.rotate_left(start % self.points.len());
        Self { points }
    }
}

impl From<Vec<GeoPoint>> for RoofPolygon {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self::new(points)
    }
}
