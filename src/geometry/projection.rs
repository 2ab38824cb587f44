//! Local equirectangular projection for building-scale planar tests.

use super::EARTH_RADIUS_M;
use super::point::GeoPoint;

/// East/north metre offsets around a fixed origin.
///
/// Accurate to well under a centimetre across a single roof; not meant for
/// outlines spanning more than a few kilometres or crossing the antimeridian.
#[derive(Debug, Clone, Copy)]
pub struct LocalFrame {
    origin: GeoPoint,
    cos_lat: f64,
}

impl LocalFrame {
    pub fn new(origin: GeoPoint) -> Self {
        Self {
            origin,
            cos_lat: origin.lat.to_radians().cos(),
        }
    }

    /// Projects `p` to `(east_m, north_m)` relative to the origin.
    pub fn project(&self, p: GeoPoint) -> (f64, f64) {
        let x = (p.lng - self.origin.lng).to_radians() * EARTH_RADIUS_M * self.cos_lat;
        let y = (p.lat - self.origin.lat).to_radians() * EARTH_RADIUS_M;
        (x, y)
    }

    /// Inverse of [`LocalFrame::project`].
    pub fn unproject(&self, east_m: f64, north_m: f64) -> GeoPoint {
        let lat = self.origin.lat + (north_m / EARTH_RADIUS_M).to_degrees();
        let lng = self.origin.lng + (east_m / (EARTH_RADIUS_M * self.cos_lat)).to_degrees();
        GeoPoint::new(lat, lng)
    }
}
