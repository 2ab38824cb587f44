//! Roof outline geometry: measurement, containment, and validation.
//!
//! All functions are pure over immutable inputs. Coordinates are WGS84
//! degrees; areas are square metres on the mean Earth sphere.

/// Spherical-excess polygon area and winding order.
pub mod area;
/// Even-odd point containment.
pub mod containment;
/// Roof facing and bearing helpers.
pub mod orientation;
pub mod point;
pub mod projection;
/// Outline validation and self-intersection detection.
pub mod validate;

pub use area::{Winding, compute_area, signed_area, winding};
pub use containment::is_point_inside;
pub use orientation::{angular_distance_deg, normalize_azimuth, principal_azimuth};
pub use point::{GeoPoint, RoofPolygon};
pub use projection::LocalFrame;
pub use validate::{GeometryWarning, RoofGeometry, find_self_intersections, validate};

/// Mean Earth radius (IUGG), metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;
