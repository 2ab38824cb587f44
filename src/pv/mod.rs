//! Photovoltaic yield model: array packing, irradiance lookup, and
//! orientation/shading derating.

/// Irradiance-class lookup table.
pub mod irradiance;
pub mod model;
/// Tilt/azimuth derating relative to the latitude optimum.
pub mod orientation;
pub mod site;
/// Panel packing and system sizing types.
pub mod sizing;

pub use irradiance::{Bounds, IrradianceClass, IrradianceTable};
pub use model::YieldModel;
pub use orientation::OrientationModel;
pub use site::SiteParameters;
pub use sizing::{ArrayLayout, PanelSpec, SystemSizing};
