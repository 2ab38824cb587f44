//! Per-roof inputs to the yield model.

use serde::{Deserialize, Serialize};

use super::orientation::OrientationModel;
use crate::error::CalcError;
use crate::geometry::{GeoPoint, RoofGeometry, RoofPolygon, normalize_azimuth, principal_azimuth};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteParameters {
    /// Panel tilt from horizontal (degrees, 0..=90).
    pub tilt_deg: f64,
    /// Compass direction the panels face (degrees, 0 = north, clockwise).
    pub azimuth_deg: f64,
    /// Fraction of yield lost to shading (0 <= x < 1).
    #[serde(default)]
    pub shading_loss: f64,
    /// Where the roof is; selects the irradiance class and the hemisphere.
    pub location: GeoPoint,
    /// Explicit irradiance class, bypassing the location lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irradiance_class: Option<String>,
}

impl SiteParameters {
    /// Defaults for a freshly confirmed roof: located at the outline
    /// centroid, facing the roof edge normal nearest the equator, at the
    /// configured default pitch, unshaded.
    pub fn for_roof(polygon: &RoofPolygon, roof: &RoofGeometry, orientation: &OrientationModel) -> Self {
        let lat = roof.centroid.lat;
        let preferred = orientation.optimal_azimuth_deg(lat);
        Self {
            tilt_deg: orientation.default_tilt_deg,
            azimuth_deg: principal_azimuth(polygon, preferred).unwrap_or(preferred),
            shading_loss: 0.0,
            location: roof.centroid,
            irradiance_class: None,
        }
    }

    /// Same site with the irradiance class pinned to `name`.
    pub fn with_irradiance_class(mut self, name: impl Into<String>) -> Self {
        self.irradiance_class = Some(name.into());
        self
    }

    /// Azimuth folded into `[0, 360)`.
    pub fn azimuth_normalized(&self) -> f64 {
        normalize_azimuth(self.azimuth_deg)
    }

    /// # Errors
    ///
    /// [`CalcError::InvalidSiteParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CalcError> {
        if !(self.tilt_deg.is_finite() && (0.0..=90.0).contains(&self.tilt_deg)) {
            return Err(CalcError::site("tilt_deg", format!("{} is outside 0..=90", self.tilt_deg)));
        }
        if !self.azimuth_deg.is_finite() {
            return Err(CalcError::site("azimuth_deg", "must be finite"));
        }
        if !(self.shading_loss.is_finite() && (0.0..1.0).contains(&self.shading_loss)) {
            return Err(CalcError::site(
                "shading_loss",
                format!("{} is outside 0..1", self.shading_loss),
            ));
        }
        if !self.location.is_valid() {
            return Err(CalcError::site("location", "not a valid latitude/longitude"));
        }
        Ok(())
    }
}
