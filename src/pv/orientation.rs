use serde::{Deserialize, Serialize};

use crate::geometry::angular_distance_deg;

/// Orientation derating model.
///
/// The factor is `(1 - tilt_loss·(1 - cos Δtilt)) · (1 - azimuth_loss·(1 - cos Δaz)/2)`
/// where `Δtilt` and `Δaz` are the angular distances from the optimum. It
/// equals 1 at the optimum and strictly decreases as either distance grows,
/// as long as both loss coefficients are positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrientationModel {
    /// Fixed optimal tilt (degrees). Derived from latitude when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_tilt_deg: Option<f64>,
    /// Fraction of yield lost at 90° tilt deviation (0 < x <= 1).
    pub tilt_loss: f64,
    /// Fraction of yield lost when facing directly away from the optimum (0 < x <= 1).
    pub azimuth_loss: f64,
    /// Roof pitch assumed when the user gives none (degrees).
    pub default_tilt_deg: f64,
}

impl Default for OrientationModel {
    fn default() -> Self {
        Self {
            optimal_tilt_deg: None,
            tilt_loss: 0.6,
            azimuth_loss: 0.4,
            default_tilt_deg: 30.0,
        }
    }
}

impl OrientationModel {
    /// Optimal tilt for `lat_deg`: the configured value, or the linear fit
    /// `0.76·|lat| + 3.1` clamped to `[0, 90]`.
    pub fn optimal_tilt_deg(&self, lat_deg: f64) -> f64 {
        self.optimal_tilt_deg
            .unwrap_or_else(|| (0.76 * lat_deg.abs() + 3.1).clamp(0.0, 90.0))
    }

    /// Equator-facing azimuth: south (180°) in the northern hemisphere,
    /// north (0°) in the southern.
    pub fn optimal_azimuth_deg(&self, lat_deg: f64) -> f64 {
        if lat_deg >= 0.0 { 180.0 } else { 0.0 }
    }

    pub fn factor(&self, tilt_deg: f64, azimuth_deg: f64, lat_deg: f64) -> f64 {
        let d_tilt = (tilt_deg - self.optimal_tilt_deg(lat_deg)).abs().to_radians();
        let d_az = angular_distance_deg(azimuth_deg, self.optimal_azimuth_deg(lat_deg)).to_radians();

        let tilt_factor = 1.0 - self.tilt_loss * (1.0 - d_tilt.cos());
        let azimuth_factor = 1.0 - self.azimuth_loss * (1.0 - d_az.cos()) / 2.0;
        tilt_factor * azimuth_factor
    }
}
