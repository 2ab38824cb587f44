//! Area-to-energy conversion.

use serde::{Deserialize, Serialize};

use super::irradiance::IrradianceTable;
use super::orientation::OrientationModel;
use super::site::SiteParameters;
use super::sizing::{ArrayLayout, PanelSpec, SystemSizing};
use crate::error::CalcError;

/// Yield model over injectable panel, orientation and irradiance data.
///
/// # Examples
///
/// ```
/// use solar_quote::geometry::GeoPoint;
/// use solar_quote::pv::{SiteParameters, YieldModel};
///
/// let model = YieldModel::default();
/// let site = SiteParameters {
///     tilt_deg: 35.0,
///     azimuth_deg: 180.0,
///     shading_loss: 0.0,
///     location: GeoPoint::new(48.1, 11.6),
///     irradiance_class: None,
/// };
/// let sizing = model.evaluate(50.0, &site).unwrap();
/// assert_eq!(sizing.panel_count, 22);
/// assert_eq!(sizing.irradiance_class, "central_europe");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YieldModel {
    pub panel: PanelSpec,
    pub orientation: OrientationModel,
    pub irradiance: IrradianceTable,
}

impl YieldModel {
    pub fn new(panel: PanelSpec, orientation: OrientationModel, irradiance: IrradianceTable) -> Self {
        Self {
            panel,
            orientation,
            irradiance,
        }
    }

    /// Packs whole panels into the usable share of `area_m2`.
    ///
    /// Packing does not depend on orientation; `site` is only checked so an
    /// invalid site fails before any work is reported.
    pub fn size_system(&self, area_m2: f64, site: &SiteParameters) -> Result<ArrayLayout, CalcError> {
        site.validate()?;
        if !area_m2.is_finite() || area_m2 < 0.0 {
            return Err(CalcError::DegenerateArea {
                area_m2,
                min_m2: self.panel.min_roof_area_m2(),
            });
        }

        let usable_area_m2 = area_m2 * self.panel.packing_efficiency;
        let panel_count = self.panel.panels_for(usable_area_m2);
        Ok(ArrayLayout {
            roof_area_m2: area_m2,
            usable_area_m2,
            panel_count,
            capacity_kwp: f64::from(panel_count) * self.panel.rated_kwp,
        })
    }

    /// Annual production (kWh) of `layout` at `site`.
    ///
    /// # Errors
    ///
    /// [`CalcError::UnknownIrradianceRegion`] when the site's class or
    /// location is not in the table; [`CalcError::InvalidSiteParameter`] for
    /// out-of-range site values.
    pub fn estimate_annual_yield(&self, layout: &ArrayLayout, site: &SiteParameters) -> Result<f64, CalcError> {
        Ok(self.derate(layout, site)?.0)
    }

    /// Sizes the array and estimates its yield in one step.
    pub fn evaluate(&self, area_m2: f64, site: &SiteParameters) -> Result<SystemSizing, CalcError> {
        let layout = self.size_system(area_m2, site)?;
        let (annual_yield_kwh, class, orientation_factor) = self.derate(&layout, site)?;

        let specific_yield_kwh_per_kwp = if layout.capacity_kwp > 0.0 {
            annual_yield_kwh / layout.capacity_kwp
        } else {
            0.0
        };

        tracing::debug!(
            panels = layout.panel_count,
            capacity_kwp = layout.capacity_kwp,
            annual_yield_kwh,
            class = %class,
            "sized system"
        );

        Ok(SystemSizing {
            roof_area_m2: layout.roof_area_m2,
            usable_area_m2: layout.usable_area_m2,
            panel_count: layout.panel_count,
            capacity_kwp: layout.capacity_kwp,
            annual_yield_kwh,
            specific_yield_kwh_per_kwp,
            irradiance_class: class,
            orientation_factor,
        })
    }

    fn derate(&self, layout: &ArrayLayout, site: &SiteParameters) -> Result<(f64, String, f64), CalcError> {
        site.validate()?;
        let class = self.irradiance.resolve(site)?;
        let factor = self
            .orientation
            .factor(site.tilt_deg, site.azimuth_normalized(), site.location.lat);
        let kwh = layout.capacity_kwp * class.kwh_per_kwp * factor * (1.0 - site.shading_loss);
        Ok((kwh, class.name.clone(), factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeoPoint;
    use crate::pv::{Bounds, IrradianceClass};

    fn synthetic() -> YieldModel {
        YieldModel::new(
            PanelSpec::default(),
            OrientationModel {
                optimal_tilt_deg: Some(30.0),
                ..OrientationModel::default()
            },
            IrradianceTable {
                default_class: "flat".into(),
                classes: vec![IrradianceClass {
                    name: "flat".into(),
                    kwh_per_kwp: 1100.0,
                    bounds: Some(Bounds {
                        south: 40.0,
                        north: 60.0,
                        west: 0.0,
                        east: 20.0,
                    }),
                }],
            },
        )
    }

    fn optimal_site() -> SiteParameters {
        SiteParameters {
            tilt_deg: 30.0,
            azimuth_deg: 180.0,
            shading_loss: 0.0,
            location: GeoPoint::new(50.0, 10.0),
            irradiance_class: None,
        }
    }

    #[test]
    fn fifty_square_metre_roof() {
        let sizing = synthetic().evaluate(50.0, &optimal_site()).unwrap();
        assert!((sizing.usable_area_m2 - 40.0).abs() < 1e-9);
        assert_eq!(sizing.panel_count, 22);
        assert!((sizing.capacity_kwp - 8.8).abs() < 1e-9);
        assert!((sizing.annual_yield_kwh - 9680.0).abs() < 1e-6);
        assert!((sizing.specific_yield_kwh_per_kwp - 1100.0).abs() < 1e-9);
        assert_eq!(sizing.orientation_factor, 1.0);
    }

    #[test]
    fn sizing_is_monotone_in_area() {
        let model = synthetic();
        let site = optimal_site();
        let mut last = 0;
        for step in 0..=400 {
            let layout = model.size_system(step as f64 * 0.25, &site).unwrap();
            assert!(layout.panel_count >= last);
            assert!(f64::from(layout.panel_count) * model.panel.footprint_m2 <= layout.usable_area_m2);
            last = layout.panel_count;
        }
    }

    #[test]
    fn yield_peaks_at_optimal_orientation() {
        let model = synthetic();
        let layout = model.size_system(50.0, &optimal_site()).unwrap();
        let best = model.estimate_annual_yield(&layout, &optimal_site()).unwrap();

        for tilt in [0.0, 10.0, 25.0, 29.0, 31.0, 45.0, 90.0] {
            let site = SiteParameters { tilt_deg: tilt, ..optimal_site() };
            assert!(model.estimate_annual_yield(&layout, &site).unwrap() < best, "tilt {tilt}");
        }
        for az in [0.0, 90.0, 170.0, 179.0, 181.0, 270.0] {
            let site = SiteParameters { azimuth_deg: az, ..optimal_site() };
            assert!(model.estimate_annual_yield(&layout, &site).unwrap() < best, "azimuth {az}");
        }
    }

    #[test]
    fn shading_scales_linearly() {
        let model = synthetic();
        let layout = model.size_system(50.0, &optimal_site()).unwrap();
        let shaded = SiteParameters { shading_loss: 0.25, ..optimal_site() };
        let kwh = model.estimate_annual_yield(&layout, &shaded).unwrap();
        assert!((kwh - 9680.0 * 0.75).abs() < 1e-6);
    }

    #[test]
    fn unresolvable_location_then_fallback() {
        let model = synthetic();
        let layout = model.size_system(50.0, &optimal_site()).unwrap();
        let lost = SiteParameters {
            location: GeoPoint::new(-10.0, 150.0),
            ..optimal_site()
        };
        let err = model.estimate_annual_yield(&layout, &lost).unwrap_err();
        assert_eq!(err.kind(), "unknown_irradiance_region");

        let recovered = lost.with_irradiance_class(model.irradiance.default_class.clone());
        assert!(model.estimate_annual_yield(&layout, &recovered).unwrap() > 0.0);
    }

    #[test]
    fn negative_area_is_rejected() {
        let err = synthetic().size_system(-1.0, &optimal_site()).unwrap_err();
        assert_eq!(err.kind(), "degenerate_area");
    }

    #[test]
    fn invalid_site_is_rejected_before_sizing() {
        let site = SiteParameters { tilt_deg: f64::NAN, ..optimal_site() };
        let err = synthetic().evaluate(50.0, &site).unwrap_err();
        assert_eq!(err.kind(), "invalid_site_parameter");
    }
}
