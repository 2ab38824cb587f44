//! Geometry → yield → finance pipeline.

use serde::{Deserialize, Serialize};

use crate::config::CalculatorConfig;
use crate::error::CalcError;
use crate::finance::{CashFlowProjection, CostInputs, project_cash_flow};
use crate::geometry::{self, RoofGeometry, RoofPolygon};
use crate::pv::{SiteParameters, SystemSizing};

/// Immutable result of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub geometry: RoofGeometry,
    /// Site the yield was estimated for, after defaults were filled in.
    pub site: SiteParameters,
    pub sizing: SystemSizing,
    pub projection: CashFlowProjection,
}

/// Runs the full calculation for one roof.
///
/// When `site` is `None` the site is derived from the outline with
/// [`SiteParameters::for_roof`].
///
/// # Errors
///
/// The first [`CalcError`] raised by any stage, unchanged.
pub fn calculate(
    outline: &RoofPolygon,
    site: Option<&SiteParameters>,
    costs: &CostInputs,
    config: &CalculatorConfig,
) -> Result<Quote, CalcError> {
    let roof = geometry::validate(outline, config.min_roof_area_m2())?;
    calculate_for_roof(outline, roof, site, costs, config)
}

/// Like [`calculate`], but a location outside every irradiance class is
/// quoted with the configured default class instead of failing.
///
/// # Errors
///
/// Any other [`CalcError`], unchanged.
pub fn calculate_with_fallback(
    outline: &RoofPolygon,
    site: Option<&SiteParameters>,
    costs: &CostInputs,
    config: &CalculatorConfig,
) -> Result<Quote, CalcError> {
    let roof = geometry::validate(outline, config.min_roof_area_m2())?;
    match calculate_for_roof(outline, roof.clone(), site, costs, config) {
        Err(CalcError::UnknownIrradianceRegion { key }) => {
            let fallback = &config.irradiance.default_class;
            tracing::warn!(
                %key,
                %fallback,
                "location outside configured regions, using fallback irradiance class"
            );
            let site = site
                .cloned()
                .unwrap_or_else(|| SiteParameters::for_roof(outline, &roof, &config.orientation))
                .with_irradiance_class(fallback.clone());
            calculate_for_roof(outline, roof, Some(&site), costs, config)
        }
        other => other,
    }
}

pub(crate) fn calculate_for_roof(
    outline: &RoofPolygon,
    roof: RoofGeometry,
    site: Option<&SiteParameters>,
    costs: &CostInputs,
    config: &CalculatorConfig,
) -> Result<Quote, CalcError> {
    let site = match site {
        Some(s) => s.clone(),
        None => SiteParameters::for_roof(outline, &roof, &config.orientation),
    };
    let sizing = config.yield_model().evaluate(roof.area_m2, &site)?;
    let projection = project_cash_flow(&sizing, costs)?;

    tracing::debug!(
        area_m2 = roof.area_m2,
        capacity_kwp = sizing.capacity_kwp,
        payback = ?projection.payback,
        "quote computed"
    );

    Ok(Quote {
        geometry: roof,
        site,
        sizing,
        projection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeoPoint, LocalFrame};

    fn munich_roof() -> RoofPolygon {
        let f = LocalFrame::new(GeoPoint::new(48.137, 11.575));
        RoofPolygon::new(vec![
            f.unproject(0.0, 0.0),
            f.unproject(10.0, 0.0),
            f.unproject(10.0, 6.0),
            f.unproject(0.0, 6.0),
        ])
    }

    #[test]
    fn derives_site_from_outline() {
        let config = CalculatorConfig::baseline();
        let quote = calculate(&munich_roof(), None, &config.costs, &config).unwrap();
        assert!((quote.site.azimuth_deg - 180.0).abs() < 0.01);
        assert_eq!(quote.sizing.irradiance_class, "central_europe");
        assert_eq!(quote.sizing.panel_count, 26);
        assert_eq!(quote.projection.years.len(), 20);
    }

    #[test]
    fn geometry_errors_pass_through() {
        let config = CalculatorConfig::baseline();
        let two = RoofPolygon::new(munich_roof().points()[..2].to_vec());
        assert_eq!(
            calculate(&two, None, &config.costs, &config),
            Err(CalcError::InsufficientVertices { found: 2 })
        );
    }

    #[test]
    fn fallback_quotes_unknown_locations_with_default_class() {
        let config = CalculatorConfig::baseline();
        let f = LocalFrame::new(GeoPoint::new(-33.9, 18.4));
        let cape_town = RoofPolygon::new(vec![
            f.unproject(0.0, 0.0),
            f.unproject(10.0, 0.0),
            f.unproject(10.0, 6.0),
            f.unproject(0.0, 6.0),
        ]);

        let err = calculate(&cape_town, None, &config.costs, &config).unwrap_err();
        assert_eq!(err.kind(), "unknown_irradiance_region");

        let quote = calculate_with_fallback(&cape_town, None, &config.costs, &config).unwrap();
        assert_eq!(quote.sizing.irradiance_class, "central_europe");
        assert_eq!(quote.site.irradiance_class.as_deref(), Some("central_europe"));
        let az = quote.site.azimuth_normalized();
        assert!(az.min(360.0 - az) < 0.01, "southern roof should face north, got {az}");
    }

    #[test]
    fn fallback_keeps_other_errors() {
        let config = CalculatorConfig::baseline();
        let two = RoofPolygon::new(munich_roof().points()[..2].to_vec());
        assert_eq!(
            calculate_with_fallback(&two, None, &config.costs, &config),
            Err(CalcError::InsufficientVertices { found: 2 })
        );
    }

    #[test]
    fn cost_errors_pass_through() {
        let config = CalculatorConfig::baseline();
        let costs = CostInputs {
            lifetime_years: 0,
            ..config.costs.clone()
        };
        let err = calculate(&munich_roof(), None, &costs, &config).unwrap_err();
        assert_eq!(err.kind(), "invalid_cost_input");
    }
}
