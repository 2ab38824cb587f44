//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use rust_decimal_macros::dec;
use solar_quote::config::CalculatorConfig;
use solar_quote::finance::CostInputs;
use solar_quote::geometry::{GeoPoint, LocalFrame, RoofPolygon};
use solar_quote::pv::SiteParameters;

/// Rectangle `east_m` × `north_m` with its south-west corner at `origin`,
/// drawn counter-clockwise.
pub fn rect_roof(origin: GeoPoint, east_m: f64, north_m: f64) -> RoofPolygon {
    let f = LocalFrame::new(origin);
    RoofPolygon::new(vec![
        f.unproject(0.0, 0.0),
        f.unproject(east_m, 0.0),
        f.unproject(east_m, north_m),
        f.unproject(0.0, north_m),
    ])
}

/// 10 m × 5 m roof in central Germany.
pub fn fifty_m2_roof() -> RoofPolygon {
    rect_roof(GeoPoint::new(50.0, 10.0), 10.0, 5.0)
}

/// Baseline config with a flat 1100 kWh/kWp central Europe class and a
/// fixed 30° optimum, so south-facing 30° panels lose nothing.
pub fn synthetic_config() -> CalculatorConfig {
    let mut config = CalculatorConfig::baseline();
    config.orientation.optimal_tilt_deg = Some(30.0);
    for class in &mut config.irradiance.classes {
        if class.name == "central_europe" {
            class.kwh_per_kwp = 1100.0;
        }
    }
    config
}

/// South-facing 30° site at the roof location, unshaded.
pub fn optimal_site() -> SiteParameters {
    SiteParameters {
        tilt_deg: 30.0,
        azimuth_deg: 180.0,
        shading_loss: 0.0,
        location: GeoPoint::new(50.0, 10.0),
        irradiance_class: None,
    }
}

/// 1250/kWp plus 1000 fixed, 0.30 flat tariff, 0.08 export, 30 % self-use.
pub fn flat_tariff_costs() -> CostInputs {
    CostInputs {
        cost_per_kwp: dec!(1250),
        fixed_costs: dec!(1000),
        electricity_price: dec!(0.30),
        export_price: dec!(0.08),
        self_consumption_ratio: dec!(0.30),
        price_escalation: dec!(0),
        lifetime_years: 20,
        ..CostInputs::default()
    }
}
