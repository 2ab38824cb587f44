use serde::{Deserialize, Serialize};

/// Standard panel and packing assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelSpec {
    /// Module footprint (m²).
    pub footprint_m2: f64,
    /// Module rated output (kWp).
    pub rated_kwp: f64,
    /// Fraction of roof area usable after setbacks and obstructions.
    pub packing_efficiency: f64,
}

impl Default for PanelSpec {
    fn default() -> Self {
        Self {
            footprint_m2: 1.8,
            rated_kwp: 0.4,
            packing_efficiency: 0.8,
        }
    }
}

impl PanelSpec {
    /// Smallest roof that fits one panel.
    pub fn min_roof_area_m2(&self) -> f64 {
        self.footprint_m2 / self.packing_efficiency
    }

    /// Largest whole number of panels that fits in `usable_m2`.
    pub fn panels_for(&self, usable_m2: f64) -> u32 {
        if !(usable_m2.is_finite() && usable_m2 > 0.0) {
            return 0;
        }
        let mut count = (usable_m2 / self.footprint_m2).floor().min(u32::MAX as f64) as u32;
        // floor of the quotient can land one above the exact answer
        while count > 0 && f64::from(count) * self.footprint_m2 > usable_m2 {
            count -= 1;
        }
        count
    }
}

/// Panel array that fits a roof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayLayout {
    pub roof_area_m2: f64,
    pub usable_area_m2: f64,
    pub panel_count: u32,
    pub capacity_kwp: f64,
}

/// Sized system with its estimated production.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSizing {
    pub roof_area_m2: f64,
    pub usable_area_m2: f64,
    pub panel_count: u32,
    pub capacity_kwp: f64,
    /// Estimated first-year production (kWh).
    pub annual_yield_kwh: f64,
    /// Annual kWh per installed kWp after derating.
    pub specific_yield_kwh_per_kwp: f64,
    /// Irradiance class the estimate used.
    pub irradiance_class: String,
    /// Combined orientation derating, 1.0 at the optimum.
    pub orientation_factor: f64,
}
