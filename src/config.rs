//! TOML-based calculator configuration and preset definitions.

use std::fs;
use std::path::Path;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::finance::CostInputs;
use crate::pv::{Bounds, IrradianceClass, IrradianceTable, OrientationModel, PanelSpec, YieldModel};

/// Top-level calculator configuration parsed from TOML.
///
/// All sections have defaults matching the baseline preset. Load from TOML
/// with [`CalculatorConfig::from_toml_file`] or use
/// [`CalculatorConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Panel footprint, rating and packing efficiency.
    #[serde(default)]
    pub panel: PanelSpec,
    /// Orientation derating and default roof pitch.
    #[serde(default)]
    pub orientation: OrientationModel,
    /// Irradiance classes and the fallback class.
    #[serde(default)]
    pub irradiance: IrradianceTable,
    /// Cost assumptions a new session starts from.
    #[serde(default)]
    pub costs: CostInputs,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"panel.footprint_m2"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl CalculatorConfig {
    /// Returns the baseline preset: European irradiance classes and tariffs.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the sunbelt preset: US southern irradiance classes with
    /// US-style tariffs and 25-year financing.
    pub fn sunbelt() -> Self {
        Self {
            panel: PanelSpec {
                footprint_m2: 1.95,
                rated_kwp: 0.43,
                packing_efficiency: 0.75,
            },
            orientation: OrientationModel {
                default_tilt_deg: 25.0,
                ..OrientationModel::default()
            },
            irradiance: IrradianceTable {
                default_class: "us_southwest".to_string(),
                classes: vec![
                    IrradianceClass {
                        name: "us_southwest".to_string(),
                        kwh_per_kwp: 1650.0,
                        bounds: Some(Bounds {
                            south: 31.0,
                            north: 37.0,
                            west: -120.0,
                            east: -103.0,
                        }),
                    },
                    IrradianceClass {
                        name: "us_southeast".to_string(),
                        kwh_per_kwp: 1400.0,
                        bounds: Some(Bounds {
                            south: 25.0,
                            north: 36.0,
                            west: -103.0,
                            east: -75.0,
                        }),
                    },
                ],
            },
            costs: CostInputs {
                cost_per_kwp: dec!(1100),
                fixed_costs: dec!(2000),
                subsidy: dec!(1500),
                electricity_price: dec!(0.16),
                export_price: dec!(0.05),
                self_consumption_ratio: dec!(0.45),
                price_escalation: dec!(0.03),
                lifetime_years: 25,
                annual_degradation: dec!(0.005),
                ..CostInputs::default()
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "sunbelt"];

    /// Loads a configuration from a named preset.
    ///
    /// # Arguments
    ///
    /// * `name` - One of [`Self::PRESETS`]
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "sunbelt" => Ok(Self::sunbelt()),
            _ => Err(ConfigError::new(
                "preset",
                format!("unknown preset \"{name}\", available: {}", Self::PRESETS.join(", ")),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file; missing sections take their defaults
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Yield model built from the panel, orientation and irradiance sections.
    pub fn yield_model(&self) -> YieldModel {
        YieldModel::new(self.panel.clone(), self.orientation.clone(), self.irradiance.clone())
    }

    /// Smallest roof area accepted when confirming an outline.
    pub fn min_roof_area_m2(&self) -> f64 {
        self.panel.min_roof_area_m2()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// # Returns
    ///
    /// Every violation found, with `field` as a dotted path such as
    /// `costs.electricity_price`. Empty if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let p = &self.panel;
        if !(p.footprint_m2.is_finite() && p.footprint_m2 > 0.0) {
            errors.push(ConfigError::new("panel.footprint_m2", "must be > 0"));
        }
        if !(p.rated_kwp.is_finite() && p.rated_kwp > 0.0) {
            errors.push(ConfigError::new("panel.rated_kwp", "must be > 0"));
        }
        if !(p.packing_efficiency > 0.0 && p.packing_efficiency <= 1.0) {
            errors.push(ConfigError::new("panel.packing_efficiency", "must be in (0.0, 1.0]"));
        }

        let o = &self.orientation;
        if o.optimal_tilt_deg.is_some_and(|t| !(0.0..=90.0).contains(&t)) {
            errors.push(ConfigError::new("orientation.optimal_tilt_deg", "must be in [0, 90]"));
        }
        if !(o.tilt_loss > 0.0 && o.tilt_loss <= 1.0) {
            errors.push(ConfigError::new("orientation.tilt_loss", "must be in (0.0, 1.0]"));
        }
        if !(o.azimuth_loss > 0.0 && o.azimuth_loss <= 1.0) {
            errors.push(ConfigError::new("orientation.azimuth_loss", "must be in (0.0, 1.0]"));
        }
        if !(0.0..=90.0).contains(&o.default_tilt_deg) {
            errors.push(ConfigError::new("orientation.default_tilt_deg", "must be in [0, 90]"));
        }

        let irr = &self.irradiance;
        if irr.classes.is_empty() {
            errors.push(ConfigError::new("irradiance.classes", "must not be empty"));
        }
        if irr.fallback().is_none() {
            errors.push(ConfigError::new(
                "irradiance.default_class",
                format!("\"{}\" is not one of the configured classes", irr.default_class),
            ));
        }
        for (i, class) in irr.classes.iter().enumerate() {
            if !(class.kwh_per_kwp.is_finite() && class.kwh_per_kwp > 0.0) {
                errors.push(ConfigError::new(
                    format!("irradiance.classes[{i}].kwh_per_kwp"),
                    "must be > 0",
                ));
            }
            if irr.classes[..i].iter().any(|c| c.name == class.name) {
                errors.push(ConfigError::new(
                    format!("irradiance.classes[{i}].name"),
                    format!("duplicate class \"{}\"", class.name),
                ));
            }
            if class.bounds.is_some_and(|b| b.south > b.north || b.west > b.east) {
                errors.push(ConfigError::new(
                    format!("irradiance.classes[{i}].bounds"),
                    "south must be <= north and west <= east",
                ));
            }
        }

        if let Err(e) = self.costs.validate() {
            let field = match &e {
                CalcError::InvalidCostInput { field, .. } => format!("costs.{field}"),
                _ => "costs".to_string(),
            };
            errors.push(ConfigError::new(field, e.to_string()));
        }

        errors
    }
}
