use serde::{Deserialize, Serialize};

use super::site::SiteParameters;
use crate::error::CalcError;
use crate::geometry::GeoPoint;

/// Latitude/longitude bounding box in degrees (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bounds {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl Bounds {
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lng >= self.west && p.lng <= self.east
    }
}

/// One irradiance bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IrradianceClass {
    /// Lookup key, e.g. `"central_europe"`.
    pub name: String,
    /// Annual specific yield at optimal orientation (kWh per kWp per year).
    pub kwh_per_kwp: f64,
    /// Region covered by this class. Classes without bounds can only be
    /// selected by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

/// Irradiance lookup table with a designated fallback class.
///
/// Coordinate lookups return the first class, in table order, whose bounds
/// contain the point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IrradianceTable {
    /// Class the UI falls back to when a location cannot be resolved.
    pub default_class: String,
    pub classes: Vec<IrradianceClass>,
}

impl Default for IrradianceTable {
    fn default() -> Self {
        let class = |name: &str, kwh_per_kwp: f64, south, north, west, east| IrradianceClass {
            name: name.to_string(),
            kwh_per_kwp,
            bounds: Some(Bounds {
                south,
                north,
                west,
                east,
            }),
        };
        Self {
            default_class: "central_europe".to_string(),
            classes: vec![
                class("northern_europe", 850.0, 55.0, 72.0, -25.0, 45.0),
                class("central_europe", 1000.0, 45.0, 55.0, -10.0, 30.0),
                class("southern_europe", 1350.0, 35.0, 45.0, -10.0, 30.0),
                class("mena", 1700.0, 15.0, 35.0, -20.0, 60.0),
            ],
        }
    }
}

impl IrradianceTable {
    pub fn by_name(&self, name: &str) -> Option<&IrradianceClass> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// First class whose bounds contain `p`.
    pub fn locate(&self, p: GeoPoint) -> Option<&IrradianceClass> {
        self.classes
            .iter()
            .find(|c| c.bounds.is_some_and(|b| b.contains(p)))
    }

    /// The fallback class, if `default_class` names an existing entry.
    pub fn fallback(&self) -> Option<&IrradianceClass> {
        self.by_name(&self.default_class)
    }

    /// Resolves the class for a site: the explicit class name when given,
    /// otherwise the class covering the site location.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::UnknownIrradianceRegion`] when nothing matches.
    /// Callers are expected to retry with [`IrradianceTable::fallback`].
    pub fn resolve(&self, site: &SiteParameters) -> Result<&IrradianceClass, CalcError> {
        match &site.irradiance_class {
            Some(name) => self
                .by_name(name)
                .ok_or_else(|| CalcError::UnknownIrradianceRegion {
                    key: format!("class \"{name}\""),
                }),
            None => self
                .locate(site.location)
                .ok_or_else(|| CalcError::UnknownIrradianceRegion {
                    key: format!("location {:.5}, {:.5}", site.location.lat, site.location.lng),
                }),
        }
    }
}
