//! TOML session input for the command line.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::event::SessionEvent;
use crate::config::ConfigError;
use crate::finance::CostInputs;
use crate::geometry::RoofPolygon;
use crate::pv::SiteParameters;

/// A roof outline with optional site and cost overrides.
///
/// ```toml
/// outline = [
///     { lat = 48.13710, lng = 11.57530 },
///     { lat = 48.13710, lng = 11.57543 },
///     { lat = 48.13716, lng = 11.57543 },
/// ]
///
/// [costs]
/// electricity_price = "0.32"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionFile {
    pub outline: RoofPolygon,
    #[serde(default)]
    pub site: Option<SiteParameters>,
    /// Replaces the configured default costs wholesale; missing fields take
    /// the built-in defaults.
    #[serde(default)]
    pub costs: Option<CostInputs>,
}

impl SessionFile {
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::new("session", format!("cannot read \"{}\": {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("session", e.to_string()))
    }

    /// Events that load this file into a fresh session and calculate.
    pub fn into_events(self) -> Vec<SessionEvent> {
        let mut events = vec![SessionEvent::ReplaceOutline { outline: self.outline }];
        if let Some(site) = self.site {
            events.push(SessionEvent::SetSite { site: Some(site) });
        }
        if let Some(costs) = self.costs {
            events.push(SessionEvent::SetCosts { costs });
        }
        events.push(SessionEvent::ConfirmRoof);
        events.push(SessionEvent::Calculate);
        events
    }
}
