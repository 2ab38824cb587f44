use serde::{Deserialize, Serialize};

use super::controller::{CalculatorSession, Phase};
use crate::config::CalculatorConfig;
use crate::finance::CostInputs;
use crate::geometry::RoofPolygon;
use crate::pv::SiteParameters;
use crate::quote::Quote;

/// Serializable copy of a session's inputs and its last quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub outline: RoofPolygon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<SiteParameters>,
    pub costs: CostInputs,
    /// Quote current when the snapshot was taken. Informational only;
    /// restoring never trusts it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
}

impl SessionSnapshot {
    /// # Errors
    ///
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// # Errors
    ///
    /// Propagates `serde_json` failures, including unknown fields.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl CalculatorSession {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            outline: self.outline().clone(),
            site: self.site_override().cloned(),
            costs: self.costs().clone(),
            quote: self.results().cloned(),
        }
    }

    /// Rebuilds a session from a snapshot.
    ///
    /// The session resumes in [`Phase::Configuring`] when the outline still
    /// validates under `config`, otherwise in [`Phase::Drawing`]. A stored
    /// quote is not reinstated; apply `Calculate` to recompute it.
    pub fn restore(config: CalculatorConfig, snapshot: SessionSnapshot) -> Self {
        let session = Self::from_parts(config, snapshot.outline, snapshot.site, snapshot.costs);
        tracing::debug!(from = %snapshot.phase, to = %session.phase(), "session restored");
        session
    }
}
