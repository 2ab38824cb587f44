use std::fmt;

use serde::{Deserialize, Serialize};

use super::event::{SessionError, SessionEvent};
use crate::config::CalculatorConfig;
use crate::finance::CostInputs;
use crate::geometry::{self, RoofGeometry, RoofPolygon};
use crate::pv::SiteParameters;
use crate::quote::{Quote, calculate_for_roof};

/// Payload-free phase tag for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Drawing,
    Configuring,
    Results,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Drawing => "drawing",
            Self::Configuring => "configuring",
            Self::Results => "results",
        })
    }
}

/// Session state with the data each phase owns.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Outline is being edited.
    Drawing,
    /// Outline confirmed; site and cost inputs are being edited.
    Configuring { roof: RoofGeometry },
    /// A quote for the current inputs is available.
    Results { roof: RoofGeometry, quote: Box<Quote> },
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Drawing => Phase::Drawing,
            Self::Configuring { .. } => Phase::Configuring,
            Self::Results { .. } => Phase::Results,
        }
    }
}

/// One user's calculator session.
///
/// Inputs (outline, site override, costs) live beside the state; derived
/// values only exist inside [`SessionState`] and are dropped by every
/// transition that changes an input they depend on.
#[derive(Debug, Clone)]
pub struct CalculatorSession {
    config: CalculatorConfig,
    outline: RoofPolygon,
    site: Option<SiteParameters>,
    costs: CostInputs,
    state: SessionState,
}

impl CalculatorSession {
    /// Starts an empty session in [`Phase::Drawing`] with the configured
    /// default costs.
    pub fn new(config: CalculatorConfig) -> Self {
        let costs = config.costs.clone();
        Self {
            config,
            outline: RoofPolygon::default(),
            site: None,
            costs,
            state: SessionState::Drawing,
        }
    }

    pub(crate) fn from_parts(
        config: CalculatorConfig,
        outline: RoofPolygon,
        site: Option<SiteParameters>,
        costs: CostInputs,
    ) -> Self {
        let mut session = Self {
            config,
            outline,
            site,
            costs,
            state: SessionState::Drawing,
        };
        if let Ok(roof) = geometry::validate(&session.outline, session.config.min_roof_area_m2()) {
            session.state = SessionState::Configuring { roof };
        }
        session
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn outline(&self) -> &RoofPolygon {
        &self.outline
    }

    pub fn costs(&self) -> &CostInputs {
        &self.costs
    }

    /// The explicit site override, if any.
    pub fn site_override(&self) -> Option<&SiteParameters> {
        self.site.as_ref()
    }

    /// Site a calculation would use: the override, or defaults derived from
    /// the confirmed roof. `None` while drawing without an override.
    pub fn effective_site(&self) -> Option<SiteParameters> {
        if let Some(site) = &self.site {
            return Some(site.clone());
        }
        match &self.state {
            SessionState::Drawing => None,
            SessionState::Configuring { roof } | SessionState::Results { roof, .. } => Some(
                SiteParameters::for_roof(&self.outline, roof, &self.config.orientation),
            ),
        }
    }

    /// The effective site pinned to the configured fallback irradiance
    /// class, for retrying after [`crate::CalcError::UnknownIrradianceRegion`].
    pub fn fallback_site(&self) -> Option<SiteParameters> {
        self.effective_site()
            .map(|s| s.with_irradiance_class(self.config.irradiance.default_class.clone()))
    }

    pub fn roof(&self) -> Option<&RoofGeometry> {
        match &self.state {
            SessionState::Drawing => None,
            SessionState::Configuring { roof } | SessionState::Results { roof, .. } => Some(roof),
        }
    }

    /// The current quote. Only present in [`Phase::Results`].
    pub fn results(&self) -> Option<&Quote> {
        match &self.state {
            SessionState::Results { quote, .. } => Some(quote.as_ref()),
            _ => None,
        }
    }

    /// Applies one event and returns the resulting phase.
    ///
    /// On error the session is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Calc`] when confirming or calculating fails.
    /// - [`SessionError::InvalidTransition`] for events the current phase
    ///   does not accept.
    /// - [`SessionError::PointIndexOutOfRange`] for edits of a missing point.
    pub fn apply(&mut self, event: SessionEvent) -> Result<Phase, SessionError> {
        let from = self.phase();
        let name = event.name();

        let next = self.transition(event).inspect_err(|e| {
            tracing::debug!(event = name, phase = %from, error = %e, "event rejected");
        })?;
        self.state = next;

        let to = self.phase();
        if from != to {
            tracing::debug!(event = name, %from, %to, "phase changed");
        }
        if let Some(quote) = self.results() {
            tracing::info!(
                panels = quote.sizing.panel_count,
                annual_yield_kwh = quote.sizing.annual_yield_kwh,
                payback = ?quote.projection.payback,
                "quote ready"
            );
        }
        Ok(to)
    }

    fn transition(&mut self, event: SessionEvent) -> Result<SessionState, SessionError> {
        let phase = self.phase();

        if event.edits_outline() {
            self.outline = self.edited_outline(event)?;
            return Ok(SessionState::Drawing);
        }

        if event.edits_inputs() {
            match event {
                SessionEvent::SetSite { site } => {
                    if let Some(s) = &site {
                        s.validate()?;
                    }
                    self.site = site;
                }
                SessionEvent::SetCosts { costs } => {
                    costs.validate()?;
                    self.costs = costs;
                }
                SessionEvent::SetBattery { battery } => {
                    let costs = self.costs.clone().with_battery(battery);
                    costs.validate()?;
                    self.costs = costs;
                }
                _ => {}
            }
            return Ok(match &self.state {
                SessionState::Drawing => SessionState::Drawing,
                SessionState::Configuring { roof } | SessionState::Results { roof, .. } => {
                    SessionState::Configuring { roof: roof.clone() }
                }
            });
        }

        match (event, &self.state) {
            (SessionEvent::ConfirmRoof, SessionState::Drawing) => {
                let roof = geometry::validate(&self.outline, self.config.min_roof_area_m2())?;
                Ok(SessionState::Configuring { roof })
            }
            (SessionEvent::Redraw, _) => Ok(SessionState::Drawing),
            (
                SessionEvent::Calculate,
                SessionState::Configuring { roof } | SessionState::Results { roof, .. },
            ) => {
                let quote = calculate_for_roof(
                    &self.outline,
                    roof.clone(),
                    self.site.as_ref(),
                    &self.costs,
                    &self.config,
                )?;
                Ok(SessionState::Results {
                    roof: roof.clone(),
                    quote: Box::new(quote),
                })
            }
            (event, _) => Err(SessionError::InvalidTransition {
                event: event.name(),
                phase,
            }),
        }
    }

    fn edited_outline(&self, event: SessionEvent) -> Result<RoofPolygon, SessionError> {
        let len = self.outline.len();
        let out_of_range = |index| SessionError::PointIndexOutOfRange { index, len };
        match event {
            SessionEvent::AddPoint { point } => Ok(self.outline.with_point_added(point)),
            SessionEvent::MovePoint { index, to } => self
                .outline
                .with_point_moved(index, to)
                .ok_or_else(|| out_of_range(index)),
            SessionEvent::RemovePoint { index } => self
                .outline
                .with_point_removed(index)
                .ok_or_else(|| out_of_range(index)),
            SessionEvent::ReplaceOutline { outline } => Ok(outline),
            other => Err(SessionError::InvalidTransition {
                event: other.name(),
                phase: self.phase(),
            }),
        }
    }
}
