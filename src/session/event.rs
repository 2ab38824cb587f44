use serde::{Deserialize, Serialize};

use super::controller::Phase;
use crate::error::CalcError;
use crate::finance::{BatteryOption, CostInputs};
use crate::geometry::{GeoPoint, RoofPolygon};
use crate::pv::SiteParameters;

/// User action fed into [`CalculatorSession::apply`](super::CalculatorSession::apply).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    AddPoint { point: GeoPoint },
    MovePoint { index: usize, to: GeoPoint },
    RemovePoint { index: usize },
    ReplaceOutline { outline: RoofPolygon },
    /// Overrides the derived site; `None` restores the derived defaults.
    SetSite { site: Option<SiteParameters> },
    SetCosts { costs: CostInputs },
    SetBattery { battery: Option<BatteryOption> },
    ConfirmRoof,
    Redraw,
    Calculate,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddPoint { .. } => "add_point",
            Self::MovePoint { .. } => "move_point",
            Self::RemovePoint { .. } => "remove_point",
            Self::ReplaceOutline { .. } => "replace_outline",
            Self::SetSite { .. } => "set_site",
            Self::SetCosts { .. } => "set_costs",
            Self::SetBattery { .. } => "set_battery",
            Self::ConfirmRoof => "confirm_roof",
            Self::Redraw => "redraw",
            Self::Calculate => "calculate",
        }
    }

    /// Whether the event edits the roof outline.
    pub fn edits_outline(&self) -> bool {
        matches!(
            self,
            Self::AddPoint { .. } | Self::MovePoint { .. } | Self::RemovePoint { .. } | Self::ReplaceOutline { .. }
        )
    }

    /// Whether the event edits site, cost or battery inputs.
    pub fn edits_inputs(&self) -> bool {
        matches!(self, Self::SetSite { .. } | Self::SetCosts { .. } | Self::SetBattery { .. })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error("cannot {event} while {phase}")]
    InvalidTransition { event: &'static str, phase: Phase },

    #[error("point index {index} is out of range for an outline of {len} points")]
    PointIndexOutOfRange { index: usize, len: usize },
}

impl SessionError {
    /// Stable key for UI message lookup.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Calc(e) => e.kind(),
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::PointIndexOutOfRange { .. } => "point_index_out_of_range",
        }
    }
}
