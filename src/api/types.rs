//! API request, response and query types.
//!
//! Money fields in [`CashflowRecord`] use the CSV export's rounding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::finance::{CostInputs, YearRecord, round_energy, round_money};
use crate::geometry::RoofPolygon;
use crate::pv::SiteParameters;

/// One projected year, rounded for display.
#[derive(Debug, Serialize, Deserialize)]
pub struct CashflowRecord {
    pub year: u32,
    pub energy_kwh: Decimal,
    pub self_consumption_value: Decimal,
    pub export_revenue: Decimal,
    pub savings: Decimal,
    pub cumulative_net_cash_flow: Decimal,
}

impl From<&YearRecord> for CashflowRecord {
    fn from(r: &YearRecord) -> Self {
        Self {
            year: r.year,
            energy_kwh: round_energy(r.energy_kwh),
            self_consumption_value: round_money(r.self_consumption_value),
            export_revenue: round_money(r.export_revenue),
            savings: round_money(r.savings),
            cumulative_net_cash_flow: round_money(r.cumulative_net_cash_flow),
        }
    }
}

/// Optional inclusive year range for the cash-flow endpoint.
#[derive(Debug, Deserialize)]
pub struct CashflowQuery {
    pub from: Option<u32>,
    pub to: Option<u32>,
}

/// Body of `POST /calculate`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculateRequest {
    pub outline: RoofPolygon,
    /// Derived from the outline when absent.
    #[serde(default)]
    pub site: Option<SiteParameters>,
    /// Configured defaults when absent.
    #[serde(default)]
    pub costs: Option<CostInputs>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Stable error key for calculator failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}
