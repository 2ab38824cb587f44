//! Multi-year cash-flow projection in fixed-point currency.

pub mod inputs;
pub mod projection;

pub use inputs::{BatteryOption, CostInputs};
pub use projection::{CashFlowProjection, Payback, YearRecord, project_cash_flow, round_energy, round_money};
