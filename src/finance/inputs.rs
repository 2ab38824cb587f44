//! Cost and tariff assumptions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// Longest projection accepted, in years.
pub const MAX_LIFETIME_YEARS: u32 = 60;

/// Optional home battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryOption {
    /// Usable storage (kWh).
    pub capacity_kwh: Decimal,
    /// Installed cost, added to the upfront cost.
    pub cost: Decimal,
    /// Full charge/discharge cycles per year that shift export into self-use.
    #[serde(default = "default_cycles")]
    pub cycles_per_year: Decimal,
}

fn default_cycles() -> Decimal {
    dec!(250)
}

/// Installation cost, tariffs and projection horizon.
///
/// Ratios and rates are fractions (`0.3` = 30 %).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostInputs {
    /// Installation cost per kWp of capacity.
    pub cost_per_kwp: Decimal,
    /// Fixed costs independent of system size.
    pub fixed_costs: Decimal,
    pub subsidy: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<BatteryOption>,
    /// Purchase price per kWh.
    pub electricity_price: Decimal,
    /// Feed-in price per exported kWh.
    pub export_price: Decimal,
    /// Share of production consumed on site without a battery.
    pub self_consumption_ratio: Decimal,
    /// Annual escalation applied to both prices.
    pub price_escalation: Decimal,
    pub lifetime_years: u32,
    /// Annual loss of panel output.
    pub annual_degradation: Decimal,
}

impl Default for CostInputs {
    fn default() -> Self {
        Self {
            cost_per_kwp: dec!(1300),
            fixed_costs: dec!(1500),
            subsidy: Decimal::ZERO,
            battery: None,
            electricity_price: dec!(0.35),
            export_price: dec!(0.08),
            self_consumption_ratio: dec!(0.30),
            price_escalation: dec!(0.02),
            lifetime_years: 20,
            annual_degradation: Decimal::ZERO,
        }
    }
}

impl CostInputs {
    /// Returns a copy with `battery` replaced.
    pub fn with_battery(mut self, battery: Option<BatteryOption>) -> Self {
        self.battery = battery;
        self
    }

    /// # Errors
    ///
    /// [`CalcError::InvalidCostInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CalcError> {
        let non_negative = [
            ("cost_per_kwp", self.cost_per_kwp),
            ("fixed_costs", self.fixed_costs),
            ("subsidy", self.subsidy),
            ("electricity_price", self.electricity_price),
            ("export_price", self.export_price),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(CalcError::cost(field, format!("{value} must not be negative")));
            }
        }

        if let Some(battery) = &self.battery {
            let battery_fields = [
                ("battery.capacity_kwh", battery.capacity_kwh),
                ("battery.cost", battery.cost),
                ("battery.cycles_per_year", battery.cycles_per_year),
            ];
            for (field, value) in battery_fields {
                if value < Decimal::ZERO {
                    return Err(CalcError::cost(field, format!("{value} must not be negative")));
                }
            }
        }

        if self.self_consumption_ratio < Decimal::ZERO || self.self_consumption_ratio > Decimal::ONE {
            return Err(CalcError::cost(
                "self_consumption_ratio",
                format!("{} is outside 0..=1", self.self_consumption_ratio),
            ));
        }
        if self.price_escalation <= Decimal::NEGATIVE_ONE {
            return Err(CalcError::cost(
                "price_escalation",
                format!("{} would make prices non-positive", self.price_escalation),
            ));
        }
        if self.annual_degradation < Decimal::ZERO || self.annual_degradation >= Decimal::ONE {
            return Err(CalcError::cost(
                "annual_degradation",
                format!("{} is outside 0..1", self.annual_degradation),
            ));
        }
        if self.lifetime_years == 0 || self.lifetime_years > MAX_LIFETIME_YEARS {
            return Err(CalcError::cost(
                "lifetime_years",
                format!("{} is outside 1..={MAX_LIFETIME_YEARS}", self.lifetime_years),
            ));
        }
        Ok(())
    }
}
