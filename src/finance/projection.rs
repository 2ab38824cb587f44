use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::CostInputs;
use crate::error::CalcError;
use crate::pv::SystemSizing;

/// Decimal places kept when energy enters the projection (1 Wh).
const ENERGY_DP: u32 = 3;
/// Decimal places kept for capacity (0.1 W).
const CAPACITY_DP: u32 = 4;

/// One projected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// 1-based year index.
    pub year: u32,
    pub energy_kwh: Decimal,
    pub self_consumption_value: Decimal,
    pub export_revenue: Decimal,
    /// `self_consumption_value + export_revenue`.
    pub savings: Decimal,
    pub cumulative_net_cash_flow: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "year", rename_all = "snake_case")]
pub enum Payback {
    /// First year whose cumulative net cash flow is non-negative. Year 0
    /// means the upfront cost was already covered.
    Year(u32),
    /// Cumulative cash flow stays negative for the whole lifetime.
    NotReached,
}

impl Payback {
    pub fn year(self) -> Option<u32> {
        match self {
            Self::Year(y) => Some(y),
            Self::NotReached => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowProjection {
    /// Installation, fixed and battery cost minus subsidy. May be negative.
    pub upfront_net_cost: Decimal,
    /// Self-consumption ratio after the battery uplift, at most 1.
    pub effective_self_consumption: Decimal,
    pub years: Vec<YearRecord>,
    pub payback: Payback,
    pub total_savings: Decimal,
    /// `(total_savings - upfront) / upfront × 100`; absent when nothing was
    /// paid upfront.
    pub roi_pct: Option<Decimal>,
}

impl CashFlowProjection {
    pub fn final_cumulative(&self) -> Decimal {
        self.years
            .last()
            .map_or(-self.upfront_net_cost, |y| y.cumulative_net_cash_flow)
    }

    /// Records with `from <= year <= to`.
    pub fn years_between(&self, from: u32, to: u32) -> impl Iterator<Item = &YearRecord> {
        self.years.iter().filter(move |r| (from..=to).contains(&r.year))
    }
}

/// Projects yearly savings and the payback year for a sized system.
///
/// Decimal values are never rounded between years; use [`round_money`] when
/// presenting.
///
/// # Arguments
///
/// * `sizing` - Sized system; its yield and capacity enter as `Decimal`
/// * `costs` - Cost and tariff assumptions, validated first
///
/// # Returns
///
/// One [`YearRecord`] per year of `costs.lifetime_years` plus the summary
/// metrics.
///
/// # Errors
///
/// [`CalcError::InvalidCostInput`] for out-of-range costs, including values
/// large enough to overflow the projection, and
/// [`CalcError::InvalidSiteParameter`] when the sizing carries a non-finite
/// or negative yield or capacity.
pub fn project_cash_flow(sizing: &SystemSizing, costs: &CostInputs) -> Result<CashFlowProjection, CalcError> {
    costs.validate()?;
    let annual_energy = to_decimal("annual_yield_kwh", sizing.annual_yield_kwh, ENERGY_DP)?;
    let capacity = to_decimal("capacity_kwp", sizing.capacity_kwp, CAPACITY_DP)?;

    let battery_cost = costs.battery.as_ref().map_or(Decimal::ZERO, |b| b.cost);
    let installed = mul("cost_per_kwp", costs.cost_per_kwp, capacity)?;
    let upfront_net_cost = add("fixed_costs", installed, costs.fixed_costs)
        .and_then(|c| add("battery.cost", c, battery_cost))?
        - costs.subsidy;

    let effective_self_consumption = match &costs.battery {
        Some(battery) if annual_energy > Decimal::ZERO => {
            let shifted = mul("battery.capacity_kwh", battery.capacity_kwh, battery.cycles_per_year)?
                .checked_div(annual_energy)
                .ok_or_else(|| too_large("battery.capacity_kwh"))?;
            add("battery.capacity_kwh", costs.self_consumption_ratio, shifted)?.min(Decimal::ONE)
        }
        _ => costs.self_consumption_ratio,
    };
    let export_share = Decimal::ONE - effective_self_consumption;

    let mut years = Vec::with_capacity(costs.lifetime_years as usize);
    let mut cumulative = -upfront_net_cost;
    let mut payback = (cumulative >= Decimal::ZERO).then_some(0);
    let mut energy = annual_energy;
    let mut price_factor = Decimal::ONE;
    let mut total_savings = Decimal::ZERO;

    for year in 1..=costs.lifetime_years {
        if year > 1 {
            energy *= Decimal::ONE - costs.annual_degradation;
            let growth = add("price_escalation", Decimal::ONE, costs.price_escalation)?;
            price_factor = mul("price_escalation", price_factor, growth)?;
        }

        let self_use_price = mul("electricity_price", costs.electricity_price, price_factor)?;
        let export_price = mul("export_price", costs.export_price, price_factor)?;
        let self_consumption_value = mul(
            "electricity_price",
            energy * effective_self_consumption,
            self_use_price,
        )?;
        let export_revenue = mul("export_price", energy * export_share, export_price)?;
        let savings = add("electricity_price", self_consumption_value, export_revenue)?;
        cumulative = add("electricity_price", cumulative, savings)?;
        total_savings = add("electricity_price", total_savings, savings)?;

        if payback.is_none() && cumulative >= Decimal::ZERO {
            payback = Some(year);
        }

        years.push(YearRecord {
            year,
            energy_kwh: energy,
            self_consumption_value,
            export_revenue,
            savings,
            cumulative_net_cash_flow: cumulative,
        });
    }

    let roi_pct = if upfront_net_cost > Decimal::ZERO {
        let ratio = (total_savings - upfront_net_cost)
            .checked_div(upfront_net_cost)
            .ok_or_else(|| too_large("electricity_price"))?;
        Some(mul("electricity_price", ratio, dec!(100))?)
    } else {
        None
    };

    Ok(CashFlowProjection {
        upfront_net_cost,
        effective_self_consumption,
        years,
        payback: payback.map_or(Payback::NotReached, Payback::Year),
        total_savings,
        roi_pct,
    })
}

fn too_large(field: &str) -> CalcError {
    CalcError::cost(field, "value too large to project")
}

fn mul(field: &str, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
    a.checked_mul(b).ok_or_else(|| too_large(field))
}

fn add(field: &str, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
    a.checked_add(b).ok_or_else(|| too_large(field))
}

/// Rounds money to cents, halves away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds energy to watt-hours, halves away from zero.
pub fn round_energy(kwh: Decimal) -> Decimal {
    kwh.round_dp_with_strategy(ENERGY_DP, RoundingStrategy::MidpointAwayFromZero)
}

fn to_decimal(field: &str, value: f64, dp: u32) -> Result<Decimal, CalcError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::site(field, format!("{value} is not a finite, non-negative quantity")));
    }
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| CalcError::site(field, format!("{value} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::BatteryOption;

    fn sizing(capacity_kwp: f64, annual_yield_kwh: f64) -> SystemSizing {
        SystemSizing {
            roof_area_m2: 50.0,
            usable_area_m2: 40.0,
            panel_count: 22,
            capacity_kwp,
            annual_yield_kwh,
            specific_yield_kwh_per_kwp: annual_yield_kwh / capacity_kwp,
            irradiance_class: "test".into(),
            orientation_factor: 1.0,
        }
    }

    /// 8.8 kWp × 1250 + 1000 = 12 000 upfront; 0.30 / 0.08 tariffs, flat prices.
    fn scenario_costs() -> CostInputs {
        CostInputs {
            cost_per_kwp: dec!(1250),
            fixed_costs: dec!(1000),
            subsidy: Decimal::ZERO,
            battery: None,
            electricity_price: dec!(0.30),
            export_price: dec!(0.08),
            self_consumption_ratio: dec!(0.3),
            price_escalation: Decimal::ZERO,
            lifetime_years: 20,
            annual_degradation: Decimal::ZERO,
        }
    }

    #[test]
    fn scenario_pays_back_in_year_nine() {
        let p = project_cash_flow(&sizing(8.8, 9680.0), &scenario_costs()).unwrap();
        assert_eq!(p.upfront_net_cost, dec!(12000));
        assert_eq!(p.years.len(), 20);
        assert_eq!(p.years[0].self_consumption_value, dec!(871.2));
        assert_eq!(p.years[0].export_revenue, dec!(542.08));
        assert_eq!(p.years[0].savings, dec!(1413.28));
        assert_eq!(p.years[7].cumulative_net_cash_flow, dec!(-693.76));
        assert_eq!(p.years[8].cumulative_net_cash_flow, dec!(719.52));
        assert_eq!(p.payback, Payback::Year(9));
        assert_eq!(p.total_savings, dec!(28265.6));
        assert_eq!(p.final_cumulative(), dec!(16265.6));
    }

    #[test]
    fn float_noise_in_yield_is_rounded_to_watt_hours() {
        let noisy = project_cash_flow(&sizing(8.800000000000001, 9680.000000000002), &scenario_costs()).unwrap();
        let clean = project_cash_flow(&sizing(8.8, 9680.0), &scenario_costs()).unwrap();
        assert_eq!(noisy, clean);
    }

    #[test]
    fn deterministic() {
        let costs = CostInputs {
            price_escalation: dec!(0.031),
            annual_degradation: dec!(0.005),
            ..scenario_costs()
        };
        let a = project_cash_flow(&sizing(8.8, 9680.0), &costs).unwrap();
        let b = project_cash_flow(&sizing(8.8, 9680.0), &costs).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn escalation_compounds_per_year() {
        let costs = CostInputs {
            price_escalation: dec!(0.1),
            ..scenario_costs()
        };
        let p = project_cash_flow(&sizing(8.8, 9680.0), &costs).unwrap();
        assert_eq!(p.years[0].savings, dec!(1413.28));
        assert_eq!(p.years[1].savings, dec!(1554.608));
        assert_eq!(p.years[2].savings, dec!(1710.0688));
    }

    #[test]
    fn degradation_reduces_energy() {
        let costs = CostInputs {
            annual_degradation: dec!(0.01),
            ..scenario_costs()
        };
        let p = project_cash_flow(&sizing(8.8, 9680.0), &costs).unwrap();
        assert_eq!(p.years[0].energy_kwh, dec!(9680));
        assert_eq!(p.years[1].energy_kwh, dec!(9583.2));
        assert!(p.years.windows(2).all(|w| w[1].energy_kwh < w[0].energy_kwh));
    }

    #[test]
    fn subsidy_exceeding_cost_pays_back_immediately() {
        let costs = CostInputs {
            subsidy: dec!(15000),
            ..scenario_costs()
        };
        let p = project_cash_flow(&sizing(8.8, 9680.0), &costs).unwrap();
        assert_eq!(p.upfront_net_cost, dec!(-3000));
        assert_eq!(p.payback, Payback::Year(0));
        assert_eq!(p.roi_pct, None);
    }

    #[test]
    fn short_lifetime_is_not_reached() {
        let costs = CostInputs {
            lifetime_years: 5,
            ..scenario_costs()
        };
        let p = project_cash_flow(&sizing(8.8, 9680.0), &costs).unwrap();
        assert_eq!(p.payback, Payback::NotReached);
        assert_eq!(p.payback.year(), None);
        assert!(p.roi_pct.unwrap() < Decimal::ZERO);
    }

    #[test]
    fn battery_raises_self_consumption_up_to_one() {
        let small = scenario_costs().with_battery(Some(BatteryOption {
            capacity_kwh: dec!(4.84),
            cost: dec!(3000),
            cycles_per_year: dec!(200),
        }));
        let p = project_cash_flow(&sizing(8.8, 9680.0), &small).unwrap();
        // 4.84 × 200 / 9680 = 0.1
        assert_eq!(p.effective_self_consumption, dec!(0.4));
        assert_eq!(p.upfront_net_cost, dec!(15000));

        let huge = scenario_costs().with_battery(Some(BatteryOption {
            capacity_kwh: dec!(100),
            cost: dec!(3000),
            cycles_per_year: dec!(365),
        }));
        let p = project_cash_flow(&sizing(8.8, 9680.0), &huge).unwrap();
        assert_eq!(p.effective_self_consumption, Decimal::ONE);
        assert_eq!(p.years[0].export_revenue, Decimal::ZERO);
    }

    #[test]
    fn zero_panels_never_pay_back() {
        let p = project_cash_flow(&sizing(0.0, 0.0), &scenario_costs()).unwrap();
        assert_eq!(p.upfront_net_cost, dec!(1000));
        assert_eq!(p.payback, Payback::NotReached);
    }

    #[test]
    fn non_finite_yield_is_rejected() {
        let err = project_cash_flow(&sizing(8.8, f64::NAN), &scenario_costs()).unwrap_err();
        assert_eq!(err.kind(), "invalid_site_parameter");
    }

    #[test]
    fn presentation_rounds_half_away_from_zero() {
        assert_eq!(round_money(dec!(0.125)), dec!(0.13));
        assert_eq!(round_money(dec!(-7812.345)), dec!(-7812.35));
        assert_eq!(round_energy(dec!(1.0005)), dec!(1.001));
    }

    #[test]
    fn runaway_escalation_is_an_input_error() {
        let costs = CostInputs {
            price_escalation: dec!(3),
            lifetime_years: 60,
            ..scenario_costs()
        };
        assert!(costs.validate().is_ok());
        let err = project_cash_flow(&sizing(8.8, 9680.0), &costs).unwrap_err();
        assert_eq!(err.kind(), "invalid_cost_input");
        assert!(err.to_string().ends_with("value too large to project"));
    }

    #[test]
    fn huge_cost_per_kwp_is_an_input_error() {
        let costs = CostInputs {
            cost_per_kwp: Decimal::from_scientific("1e28").unwrap(),
            ..scenario_costs()
        };
        let err = project_cash_flow(&sizing(8.8, 9680.0), &costs).unwrap_err();
        assert_eq!(err.kind(), "invalid_cost_input");
        assert!(matches!(err, CalcError::InvalidCostInput { ref field, .. } if field == "cost_per_kwp"));
    }

    #[test]
    fn huge_battery_is_an_input_error() {
        let costs = scenario_costs().with_battery(Some(BatteryOption {
            capacity_kwh: Decimal::MAX,
            cost: dec!(3000),
            cycles_per_year: dec!(250),
        }));
        let err = project_cash_flow(&sizing(8.8, 9680.0), &costs).unwrap_err();
        assert_eq!(err.kind(), "invalid_cost_input");
    }

    #[test]
    fn year_filter_is_inclusive() {
        let p = project_cash_flow(&sizing(8.8, 9680.0), &scenario_costs()).unwrap();
        let picked: Vec<u32> = p.years_between(3, 5).map(|r| r.year).collect();
        assert_eq!(picked, vec![3, 4, 5]);
    }

    #[test]
    fn payback_serializes_tagged() {
        assert_eq!(
            serde_json::to_string(&Payback::Year(9)).unwrap(),
            r#"{"status":"year","year":9}"#
        );
        assert_eq!(
            serde_json::to_string(&Payback::NotReached).unwrap(),
            r#"{"status":"not_reached"}"#
        );
    }
}
