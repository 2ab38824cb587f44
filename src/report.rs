//! Plain-text quote summary printed by the CLI.

use std::fmt;

use rust_decimal::Decimal;

use crate::finance::{Payback, YearRecord, round_energy, round_money};
use crate::geometry::GeometryWarning;
use crate::quote::Quote;

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(0) => f.write_str("immediate"),
            Self::Year(y) => write!(f, "year {y}"),
            Self::NotReached => f.write_str("not reached"),
        }
    }
}

impl fmt::Display for YearRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "year {:>2} | energy={:>10.3} kWh | self_use={:>9.2} | export={:>9.2} | savings={:>9.2} | cumulative={:>10.2}",
            self.year,
            round_energy(self.energy_kwh),
            round_money(self.self_consumption_value),
            round_money(self.export_revenue),
            round_money(self.savings),
            round_money(self.cumulative_net_cash_flow),
        )
    }
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfIntersection {
                first_edge,
                second_edge,
            } => write!(f, "outline edges {first_edge} and {second_edge} cross"),
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.sizing;
        let p = &self.projection;
        let first_year = p.years.first().map(|y| y.savings).unwrap_or_default();

        writeln!(f, "--- Solar Quote ---")?;
        writeln!(f, "Roof area:             {:.2} m²", self.geometry.area_m2)?;
        writeln!(f, "Usable area:           {:.2} m²", s.usable_area_m2)?;
        writeln!(f, "Panels:                {}", s.panel_count)?;
        writeln!(f, "Capacity:              {:.2} kWp", s.capacity_kwp)?;
        writeln!(f, "Irradiance class:      {}", s.irradiance_class)?;
        writeln!(
            f,
            "Orientation:           tilt {:.1}°, azimuth {:.1}° (factor {:.3})",
            self.site.tilt_deg,
            self.site.azimuth_normalized(),
            s.orientation_factor
        )?;
        writeln!(f, "Annual yield:          {:.0} kWh", s.annual_yield_kwh)?;
        writeln!(f, "Upfront net cost:      {:.2}", round_money(p.upfront_net_cost))?;
        let self_use_pct = (p.effective_self_consumption * Decimal::ONE_HUNDRED).round_dp(1);
        writeln!(f, "Self-consumption:      {self_use_pct:.1}%")?;
        writeln!(f, "First-year savings:    {:.2}", round_money(first_year))?;
        writeln!(f, "Lifetime savings:      {:.2}", round_money(p.total_savings))?;
        match p.roi_pct {
            Some(roi) => writeln!(f, "ROI:                   {:.1}%", roi.round_dp(1))?,
            None => writeln!(f, "ROI:                   n/a")?,
        }
        for w in &self.geometry.warnings {
            writeln!(f, "Warning:               {w}")?;
        }
        write!(f, "Payback:               {}", p.payback)
    }
}
