//! CSV export for cash-flow projections.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::finance::{CashFlowProjection, round_energy, round_money};

/// Column header for the yearly cash-flow export.
pub const HEADER: &str = "year,energy_kwh,self_consumption_value,export_revenue,savings,cumulative_net_cash_flow";

/// Exports a projection to a CSV file at the given path.
///
/// # Arguments
///
/// * `projection` - Yearly cash flow to write
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(projection: &CashFlowProjection, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(projection, buf)
}

/// Writes one row per projected year to any writer.
///
/// Energy is rendered with three decimals (Wh), money with two. Output is
/// byte-identical for identical projections.
///
/// # Arguments
///
/// * `projection` - Yearly cash flow to write
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(projection: &CashFlowProjection, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in &projection.years {
        wtr.write_record(&[
            r.year.to_string(),
            format!("{:.3}", round_energy(r.energy_kwh)),
            format!("{:.2}", round_money(r.self_consumption_value)),
            format!("{:.2}", round_money(r.export_revenue)),
            format!("{:.2}", round_money(r.savings)),
            format!("{:.2}", round_money(r.cumulative_net_cash_flow)),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
