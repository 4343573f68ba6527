//! CSV export of generated series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::signal::SignalSeries;

/// Column header of the series CSV export.
const HEADER: &str = "site_id,site_name,timestamp,time,date,\
                      capacity_mw,actual_mw,forecast_mw,is_now";

/// Exports series to a CSV file at the given path.
///
/// Writes a header row followed by one row per sample, site after site in
/// input order. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(series: &[SignalSeries], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(series, buf)
}

/// Writes series as CSV to any writer.
///
/// `actual_mw` is left empty after `now`; `is_now` marks the reference row.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(series: &[SignalSeries], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for s in series {
        let site = s.site();
        for (i, sample) in s.samples().iter().enumerate() {
            wtr.write_record(&[
                site.id.clone(),
                site.name.clone(),
                sample.timestamp.to_rfc3339(),
                sample.timestamp.format("%H:%M").to_string(),
                sample.timestamp.format("%a %d/%m").to_string(),
                format!("{:.4}", sample.capacity),
                sample
                    .actual
                    .map(|a| format!("{a:.4}"))
                    .unwrap_or_default(),
                format!("{:.4}", sample.forecast),
                (i == s.now_index()).to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
