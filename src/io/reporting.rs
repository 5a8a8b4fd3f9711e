// src/io/reporting.rs

use crate::error::PharmaResult;
use crate::simulation::engine::DayRecord;
use std::path::Path;

/// Writes the day-by-day history to a CSV file.
///
/// # Arguments
/// * `file_path` - Where to save the log (e.g. "results/run_1.csv").
/// * `data` - The history recorded by the simulation engine.
pub fn write_day_log(file_path: impl AsRef<Path>, data: &[DayRecord]) -> PharmaResult<()> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    for record in data {
        wtr.serialize(record)?;
    }

    // Flush the buffer to ensure all data is written
    wtr.flush()?;

    tracing::info!(rows = data.len(), path = %path.display(), "day log exported");
    Ok(())
}
