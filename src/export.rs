use std::path::Path;

use crate::cumulative::CumulativeSample;
use crate::error::Result;

/// Write a finished cumulative record as `time_secs,responses` rows.
pub fn write_cumulative_csv(path: &Path, series: &[CumulativeSample]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for sample in series {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), rows = series.len(), "cumulative record exported");
    Ok(())
}
