//! Loading of grid axes and velocity slices from input tables.
use tracing::debug;

use crate::axis::{normalize_axis, AxisSet};
use crate::config::{SamplerConfig, SamplerMode};
use crate::error::{FieldError, Result};
use crate::series::TimeSeries;
use crate::table::ColumnTable;

/// Read the coordinate table and one data table per velocity component.
///
/// The coordinate table holds one column per spatial dimension, followed by
/// the time column for time-varying data. Each data table holds one column
/// per time slice. Every slice is loaded here; nothing is read afterwards.
///
/// # Errors
/// * `SetupConfig` if a required file is not configured
/// * `FormatMismatch` if a table has the wrong number of columns
/// * `ShapeMismatch` if a data column does not match the cleaned grid size
/// * `DomainError` if a cleaned axis is not strictly increasing
/// * `Io` or `Parse` if a table cannot be read
pub fn load_grid(
    config: &SamplerConfig,
    mode: SamplerMode,
) -> Result<(AxisSet<f64>, TimeSeries<f64>)> {
    let files = config.grid_files(mode)?;
    let delimiter = config.delimiter_byte()?;
    let ndims = mode.ncomponents();

    let coords = ColumnTable::read(&files.dim, delimiter, config.has_header)?;
    coords.expect_columns(ndims + usize::from(config.time_dependent))?;

    let mut columns = coords.into_columns().into_iter();
    let mut next_axis = || columns.next().map(|c| normalize_axis(&c));
    let missing = || FieldError::domain("coordinate table ran out of columns");

    let x = next_axis().ok_or_else(missing)?;
    let y = next_axis().ok_or_else(missing)?;
    let z = match mode {
        SamplerMode::Grid3D => Some(next_axis().ok_or_else(missing)?),
        _ => None,
    };
    let time = if config.time_dependent {
        Some(next_axis().ok_or_else(missing)?)
    } else {
        None
    };
    let axes = AxisSet::new(x, y, z, time)?;

    let nslices = axes.nslices();
    let mut components = Vec::with_capacity(files.components.len());
    for path in &files.components {
        let table = ColumnTable::read(path, delimiter, config.has_header)?;
        table.expect_columns(nslices)?;
        components.push(table.into_columns());
    }
    let series = TimeSeries::new(components, &axes)?;

    debug!(
        "Loaded {} components x {} slices on a {:?} grid",
        series.ncomponents(),
        series.nslices(),
        axes.dims()
    );

    Ok((axes, series))
}
