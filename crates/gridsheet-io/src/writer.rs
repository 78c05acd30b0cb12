//! CSV export

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::IoResult;
use gridsheet_core::Grid;

/// Write a grid's displayed values to a CSV file
pub fn write_grid_file<P: AsRef<Path>>(grid: &Grid, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    write_grid(grid, file)
}

/// Write one record per row holding each cell's displayed text
pub fn write_grid<W: Write>(grid: &Grid, writer: W) -> IoResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for record in grid.value_matrix() {
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Render a grid's displayed values as CSV text
pub fn export_csv(grid: &Grid) -> IoResult<String> {
    let mut buffer = Vec::new();
    write_grid(grid, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
