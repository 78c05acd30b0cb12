//! CSV import

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{IoError, IoResult};
use gridsheet_core::{Cell, Grid};

/// Read a CSV file into a grid
pub fn read_grid_file<P: AsRef<Path>>(path: P) -> IoResult<Grid> {
    let file = File::open(path)?;
    read_grid(file)
}

/// Read headerless CSV into a grid.
///
/// Each field becomes a text cell whose raw text and value are the field.
/// Short records are padded with empty cells to the widest record.
pub fn read_grid<R: Read>(reader: R) -> IoResult<Grid> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(Cell::text).collect::<Vec<_>>());
    }

    if rows.iter().all(Vec::is_empty) {
        return Err(IoError::Empty);
    }

    Ok(Grid::from_rows(rows)?)
}

/// Parse CSV text into a grid
pub fn import_csv(text: &str) -> IoResult<Grid> {
    read_grid(text.as_bytes())
}
