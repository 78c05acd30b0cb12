//! # gridsheet-io
//!
//! CSV import and export. Export writes what the user sees; import brings
//! every field in as text and leaves evaluation to the store.

mod error;
mod reader;
mod writer;

pub use error::{IoError, IoResult};
pub use reader::{import_csv, read_grid, read_grid_file};
pub use writer::{export_csv, write_grid, write_grid_file};
