//! Tabular export of the sorted issue list.

pub mod csv_export;

pub use csv_export::{CsvExporter, CSV_HEADERS};
