mod csv_export;
mod export_error;
mod xlsx_export;

pub use csv_export::{write_lake_csv, write_listings_csv, write_mart_csv};
pub use export_error::ExportError;
pub use xlsx_export::export_listings_xlsx;
