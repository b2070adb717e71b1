//! CSV import and export of salary results.

mod export;
mod importer;

pub use export::export_csv;
pub use importer::{SalaryCsvLoader, SalaryCsvRecord, SalaryImportError};
