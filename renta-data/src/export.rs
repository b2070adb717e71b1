use std::io::Write;

use renta_core::SalaryRecord;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    gross_salary: String,
    tax_bracket: &'static str,
    net_salary: String,
}

/// Write `records` as CSV with the columns
/// `id,first_name,last_name,gross_salary,tax_bracket,net_salary`.
///
/// Amounts are written at full precision. Returns the number of data rows.
pub fn export_csv<W: Write>(
    records: &[SalaryRecord],
    writer: W,
) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        csv_writer.write_record([
            "id",
            "first_name",
            "last_name",
            "gross_salary",
            "tax_bracket",
            "net_salary",
        ])?;
    }

    for record in records {
        csv_writer.serialize(ExportRow {
            id: record.id.as_str(),
            first_name: &record.first_name,
            last_name: &record.last_name,
            gross_salary: record.gross_salary.to_string(),
            tax_bracket: record.tax_bracket.label(),
            net_salary: record.net_salary.to_string(),
        })?;
    }

    csv_writer.flush()?;
    Ok(records.len())
}
