//! Plain-text rendering of [`AppState`].

use renta_core::SalaryRecord;
use renta_core::calculations::money::format_currency;

use crate::state::AppState;

/// Shortened id shown in listings; `delete` accepts it as a prefix.
pub fn short_id(record: &SalaryRecord) -> &str {
    let id = record.id.as_str();
    id.get(..8).unwrap_or(id)
}

/// The result panel for the current form, if a calculation is showing.
pub fn render_result(state: &AppState) -> Option<String> {
    let result = state.result.as_ref()?;
    Some(format!(
        "First name:  {}\n\
         Last name:   {}\n\
         Gross:       {}\n\
         Renta:       {}\n\
         Net:         {}",
        state.form.first_name.trim(),
        state.form.last_name.trim(),
        format_currency(result.gross_salary),
        result.label(),
        result.net_text(),
    ))
}

/// The saved-results list, one line per record in storage order.
pub fn render_records(records: &[SalaryRecord]) -> String {
    if records.is_empty() {
        return "No saved results.".to_string();
    }
    let header = format!(
        "{:<8}  {:<24}  {:>12}  {:>5}  {:>12}",
        "ID", "NAME", "GROSS", "RENTA", "NET"
    );
    let rows = records.iter().map(|record| {
        format!(
            "{:<8}  {:<24}  {:>12}  {:>5}  {:>12}",
            short_id(record),
            record.full_name(),
            format_currency(record.gross_salary),
            record.tax_bracket.label(),
            format_currency(record.net_salary),
        )
    });
    std::iter::once(header).chain(rows).collect::<Vec<_>>().join("\n")
}
