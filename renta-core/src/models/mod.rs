mod salary_record;
mod tax_bracket;
mod tax_computation;

pub use salary_record::{RecordId, SalaryRecord};
pub use tax_bracket::TaxBracket;
pub use tax_computation::TaxComputation;
