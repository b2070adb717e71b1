//! Input validation shared by every front end.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::CalculationError;

/// The user-editable fields of the renta form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    LastName,
    Salary,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Salary => "Salary",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(FormField),

    #[error("'{0}' is not a valid salary")]
    InvalidSalary(String),

    #[error("salary cannot be negative: {0}")]
    NegativeSalary(Decimal),

    #[error("salary {0} is above the 999999999.99 limit")]
    SalaryTooLarge(Decimal),

    #[error("salary {0} has more than two decimal places")]
    TooManyDecimals(Decimal),

    #[error("no calculation matches the current input")]
    NotCalculated,

    #[error("net salary {net} does not match the {label} bracket for gross {gross}")]
    InconsistentResult {
        gross: Decimal,
        label: &'static str,
        net: Decimal,
    },
}

impl From<CalculationError> for ValidationError {
    fn from(err: CalculationError) -> Self {
        match err {
            CalculationError::NegativeSalary(value) => ValidationError::NegativeSalary(value),
        }
    }
}

/// Returns the trimmed value, or [`ValidationError::MissingField`] when it is
/// empty.
pub fn require_text(
    field: FormField,
    value: &str,
) -> Result<&str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

/// Most decimal places a salary may carry.
pub const SALARY_DECIMALS: u32 = 2;

/// Largest accepted salary.
///
/// Saved amounts are JSON numbers. Up to this size, with at most
/// [`SALARY_DECIMALS`] places, both the salary and its net read back
/// unchanged.
pub fn max_salary() -> Decimal {
    Decimal::new(99_999_999_999, SALARY_DECIMALS)
}

/// Checks that `value` is a salary that can be calculated and stored.
pub fn check_salary(value: Decimal) -> Result<Decimal, ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::NegativeSalary(value));
    }
    if value > max_salary() {
        return Err(ValidationError::SalaryTooLarge(value));
    }
    if value.normalize().scale() > SALARY_DECIMALS {
        return Err(ValidationError::TooManyDecimals(value));
    }
    Ok(value)
}

/// Parses salary text into a [`Decimal`] accepted by [`check_salary`].
///
/// Surrounding whitespace is ignored and `,` is accepted as a thousands
/// separator (`"1,500.50"`).
pub fn parse_salary(s: &str) -> Result<Decimal, ValidationError> {
    let normalized = require_text(FormField::Salary, s)?.replace(',', "");
    let value: Decimal = normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid salary: {}", e);
        ValidationError::InvalidSalary(s.trim().to_string())
    })?;
    check_salary(value)
}
