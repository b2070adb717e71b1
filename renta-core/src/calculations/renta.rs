//! Flat-rate renta calculator.
//!
//! | Gross salary        | Rate | Label |
//! |---------------------|------|-------|
//! | above 2500          | 25%  | `25%` |
//! | 1000 to 2500        | 18%  | `18%` |
//! | below 1000          | 7%   | `7%`  |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use renta_core::calculations::compute_tax;
//! use renta_core::TaxBracket;
//!
//! let result = compute_tax(dec!(3000)).unwrap();
//!
//! assert_eq!(result.bracket, TaxBracket::High);
//! assert_eq!(result.net_salary, dec!(2250.00));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{TaxBracket, TaxComputation};

/// Errors that can occur while computing renta.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("gross salary cannot be negative: {0}")]
    NegativeSalary(Decimal),
}

/// Computes the renta bracket and net salary for `gross_salary`.
///
/// The net salary is `gross - gross * rate` without rounding.
///
/// # Errors
///
/// Returns [`CalculationError::NegativeSalary`] for inputs below zero.
pub fn compute_tax(gross_salary: Decimal) -> Result<TaxComputation, CalculationError> {
    if gross_salary < Decimal::ZERO {
        return Err(CalculationError::NegativeSalary(gross_salary));
    }

    let bracket = TaxBracket::for_salary(gross_salary);
    let renta = gross_salary * bracket.rate();

    Ok(TaxComputation {
        gross_salary,
        bracket,
        net_salary: gross_salary - renta,
    })
}
