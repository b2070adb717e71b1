use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::money::{format_currency, round_half_up};
use crate::models::TaxBracket;

/// Output of the renta calculator for a single gross salary.
///
/// `net_salary` keeps the full precision of `gross - gross * rate`; use
/// [`TaxComputation::display_net`] when a two-decimal figure is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputation {
    pub gross_salary: Decimal,
    pub bracket: TaxBracket,
    pub net_salary: Decimal,
}

impl TaxComputation {
    pub fn rate(&self) -> Decimal {
        self.bracket.rate()
    }

    pub fn label(&self) -> &'static str {
        self.bracket.label()
    }

    /// Amount withheld as renta.
    pub fn deduction(&self) -> Decimal {
        self.gross_salary - self.net_salary
    }

    /// Net salary rounded half-up to cents.
    pub fn display_net(&self) -> Decimal {
        round_half_up(self.net_salary)
    }

    /// Net salary as currency text, e.g. `$2250.00`.
    pub fn net_text(&self) -> String {
        format_currency(self.net_salary)
    }
}
