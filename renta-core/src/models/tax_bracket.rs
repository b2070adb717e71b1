use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One of the three flat-rate renta brackets.
///
/// Serialized as its label (`"7%"`, `"18%"`, `"25%"`). Deserialization also
/// accepts the display form stored by older clients, e.g.
/// `"Porcentaje de Renta: 25%"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxBracket {
    Low,
    Middle,
    High,
}

impl TaxBracket {
    pub fn all() -> &'static [TaxBracket] {
        &[TaxBracket::Low, TaxBracket::Middle, TaxBracket::High]
    }

    /// Selects the bracket for a gross salary. Checked top-down: above 2500
    /// is `High`, 1000 through 2500 inclusive is `Middle`, anything lower is
    /// `Low`.
    pub fn for_salary(gross_salary: Decimal) -> Self {
        if gross_salary > Decimal::from(2500) {
            Self::High
        } else if gross_salary >= Decimal::from(1000) {
            Self::Middle
        } else {
            Self::Low
        }
    }

    /// Deduction rate applied to the gross salary.
    pub fn rate(&self) -> Decimal {
        match self {
            Self::Low => Decimal::new(7, 2),
            Self::Middle => Decimal::new(18, 2),
            Self::High => Decimal::new(25, 2),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "7%",
            Self::Middle => "18%",
            Self::High => "25%",
        }
    }

    /// Parses a bracket label. Anything before the last `:` is ignored so
    /// the legacy `"Porcentaje de Renta: 18%"` form is understood too.
    pub fn parse(s: &str) -> Option<Self> {
        let label = s.rsplit(':').next().unwrap_or(s).trim();
        match label {
            "7%" => Some(Self::Low),
            "18%" => Some(Self::Middle),
            "25%" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for TaxBracket {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TaxBracket {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TaxBracket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TaxBracket::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown tax bracket label '{s}'")))
    }
}
