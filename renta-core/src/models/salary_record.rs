use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::money::format_currency;
use crate::models::{TaxBracket, TaxComputation};
use crate::validation::{FormField, ValidationError, check_salary};

/// Identifier of a saved result. Generated ids are UUID v4 strings; ids read
/// back from storage are taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted renta result.
///
/// Field names follow the stored JSON layout (`firstName`, `grossSalary`,
/// `taxBracketLabel`, ...). The Spanish names written by older clients are
/// accepted as aliases on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecord {
    pub id: RecordId,
    #[serde(alias = "nombre")]
    pub first_name: String,
    #[serde(alias = "apellidos")]
    pub last_name: String,
    #[serde(alias = "sueldo", with = "rust_decimal::serde::float")]
    pub gross_salary: Decimal,
    #[serde(rename = "taxBracketLabel", alias = "porcentajeRenta")]
    pub tax_bracket: TaxBracket,
    #[serde(alias = "sueldoNeto", with = "rust_decimal::serde::float")]
    pub net_salary: Decimal,
}

impl SalaryRecord {
    /// Builds a record with a freshly generated id from a completed
    /// calculation.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        computation: &TaxComputation,
    ) -> Self {
        Self::with_id(RecordId::generate(), first_name, last_name, computation)
    }

    pub fn with_id(
        id: RecordId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        computation: &TaxComputation,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            gross_salary: computation.gross_salary,
            tax_bracket: computation.bracket,
            net_salary: computation.net_salary,
        }
    }

    /// Checks that the record is fully populated and that its derived fields
    /// agree with the bracket table.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::MissingField(FormField::FirstName));
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::MissingField(FormField::LastName));
        }
        check_salary(self.gross_salary)?;

        let expected_bracket = TaxBracket::for_salary(self.gross_salary);
        let expected_net = self.gross_salary - self.gross_salary * expected_bracket.rate();
        if self.tax_bracket != expected_bracket || self.net_salary != expected_net {
            return Err(ValidationError::InconsistentResult {
                gross: self.gross_salary,
                label: self.tax_bracket.label(),
                net: self.net_salary,
            });
        }
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for SalaryRecord {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Id:          {}", self.id)?;
        writeln!(f, "First name:  {}", self.first_name)?;
        writeln!(f, "Last name:   {}", self.last_name)?;
        writeln!(f, "Gross:       {}", format_currency(self.gross_salary))?;
        writeln!(f, "Renta:       {}", self.tax_bracket)?;
        write!(f, "Net:         {}", format_currency(self.net_salary))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::compute_tax;

    fn record(gross: Decimal) -> SalaryRecord {
        let computation = compute_tax(gross).unwrap();
        SalaryRecord::with_id(RecordId::new("r-1"), "Ana", "Pérez", &computation)
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn new_copies_derived_fields_from_computation() {
        let computation = compute_tax(dec!(3000)).unwrap();
        let record = SalaryRecord::new("Ana", "Pérez", &computation);

        assert_eq!(record.gross_salary, dec!(3000));
        assert_eq!(record.tax_bracket, TaxBracket::High);
        assert_eq!(record.net_salary, dec!(2250));
        assert!(!record.id.as_str().is_empty());
    }

    #[test]
    fn serializes_with_canonical_field_names() {
        let json = serde_json::to_value(record(dec!(1500))).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "r-1",
                "firstName": "Ana",
                "lastName": "Pérez",
                "grossSalary": 1500.0,
                "taxBracketLabel": "18%",
                "netSalary": 1230.0,
            })
        );
    }

    #[test]
    fn deserializes_legacy_spanish_payload() {
        let json = r#"{
            "id": "id7",
            "nombre": "Luis",
            "apellidos": "Soto",
            "sueldo": 800,
            "porcentajeRenta": "Porcentaje de Renta: 7%",
            "sueldoNeto": 744
        }"#;

        let record: SalaryRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, RecordId::new("id7"));
        assert_eq!(record.first_name, "Luis");
        assert_eq!(record.last_name, "Soto");
        assert_eq!(record.gross_salary, dec!(800));
        assert_eq!(record.tax_bracket, TaxBracket::Low);
        assert_eq!(record.net_salary, dec!(744));
    }

    #[test]
    fn validate_accepts_calculated_record() {
        assert_eq!(record(dec!(800)).validate(), Ok(()));
        assert_eq!(record(dec!(2500)).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_blank_names() {
        let mut r = record(dec!(800));
        r.first_name = "  ".to_string();
        assert_eq!(
            r.validate(),
            Err(ValidationError::MissingField(FormField::FirstName))
        );

        let mut r = record(dec!(800));
        r.last_name = String::new();
        assert_eq!(
            r.validate(),
            Err(ValidationError::MissingField(FormField::LastName))
        );
    }

    #[test]
    fn validate_rejects_amounts_that_cannot_be_stored() {
        assert_eq!(
            record(Decimal::MAX).validate(),
            Err(ValidationError::SalaryTooLarge(Decimal::MAX))
        );
        assert_eq!(
            record(dec!(1500.125)).validate(),
            Err(ValidationError::TooManyDecimals(dec!(1500.125)))
        );
    }

    #[test]
    fn validate_rejects_inconsistent_net() {
        let mut r = record(dec!(1500));
        r.net_salary = dec!(1500);
        assert!(matches!(
            r.validate(),
            Err(ValidationError::InconsistentResult { .. })
        ));
    }

    #[test]
    fn validate_rejects_wrong_bracket() {
        let mut r = record(dec!(1500));
        r.tax_bracket = TaxBracket::Low;
        assert!(matches!(
            r.validate(),
            Err(ValidationError::InconsistentResult { .. })
        ));
    }
}
