use std::io::Read;

use renta_core::storage::{KeyValueStore, ResultStore, ResultStoreError};
use renta_core::validation::{FormField, ValidationError, check_salary, require_text};
use renta_core::{SalaryRecord, compute_tax};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when importing salary rows.
#[derive(Debug, Error)]
pub enum SalaryImportError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    /// `row` is 1-based, not counting the header.
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: ValidationError,
    },

    #[error("Store error: {0}")]
    Store(#[from] ResultStoreError),
}

impl From<csv::Error> for SalaryImportError {
    fn from(err: csv::Error) -> Self {
        SalaryImportError::CsvParse(err.to_string())
    }
}

/// A single row of the salary import CSV.
///
/// Columns: `first_name,last_name,gross_salary`. Header names must match
/// exactly; cell whitespace is trimmed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SalaryCsvRecord {
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "deserialize_salary")]
    pub gross_salary: Decimal,
}

/// Reads the cell as text so amounts never pass through `f64`. Accepts `,`
/// thousands separators like the interactive form.
fn deserialize_salary<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim()
        .replace(',', "")
        .parse::<Decimal>()
        .map_err(serde::de::Error::custom)
}

/// Bulk import of salary rows into a [`ResultStore`].
///
/// Each row goes through the same path as the interactive form: the tax is
/// computed and a record with a new id is saved.
pub struct SalaryCsvLoader;

impl SalaryCsvLoader {
    /// Parse salary rows from any reader (file, byte slice, ...).
    pub fn parse<R: Read>(reader: R) -> Result<Vec<SalaryCsvRecord>, SalaryImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: SalaryCsvRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Compute and save every row, in order, as one batch.
    ///
    /// All rows are validated before anything is written, and the batch is
    /// persisted in a single write: a bad row or a failed write leaves the
    /// store as it was. Returns the number of records saved.
    pub async fn load<S: KeyValueStore>(
        results: &mut ResultStore<S>,
        rows: &[SalaryCsvRecord],
    ) -> Result<usize, SalaryImportError> {
        let mut pending = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let record = to_record(row).map_err(|source| SalaryImportError::InvalidRow {
                row: index + 1,
                source,
            })?;
            pending.push(record);
        }

        let inserted = results.save_all(pending).await?;

        info!(inserted, "imported salary rows");
        Ok(inserted)
    }
}

fn to_record(row: &SalaryCsvRecord) -> Result<SalaryRecord, ValidationError> {
    let first_name = require_text(FormField::FirstName, &row.first_name)?;
    let last_name = require_text(FormField::LastName, &row.last_name)?;
    let gross = check_salary(row.gross_salary)?;
    let computation = compute_tax(gross)?;
    Ok(SalaryRecord::new(first_name, last_name, &computation))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use renta_core::TaxBracket;
    use renta_core::storage::{MemoryStore, RESULTS_KEY, StorageError};
    use rust_decimal_macros::dec;

    use super::*;

    /// A [`MemoryStore`] whose writes can be switched off.
    #[derive(Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
        refuse_writes: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.refuse_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Database("database is locked".to_string()));
            }
            self.inner.set_item(key, value).await
        }
    }

    const TEST_CSV: &str = "first_name,last_name,gross_salary
Ana,Pérez,3000
Luis, Soto ,1500
Marta,Díaz,800
";

    #[test]
    fn test_parse_csv_rows() {
        let rows = SalaryCsvLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[1],
            SalaryCsvRecord {
                first_name: "Luis".to_string(),
                last_name: "Soto".to_string(),
                gross_salary: dec!(1500),
            }
        );
    }

    #[test]
    fn test_parse_csv_decimal_salary() {
        let csv = "first_name,last_name,gross_salary\nAna,Pérez,1234.56";

        let rows = SalaryCsvLoader::parse(csv.as_bytes()).unwrap();

        assert_eq!(rows[0].gross_salary, dec!(1234.56));
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let csv = "first_name,gross_salary\nAna,3000";

        let result = SalaryCsvLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(SalaryImportError::CsvParse(_))));
    }

    #[test]
    fn test_parse_csv_non_numeric_salary() {
        let csv = "first_name,last_name,gross_salary\nAna,Pérez,lots";

        let result = SalaryCsvLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(SalaryImportError::CsvParse(_))));
    }

    #[test]
    fn test_parse_empty_csv() {
        let csv = "first_name,last_name,gross_salary\n";

        let rows = SalaryCsvLoader::parse(csv.as_bytes()).unwrap();

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_load_computes_and_saves_in_order() {
        let rows = SalaryCsvLoader::parse(TEST_CSV.as_bytes()).unwrap();
        let mut results = ResultStore::new(MemoryStore::new());

        let inserted = SalaryCsvLoader::load(&mut results, &rows).await.unwrap();

        assert_eq!(inserted, 3);
        let saved = results.records();
        assert_eq!(saved[0].first_name, "Ana");
        assert_eq!(saved[0].tax_bracket, TaxBracket::High);
        assert_eq!(saved[0].net_salary, dec!(2250));
        assert_eq!(saved[1].tax_bracket, TaxBracket::Middle);
        assert_eq!(saved[2].net_salary, dec!(744));
    }

    #[tokio::test]
    async fn test_load_rejects_negative_salary_without_writing() {
        let csv = "first_name,last_name,gross_salary\nAna,Pérez,3000\nLuis,Soto,-5";
        let rows = SalaryCsvLoader::parse(csv.as_bytes()).unwrap();
        let mut results = ResultStore::new(MemoryStore::new());

        let err = SalaryCsvLoader::load(&mut results, &rows).await.unwrap_err();

        assert!(matches!(
            err,
            SalaryImportError::InvalidRow {
                row: 2,
                source: ValidationError::NegativeSalary(_)
            }
        ));
        assert!(results.records().is_empty());
        assert_eq!(results.store().write_count(), 0);
    }

    #[tokio::test]
    async fn test_load_rejects_blank_name() {
        let rows = vec![SalaryCsvRecord {
            first_name: "Ana".to_string(),
            last_name: "  ".to_string(),
            gross_salary: dec!(900),
        }];
        let mut results = ResultStore::new(MemoryStore::new());

        let err = SalaryCsvLoader::load(&mut results, &rows).await.unwrap_err();

        assert!(matches!(
            err,
            SalaryImportError::InvalidRow {
                row: 1,
                source: ValidationError::MissingField(FormField::LastName)
            }
        ));
    }

    #[tokio::test]
    async fn test_load_writes_the_whole_file_at_once() {
        let rows = SalaryCsvLoader::parse(TEST_CSV.as_bytes()).unwrap();
        let mut results = ResultStore::new(MemoryStore::new());

        SalaryCsvLoader::load(&mut results, &rows).await.unwrap();

        assert_eq!(results.store().write_count(), 1);
    }

    #[tokio::test]
    async fn test_load_write_failure_saves_no_rows() {
        let mut results = ResultStore::new(ReadOnlyStore::default());
        let earlier = "first_name,last_name,gross_salary\nEva,Ruiz,500";
        let earlier = SalaryCsvLoader::parse(earlier.as_bytes()).unwrap();
        SalaryCsvLoader::load(&mut results, &earlier).await.unwrap();
        let before = results.store().inner.get_item(RESULTS_KEY).await.unwrap();

        results.store().refuse_writes.store(true, Ordering::SeqCst);
        let rows = SalaryCsvLoader::parse(TEST_CSV.as_bytes()).unwrap();
        let err = SalaryCsvLoader::load(&mut results, &rows).await.unwrap_err();

        assert!(matches!(err, SalaryImportError::Store(ResultStoreError::Write(_))));
        assert_eq!(results.records().len(), 1);
        assert_eq!(results.store().inner.get_item(RESULTS_KEY).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_load_rejects_salary_above_limit() {
        let csv = "first_name,last_name,gross_salary\nAna,Pérez,3000\nLuis,Soto,\"1,000,000,000\"";
        let rows = SalaryCsvLoader::parse(csv.as_bytes()).unwrap();
        let mut results = ResultStore::new(MemoryStore::new());

        let err = SalaryCsvLoader::load(&mut results, &rows).await.unwrap_err();

        assert!(matches!(
            err,
            SalaryImportError::InvalidRow {
                row: 2,
                source: ValidationError::SalaryTooLarge(_)
            }
        ));
        assert_eq!(results.store().write_count(), 0);
    }
}
