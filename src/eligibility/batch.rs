use csv::ByteRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use super::domain::{EligibilityResult, EligibilityTier};
use super::validation::{InputField, InvalidInput, LoanFields};
use super::EligibilityClassifier;

const REQUIRED_COLUMNS: [InputField; 3] = [
    InputField::MonthlyIncome,
    InputField::LoanAmount,
    InputField::CreditScore,
];

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(InputField),
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read applications file: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid applications CSV data: {}", err),
            BatchImportError::MissingColumn(field) => {
                write!(f, "applications CSV is missing the '{}' column", field.key())
            }
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
            BatchImportError::MissingColumn(_) => None,
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One data row and how it fared. Invalid rows never stop the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub line: u64,
    pub outcome: Result<EligibilityResult, InvalidInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub tiers: BTreeMap<EligibilityTier, usize>,
    pub invalid: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        classifier: &EligibilityClassifier,
    ) -> Result<Self, BatchImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, classifier)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        classifier: &EligibilityClassifier,
    ) -> Result<Self, BatchImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut columns = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for field in REQUIRED_COLUMNS {
            let index = headers
                .iter()
                .position(|header| header == field.key())
                .ok_or(BatchImportError::MissingColumn(field))?;
            columns.push((field, index));
        }

        let mut entries = Vec::new();
        for record in csv_reader.byte_records() {
            let record = record?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();

            let outcome = row_fields(&record, &columns)
                .parse()
                .map(|application| classifier.classify(&application));
            entries.push(BatchEntry { line, outcome });
        }

        let report = Self { entries };
        let summary = report.summary();
        tracing::info!(
            total = summary.total,
            invalid = summary.invalid,
            "classified application batch"
        );
        Ok(report)
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.entries.len(),
            ..BatchSummary::default()
        };

        for entry in &self.entries {
            match &entry.outcome {
                Ok(result) => *summary.tiers.entry(result.tier).or_insert(0) += 1,
                Err(_) => summary.invalid += 1,
            }
        }

        summary
    }
}

/// Short rows leave trailing fields absent; undecodable bytes are kept as lossy text so they
/// surface as non-numeric input for that row.
fn row_fields(record: &ByteRecord, columns: &[(InputField, usize)]) -> LoanFields {
    let mut fields = LoanFields::default();
    for (field, index) in columns {
        let cell = record
            .get(*index)
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
            .filter(|text| !text.is_empty());

        match field {
            InputField::MonthlyIncome => fields.monthly_income = cell,
            InputField::LoanAmount => fields.loan_amount = cell,
            InputField::CreditScore => fields.credit_score = cell,
        }
    }
    fields
}
