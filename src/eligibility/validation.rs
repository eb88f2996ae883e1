use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::domain::LoanApplication;

/// Names the three inputs the classifier needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    MonthlyIncome,
    LoanAmount,
    CreditScore,
}

impl InputField {
    pub fn key(&self) -> &'static str {
        match self {
            InputField::MonthlyIncome => "monthly_income",
            InputField::LoanAmount => "loan_amount",
            InputField::CreditScore => "credit_score",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputField::MonthlyIncome => "monthly income",
            InputField::LoanAmount => "loan amount",
            InputField::CreditScore => "credit score",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The only failure the classifier reports: it could not decide from what it was given.
///
/// Missing data is kept apart from a `Rejected` decision so callers can re-prompt instead of
/// presenting a false outcome.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("{0} is required")]
    Missing(InputField),
    #[error("{field} must be a number (found '{raw}')")]
    NotNumeric { field: InputField, raw: String },
    #[error("{field} must be a positive amount (found {value})")]
    NotPositive { field: InputField, value: f64 },
    #[error("credit score must be between {min} and {max} (found {found})")]
    CreditScoreOutOfRange { found: i64, min: u16, max: u16 },
}

impl InvalidInput {
    pub fn field(&self) -> InputField {
        match self {
            InvalidInput::Missing(field) => *field,
            InvalidInput::NotNumeric { field, .. } => *field,
            InvalidInput::NotPositive { field, .. } => *field,
            InvalidInput::CreditScoreOutOfRange { .. } => InputField::CreditScore,
        }
    }
}

/// Numeric fields as a caller collected them, any of which may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanApplicationDraft {
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub loan_amount: Option<f64>,
    #[serde(default)]
    pub credit_score: Option<i64>,
}

impl LoanApplicationDraft {
    pub fn is_empty(&self) -> bool {
        self.monthly_income.is_none() && self.loan_amount.is_none() && self.credit_score.is_none()
    }

    /// Presence of every field is checked before any value is judged.
    pub fn validate(&self) -> Result<LoanApplication, InvalidInput> {
        let monthly_income = self
            .monthly_income
            .ok_or(InvalidInput::Missing(InputField::MonthlyIncome))?;
        let loan_amount = self
            .loan_amount
            .ok_or(InvalidInput::Missing(InputField::LoanAmount))?;
        let credit_score = self
            .credit_score
            .ok_or(InvalidInput::Missing(InputField::CreditScore))?;

        LoanApplication::new(monthly_income, loan_amount, credit_score)
    }
}

/// Raw cells, e.g. form inputs, CSV columns or JSON values that may be numbers or text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanFields {
    #[serde(default, deserialize_with = "number_or_text")]
    pub monthly_income: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub loan_amount: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub credit_score: Option<String>,
}

impl LoanFields {
    pub fn is_empty(&self) -> bool {
        self.monthly_income.is_none() && self.loan_amount.is_none() && self.credit_score.is_none()
    }

    pub fn parse(&self) -> Result<LoanApplication, InvalidInput> {
        let income = required(InputField::MonthlyIncome, self.monthly_income.as_deref())?;
        let amount = required(InputField::LoanAmount, self.loan_amount.as_deref())?;
        let score = required(InputField::CreditScore, self.credit_score.as_deref())?;

        let draft = LoanApplicationDraft {
            monthly_income: Some(parse_amount(InputField::MonthlyIncome, income)?),
            loan_amount: Some(parse_amount(InputField::LoanAmount, amount)?),
            credit_score: Some(parse_score(score)?),
        };
        draft.validate()
    }
}

fn number_or_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawValue {
        Integer(i64),
        Decimal(f64),
        Text(String),
    }

    let raw = Option::<RawValue>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        RawValue::Integer(number) => number.to_string(),
        RawValue::Decimal(number) => number.to_string(),
        RawValue::Text(text) => text,
    }))
}

fn required(field: InputField, raw: Option<&str>) -> Result<&str, InvalidInput> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(InvalidInput::Missing(field))
}

fn strip_separators(raw: &str) -> String {
    raw.chars()
        .filter(|ch| *ch != ',' && *ch != '_' && !ch.is_whitespace())
        .collect()
}

fn parse_amount(field: InputField, raw: &str) -> Result<f64, InvalidInput> {
    strip_separators(raw)
        .parse::<f64>()
        .map_err(|_| InvalidInput::NotNumeric {
            field,
            raw: raw.trim().to_string(),
        })
}

fn parse_score(raw: &str) -> Result<i64, InvalidInput> {
    let cleaned = strip_separators(raw);
    if let Ok(score) = cleaned.parse::<i64>() {
        return Ok(score);
    }

    // "750.0" is still a whole number; "750.5" is not a score.
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
        _ => Err(InvalidInput::NotNumeric {
            field: InputField::CreditScore,
            raw: raw.trim().to_string(),
        }),
    }
}
