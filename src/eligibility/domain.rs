use serde::{Deserialize, Serialize};

use super::config::{MAX_CREDIT_SCORE, MIN_CREDIT_SCORE};
use super::validation::{InputField, InvalidInput};

/// Eligibility outcomes ordered from lowest to highest risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityTier {
    Approved,
    ConditionallyApproved,
    HighRisk,
    Rejected,
}

impl EligibilityTier {
    pub const ALL: [EligibilityTier; 4] = [
        EligibilityTier::Approved,
        EligibilityTier::ConditionallyApproved,
        EligibilityTier::HighRisk,
        EligibilityTier::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EligibilityTier::Approved => "Approved",
            EligibilityTier::ConditionallyApproved => "Conditionally Approved",
            EligibilityTier::HighRisk => "High Risk",
            EligibilityTier::Rejected => "Rejected",
        }
    }

    /// Short guidance shown at the start of every rationale for this tier.
    pub fn guidance(&self) -> &'static str {
        match self {
            EligibilityTier::Approved => "Excellent eligibility, low risk",
            EligibilityTier::ConditionallyApproved => {
                "Conditional approval, stable income proof needed"
            }
            EligibilityTier::HighRisk => "High risk, guarantor or collateral needed",
            EligibilityTier::Rejected => "Income or credit score too low",
        }
    }
}

impl std::fmt::Display for EligibilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated loan request. Only constructible through [`LoanApplication::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanApplication {
    monthly_income: f64,
    loan_amount: f64,
    credit_score: u16,
}

impl LoanApplication {
    pub fn new(
        monthly_income: f64,
        loan_amount: f64,
        credit_score: i64,
    ) -> Result<Self, InvalidInput> {
        let monthly_income = positive_amount(InputField::MonthlyIncome, monthly_income)?;
        let loan_amount = positive_amount(InputField::LoanAmount, loan_amount)?;

        let in_range = credit_score >= i64::from(MIN_CREDIT_SCORE)
            && credit_score <= i64::from(MAX_CREDIT_SCORE);
        if !in_range {
            return Err(InvalidInput::CreditScoreOutOfRange {
                found: credit_score,
                min: MIN_CREDIT_SCORE,
                max: MAX_CREDIT_SCORE,
            });
        }

        Ok(Self {
            monthly_income,
            loan_amount,
            credit_score: credit_score as u16,
        })
    }

    pub fn monthly_income(&self) -> f64 {
        self.monthly_income
    }

    pub fn loan_amount(&self) -> f64 {
        self.loan_amount
    }

    pub fn credit_score(&self) -> u16 {
        self.credit_score
    }
}

fn positive_amount(field: InputField, value: f64) -> Result<f64, InvalidInput> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(InvalidInput::NotPositive { field, value })
    }
}

/// Classification output handed back to callers for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub tier: EligibilityTier,
    pub monthly_installment: f64,
    pub rationale: String,
    pub approximation_note: String,
}

impl EligibilityResult {
    pub fn summary(&self) -> String {
        format!(
            "{} (installment {:.2}/month): {}",
            self.tier.label(),
            self.monthly_installment,
            self.rationale
        )
    }
}
