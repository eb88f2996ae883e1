//! Deterministic loan eligibility classification.
//!
//! An application is placed in exactly one of four tiers by an ordered credit-score band table
//! and a flat 60-month installment estimate. Classification is pure; `batch` and `router` are
//! the CSV and HTTP adapters around it.

pub mod batch;
mod config;
pub mod domain;
mod policy;
pub mod router;
mod rules;
pub mod validation;

#[cfg(test)]
mod tests;

pub use batch::{BatchEntry, BatchImportError, BatchReport, BatchSummary};
pub use config::{
    EligibilityBand, AMORTIZATION_MONTHS, INSTALLMENT_APPROXIMATION_NOTE, MAX_CREDIT_SCORE,
    MIN_CREDIT_SCORE, STANDARD_BANDS,
};
pub use domain::{EligibilityResult, EligibilityTier, LoanApplication};
pub use router::eligibility_router;
pub use validation::{InputField, InvalidInput, LoanApplicationDraft, LoanFields};

use policy::decide_tier;

/// Stateless classifier over a fixed band table.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityClassifier {
    bands: &'static [EligibilityBand],
    amortization_months: u16,
}

impl Default for EligibilityClassifier {
    fn default() -> Self {
        Self::standard()
    }
}

impl EligibilityClassifier {
    pub const fn standard() -> Self {
        Self {
            bands: &STANDARD_BANDS,
            amortization_months: AMORTIZATION_MONTHS,
        }
    }

    pub fn bands(&self) -> &'static [EligibilityBand] {
        self.bands
    }

    pub fn classify(&self, application: &LoanApplication) -> EligibilityResult {
        let signals = rules::collect_signals(application, self.bands, self.amortization_months);
        let decision = decide_tier(&signals);

        EligibilityResult {
            tier: decision.tier,
            monthly_installment: signals.installment,
            rationale: decision.rationale,
            approximation_note: INSTALLMENT_APPROXIMATION_NOTE.to_string(),
        }
    }

    pub fn classify_draft(
        &self,
        draft: &LoanApplicationDraft,
    ) -> Result<EligibilityResult, InvalidInput> {
        let application = draft.validate()?;
        Ok(self.classify(&application))
    }
}

/// Validates the three inputs and classifies them with the standard band table.
pub fn evaluate(
    monthly_income: f64,
    loan_amount: f64,
    credit_score: i64,
) -> Result<EligibilityResult, InvalidInput> {
    let application = LoanApplication::new(monthly_income, loan_amount, credit_score)?;
    Ok(EligibilityClassifier::standard().classify(&application))
}
