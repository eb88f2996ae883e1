use serde::Serialize;

use super::domain::EligibilityTier;

/// Number of equal monthly payments assumed when estimating the installment.
pub const AMORTIZATION_MONTHS: u16 = 60;

/// Lowest credit score accepted as input.
pub const MIN_CREDIT_SCORE: u16 = 300;

/// Highest credit score accepted as input.
pub const MAX_CREDIT_SCORE: u16 = 900;

/// Shown alongside every result; the installment is a flat split with no interest.
pub const INSTALLMENT_APPROXIMATION_NOTE: &str =
    "Installment estimated as loan amount / 60 with no interest; actual repayments will be higher.";

/// Credit-score range paired with the income multiple required to earn a tier.
///
/// `min_score` is inclusive and `max_score` exclusive, so consecutive bands never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EligibilityBand {
    pub tier: EligibilityTier,
    pub min_score: u16,
    pub max_score: Option<u16>,
    pub income_multiple: f64,
}

impl EligibilityBand {
    pub fn covers(&self, credit_score: u16) -> bool {
        credit_score >= self.min_score
            && self
                .max_score
                .map(|upper| credit_score < upper)
                .unwrap_or(true)
    }

    pub fn required_income(&self, installment: f64) -> f64 {
        installment * self.income_multiple
    }

    pub fn score_range_label(&self) -> String {
        match self.max_score {
            Some(upper) => format!("{}-{}", self.min_score, upper - 1),
            None => format!("{}+", self.min_score),
        }
    }
}

/// Ordered band table, best tier first. Anything matching none of them is rejected.
pub const STANDARD_BANDS: [EligibilityBand; 3] = [
    EligibilityBand {
        tier: EligibilityTier::Approved,
        min_score: 750,
        max_score: None,
        income_multiple: 2.0,
    },
    EligibilityBand {
        tier: EligibilityTier::ConditionallyApproved,
        min_score: 650,
        max_score: Some(750),
        income_multiple: 2.5,
    },
    EligibilityBand {
        tier: EligibilityTier::HighRisk,
        min_score: 550,
        max_score: Some(650),
        income_multiple: 3.0,
    },
];
