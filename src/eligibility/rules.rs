use super::config::EligibilityBand;
use super::domain::LoanApplication;

/// Figures the policy needs, computed once per application.
pub(crate) struct AffordabilitySignals<'a> {
    pub installment: f64,
    pub monthly_income: f64,
    pub credit_score: u16,
    /// First band whose score range covers the applicant, if any.
    pub band: Option<&'a EligibilityBand>,
}

pub(crate) fn monthly_installment(loan_amount: f64, amortization_months: u16) -> f64 {
    loan_amount / f64::from(amortization_months)
}

pub(crate) fn collect_signals<'a>(
    application: &LoanApplication,
    bands: &'a [EligibilityBand],
    amortization_months: u16,
) -> AffordabilitySignals<'a> {
    let credit_score = application.credit_score();
    let band = bands.iter().find(|band| band.covers(credit_score));

    AffordabilitySignals {
        installment: monthly_installment(application.loan_amount(), amortization_months),
        monthly_income: application.monthly_income(),
        credit_score,
        band,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::config::{AMORTIZATION_MONTHS, STANDARD_BANDS};
    use crate::eligibility::EligibilityTier;

    #[test]
    fn installment_is_a_flat_sixty_month_split() {
        assert_eq!(monthly_installment(600_000.0, AMORTIZATION_MONTHS), 10_000.0);
        assert_eq!(monthly_installment(90.0, AMORTIZATION_MONTHS), 1.5);
    }

    #[test]
    fn signals_pick_the_band_by_score_alone() {
        let application = LoanApplication::new(1.0, 600_000.0, 760).expect("valid application");
        let signals = collect_signals(&application, &STANDARD_BANDS, AMORTIZATION_MONTHS);

        let band = signals.band.expect("score 760 has a band");
        assert_eq!(band.tier, EligibilityTier::Approved);
        assert_eq!(signals.installment, 10_000.0);
    }

    #[test]
    fn scores_below_every_band_have_no_band() {
        let application = LoanApplication::new(50_000.0, 1_000.0, 549).expect("valid application");
        let signals = collect_signals(&application, &STANDARD_BANDS, AMORTIZATION_MONTHS);
        assert!(signals.band.is_none());
    }
}
