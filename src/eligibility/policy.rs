use super::domain::EligibilityTier;
use super::rules::AffordabilitySignals;

/// Outcome of the band cascade plus the text explaining which threshold decided it.
pub(crate) struct TierDecision {
    pub tier: EligibilityTier,
    pub rationale: String,
}

/// Applies the cascade. The band is chosen by credit score first; only that band's income
/// multiple is tested, and failing it rejects outright instead of trying a lower band.
pub(crate) fn decide_tier(signals: &AffordabilitySignals<'_>) -> TierDecision {
    let Some(band) = signals.band else {
        return TierDecision {
            tier: EligibilityTier::Rejected,
            rationale: format!(
                "{}: credit score {} is below every eligibility band",
                EligibilityTier::Rejected.guidance(),
                signals.credit_score
            ),
        };
    };

    let required_income = band.required_income(signals.installment);
    if signals.monthly_income >= required_income {
        return TierDecision {
            tier: band.tier,
            rationale: format!(
                "{}: credit score {} is in the {} band and monthly income {:.2} covers {:.1}x the {:.2} installment",
                band.tier.guidance(),
                signals.credit_score,
                band.score_range_label(),
                signals.monthly_income,
                band.income_multiple,
                signals.installment
            ),
        };
    }

    TierDecision {
        tier: EligibilityTier::Rejected,
        rationale: format!(
            "{}: credit score {} is in the {} band, which needs monthly income of at least {:.2} ({:.1}x the {:.2} installment), but income is {:.2}",
            EligibilityTier::Rejected.guidance(),
            signals.credit_score,
            band.score_range_label(),
            required_income,
            band.income_multiple,
            signals.installment,
            signals.monthly_income
        ),
    }
}
