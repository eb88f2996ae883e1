use crate::eligibility::{
    EligibilityClassifier, EligibilityResult, EligibilityTier, LoanApplication,
};

pub(super) fn classifier() -> EligibilityClassifier {
    EligibilityClassifier::standard()
}

pub(super) fn application(
    monthly_income: f64,
    loan_amount: f64,
    credit_score: i64,
) -> LoanApplication {
    LoanApplication::new(monthly_income, loan_amount, credit_score).expect("valid application")
}

pub(super) fn classify(
    monthly_income: f64,
    loan_amount: f64,
    credit_score: i64,
) -> EligibilityResult {
    classifier().classify(&application(monthly_income, loan_amount, credit_score))
}

pub(super) fn tier_of(
    monthly_income: f64,
    loan_amount: f64,
    credit_score: i64,
) -> EligibilityTier {
    classify(monthly_income, loan_amount, credit_score).tier
}

pub(super) const APPLICATIONS_CSV: &str = "\
applicant,monthly_income,loan_amount,credit_score
alpha,50000,600000,800
bravo,\"26,000\",600000,700
charlie,15000,600000,600
delta,40000,600000,
echo,abc,600000,720
foxtrot,31000,600000,560
";
