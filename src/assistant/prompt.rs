use crate::eligibility::EligibilityResult;

const DECISION_MARKER: &str = "FINAL DECISION:";

/// Builds the advisor prompt. When a decision exists it is handed over as fixed ground truth;
/// the model is asked to explain it, never to re-derive it.
pub fn advisor_prompt(user_message: &str, eligibility: Option<&EligibilityResult>) -> String {
    let mut prompt = String::from(
        "You are a loan advisor. Answer the user's question clearly and briefly.\n\n",
    );

    match eligibility {
        Some(result) => {
            prompt.push_str(
                "The bank's rules engine has already assessed this applicant. These figures are \
                 final: explain them in plain language, do not recalculate or change them.\n",
            );
            prompt.push_str(&format!("- Decision: {}\n", result.tier.label()));
            prompt.push_str(&format!(
                "- Estimated monthly installment: {:.2} (loan amount / 60, interest not included)\n",
                result.monthly_installment
            ));
            prompt.push_str(&format!("- Reason: {}\n\n", result.rationale));
            prompt.push_str(&format!(
                "End your answer with a line starting with: {} {}\n",
                DECISION_MARKER,
                result.tier.label()
            ));
        }
        None => {
            prompt.push_str(
                "No eligibility check has been run. If the user asks whether they qualify, \
                 explain that a decision needs their monthly income, loan amount and credit \
                 score, and ask for whichever is missing. Do not guess an eligibility decision.\n",
            );
        }
    }

    prompt.push_str(&format!("\nUser: {}\n", user_message.trim()));
    prompt
}

/// Drops any decision line the model wrote and appends the computed one.
pub fn with_decision_line(reply: &str, result: &EligibilityResult) -> String {
    let body = reply
        .lines()
        .filter(|line| !line.to_ascii_uppercase().contains(DECISION_MARKER))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\n{} {}",
        body.trim_end(),
        DECISION_MARKER,
        result.tier.label()
    )
}

/// Reply used when no model could phrase the decision.
pub fn deterministic_reply(result: &EligibilityResult) -> String {
    format!(
        "{}\n{}\n\n{} {}",
        result.summary(),
        result.approximation_note,
        DECISION_MARKER,
        result.tier.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::{evaluate, EligibilityTier};

    fn approved() -> EligibilityResult {
        evaluate(50_000.0, 600_000.0, 800).expect("valid input")
    }

    #[test]
    fn prompt_carries_decision_as_ground_truth() {
        let prompt = advisor_prompt("Can I get this loan?", Some(&approved()));

        assert!(prompt.contains("- Decision: Approved"));
        assert!(prompt.contains("10000.00"));
        assert!(prompt.contains("do not recalculate"));
        assert!(prompt.ends_with("User: Can I get this loan?\n"));
    }

    #[test]
    fn prompt_without_decision_forbids_guessing() {
        let prompt = advisor_prompt("  What documents do I need? ", None);

        assert!(prompt.contains("Do not guess an eligibility decision"));
        assert!(!prompt.contains("- Decision:"));
        assert!(prompt.contains("User: What documents do I need?"));
    }

    #[test]
    fn decision_line_from_model_is_replaced() {
        let rejected = evaluate(15_000.0, 600_000.0, 600).expect("valid input");
        assert_eq!(rejected.tier, EligibilityTier::Rejected);

        let reply = with_decision_line(
            "Your score is fair.\n➡ FINAL DECISION: Approved\n",
            &rejected,
        );

        assert!(!reply.contains("FINAL DECISION: Approved"));
        assert!(reply.ends_with("FINAL DECISION: Rejected"));
        assert!(reply.starts_with("Your score is fair."));
    }

    #[test]
    fn deterministic_reply_mentions_installment_caveat() {
        let reply = deterministic_reply(&approved());

        assert!(reply.starts_with("Approved (installment 10000.00/month)"));
        assert!(reply.contains("no interest"));
        assert!(reply.ends_with("FINAL DECISION: Approved"));
    }
}
