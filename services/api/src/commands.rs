use crate::infra::build_assistant;
use clap::Args;
use loan_assistant::assistant::{AssistantReply, AssistantRequest, ReplySource};
use loan_assistant::config::AppConfig;
use loan_assistant::eligibility::{
    BatchEntry, BatchReport, EligibilityClassifier, EligibilityResult, EligibilityTier, LoanFields,
};
use loan_assistant::error::AppError;
use loan_assistant::telemetry;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Monthly income; thousands separators are accepted
    #[arg(long)]
    pub(crate) monthly_income: String,
    /// Requested loan amount
    #[arg(long)]
    pub(crate) loan_amount: String,
    /// Credit score (300-900)
    #[arg(long)]
    pub(crate) credit_score: String,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with monthly_income, loan_amount and credit_score columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print per-row outcomes and the summary as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AskArgs {
    /// Message to send to the assistant
    #[arg(long)]
    pub(crate) message: String,
    /// Monthly income to evaluate alongside the message
    #[arg(long)]
    pub(crate) monthly_income: Option<String>,
    /// Loan amount to evaluate alongside the message
    #[arg(long)]
    pub(crate) loan_amount: Option<String>,
    /// Credit score to evaluate alongside the message
    #[arg(long)]
    pub(crate) credit_score: Option<String>,
    /// Print the reply as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let fields = LoanFields {
        monthly_income: Some(args.monthly_income),
        loan_amount: Some(args.loan_amount),
        credit_score: Some(args.credit_score),
    };
    let application = fields.parse()?;
    let result = EligibilityClassifier::standard().classify(&application);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render_result(&result));
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let report = BatchReport::from_path(&args.csv, &EligibilityClassifier::standard())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&BatchView::from(&report))?);
    } else {
        println!("{}", render_batch(&report));
    }
    Ok(())
}

pub(crate) async fn run_ask(args: AskArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let assistant = build_assistant(&config.assistant)?;

    let application = LoanFields {
        monthly_income: args.monthly_income,
        loan_amount: args.loan_amount,
        credit_score: args.credit_score,
    };
    let request = AssistantRequest {
        message: args.message,
        application: Some(application),
    };
    let reply = assistant.ask(request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", render_reply(&reply));
    }
    Ok(())
}

pub(crate) fn render_result(result: &EligibilityResult) -> String {
    format!(
        "Decision: {}\nEstimated installment: {:.2} per month\nReason: {}\nNote: {}",
        result.tier.label(),
        result.monthly_installment,
        result.rationale,
        result.approximation_note
    )
}

pub(crate) fn render_batch(report: &BatchReport) -> String {
    let mut lines: Vec<String> = report.entries.iter().map(render_entry).collect();

    let summary = report.summary();
    lines.push(String::new());
    lines.push(format!("{} applications", summary.total));
    for tier in EligibilityTier::ALL {
        let count = summary.tiers.get(&tier).copied().unwrap_or_default();
        lines.push(format!("- {}: {}", tier.label(), count));
    }
    lines.push(format!("- Invalid: {}", summary.invalid));

    lines.join("\n")
}

fn render_entry(entry: &BatchEntry) -> String {
    match &entry.outcome {
        Ok(result) => format!(
            "line {}: {} ({:.2}/month)",
            entry.line,
            result.tier.label(),
            result.monthly_installment
        ),
        Err(err) => format!("line {}: invalid input: {}", entry.line, err),
    }
}

pub(crate) fn render_reply(reply: &AssistantReply) -> String {
    let mut rendered = reply.reply.clone();
    match (&reply.source, &reply.model) {
        (ReplySource::Model, Some(model)) => {
            rendered.push_str(&format!("\n\n(answered by {model})"))
        }
        (ReplySource::Deterministic, _) => {
            rendered.push_str("\n\n(assistant unavailable; showing the computed decision)")
        }
        _ => {}
    }
    rendered
}

#[derive(Debug, Serialize)]
struct BatchView<'a> {
    entries: Vec<BatchEntryView<'a>>,
    summary: loan_assistant::eligibility::BatchSummary,
}

#[derive(Debug, Serialize)]
struct BatchEntryView<'a> {
    line: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a EligibilityResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a BatchReport> for BatchView<'a> {
    fn from(report: &'a BatchReport) -> Self {
        let entries = report
            .entries
            .iter()
            .map(|entry| BatchEntryView {
                line: entry.line,
                result: entry.outcome.as_ref().ok(),
                error: entry.outcome.as_ref().err().map(ToString::to_string),
            })
            .collect();

        Self {
            entries,
            summary: report.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_assistant::eligibility::evaluate;
    use std::io::Cursor;

    const CSV: &str = "monthly_income,loan_amount,credit_score\n\
50000,600000,800\n\
15000,600000,600\n\
40000,600000,\n";

    fn report() -> BatchReport {
        BatchReport::from_reader(Cursor::new(CSV), &EligibilityClassifier::standard())
            .expect("csv parses")
    }

    #[test]
    fn result_rendering_lists_decision_and_note() {
        let result = evaluate(50_000.0, 600_000.0, 800).expect("valid input");
        let rendered = render_result(&result);

        assert!(rendered.starts_with("Decision: Approved"));
        assert!(rendered.contains("Estimated installment: 10000.00 per month"));
        assert!(rendered.contains("no interest"));
    }

    #[test]
    fn batch_rendering_lists_rows_and_totals() {
        let rendered = render_batch(&report());

        assert!(rendered.contains("line 2: Approved (10000.00/month)"));
        assert!(rendered.contains("line 3: Rejected"));
        assert!(rendered.contains("line 4: invalid input: credit score is required"));
        assert!(rendered.contains("3 applications"));
        assert!(rendered.contains("- High Risk: 0"));
        assert!(rendered.contains("- Invalid: 1"));
    }

    #[test]
    fn batch_json_keeps_errors_next_to_results() {
        let report = report();
        let value = serde_json::to_value(BatchView::from(&report)).expect("serializes");

        assert_eq!(value["entries"][0]["result"]["tier"], "approved");
        assert!(value["entries"][0].get("error").is_none());
        assert_eq!(value["entries"][2]["error"], "credit score is required");
        assert_eq!(value["summary"]["invalid"], 1);
        assert_eq!(value["summary"]["tiers"]["rejected"], 1);
    }

    #[test]
    fn deterministic_replies_are_flagged() {
        let reply = AssistantReply {
            reply: "Approved".to_string(),
            source: ReplySource::Deterministic,
            model: None,
            eligibility: None,
        };
        assert!(render_reply(&reply).ends_with("showing the computed decision)"));
    }
}
