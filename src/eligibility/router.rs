use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use super::{EligibilityBand, EligibilityClassifier, EligibilityResult, LoanFields};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub(crate) struct BandTableView {
    pub(crate) amortization_months: u16,
    pub(crate) bands: &'static [EligibilityBand],
}

/// Stateless routes; they never touch the generative provider.
pub fn eligibility_router() -> Router {
    Router::new()
        .route("/api/v1/eligibility", post(evaluate_handler))
        .route("/api/v1/eligibility/bands", get(bands_handler))
}

pub(crate) async fn evaluate_handler(
    Json(fields): Json<LoanFields>,
) -> Result<Json<EligibilityResult>, AppError> {
    let application = fields.parse()?;
    let result = EligibilityClassifier::standard().classify(&application);
    tracing::debug!(tier = ?result.tier, "evaluated eligibility request");
    Ok(Json(result))
}

pub(crate) async fn bands_handler() -> Json<BandTableView> {
    Json(BandTableView {
        amortization_months: super::AMORTIZATION_MONTHS,
        bands: EligibilityClassifier::standard().bands(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::{EligibilityTier, InputField, InvalidInput};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn post_json(body: Value) -> (StatusCode, Value) {
        let response = eligibility_router()
            .oneshot(
                Request::post("/api/v1/eligibility")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json payload"))
    }

    #[tokio::test]
    async fn evaluate_handler_classifies_numeric_fields() {
        let Json(result) = evaluate_handler(Json(LoanFields {
            monthly_income: Some("50000".to_string()),
            loan_amount: Some("600000".to_string()),
            credit_score: Some("800".to_string()),
        }))
        .await
        .expect("valid request");

        assert_eq!(result.tier, EligibilityTier::Approved);
        assert_eq!(result.monthly_installment, 10_000.0);
    }

    #[tokio::test]
    async fn evaluate_handler_reports_missing_fields() {
        let err = evaluate_handler(Json(LoanFields {
            monthly_income: Some("50000".to_string()),
            loan_amount: Some("600000".to_string()),
            credit_score: None,
        }))
        .await
        .expect_err("credit score missing");

        assert!(matches!(
            err,
            AppError::Eligibility(InvalidInput::Missing(InputField::CreditScore))
        ));
    }

    #[tokio::test]
    async fn route_accepts_numbers_and_text() {
        let (status, payload) = post_json(json!({
            "monthly_income": 18000,
            "loan_amount": "600,000",
            "credit_score": 760
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["tier"], "rejected");
        assert_eq!(payload["monthly_installment"], 10000.0);
    }

    #[tokio::test]
    async fn route_returns_unprocessable_for_invalid_input() {
        let (status, payload) = post_json(json!({
            "monthly_income": "lots",
            "loan_amount": 600000,
            "credit_score": 700
        }))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(payload["field"], "monthly_income");
        assert!(payload["error"]
            .as_str()
            .expect("error message")
            .contains("must be a number"));
    }

    #[tokio::test]
    async fn bands_route_lists_the_cascade() {
        let response = eligibility_router()
            .oneshot(
                Request::get("/api/v1/eligibility/bands")
                    .body(axum::body::Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        let payload: Value = serde_json::from_slice(&bytes).expect("json payload");
        assert_eq!(payload["amortization_months"], 60);
        assert_eq!(payload["bands"][0]["tier"], "approved");
        assert_eq!(payload["bands"][2]["income_multiple"], 3.0);
    }
}
