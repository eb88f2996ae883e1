use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use loan_assistant::assistant::{assistant_router, AssistantService, TextGenerator};
use loan_assistant::eligibility::eligibility_router;
use serde_json::json;
use std::sync::Arc;

/// Eligibility routes are always served; chat routes only when an assistant is configured.
pub(crate) fn app_router<G>(assistant: Option<Arc<AssistantService<G>>>) -> Router
where
    G: TextGenerator + 'static,
{
    let mut router = eligibility_router();
    if let Some(service) = assistant {
        router = router.merge(assistant_router(service));
    }

    router
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::GeminiAssistant;
    use axum::body::Body;
    use axum::http::Request;
    use loan_assistant::assistant::GeminiClient;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn router_without_assistant(state: AppState) -> Router {
        app_router::<GeminiClient>(None).layer(Extension(state))
    }

    async fn get_status(router: Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes")
            .status()
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let state = state(false);
        let router = router_without_assistant(state.clone());

        assert_eq!(
            get_status(router.clone(), "/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );

        state.readiness.store(true, Ordering::Release);
        assert_eq!(get_status(router, "/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_text() {
        let router = router_without_assistant(state(true));
        assert_eq!(get_status(router, "/metrics").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn eligibility_routes_are_always_mounted() {
        let router = router_without_assistant(state(true));
        assert_eq!(
            get_status(router, "/api/v1/eligibility/bands").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn assistant_routes_are_absent_without_a_provider() {
        let router = router_without_assistant(state(true));
        assert_eq!(
            get_status(router, "/api/v1/assistant/history").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn assistant_routes_are_mounted_with_a_provider() {
        let client = GeminiClient::new(
            "http://127.0.0.1:9",
            "test-key",
            std::time::Duration::from_secs(1),
        )
        .expect("client builds");
        let assistant: Arc<GeminiAssistant> = Arc::new(AssistantService::new(
            Arc::new(client),
            loan_assistant::assistant::ModelSelector::new(vec!["gemini-1.5-mini".to_string()]),
        ));
        let router = app_router(Some(assistant)).layer(Extension(state(true)));

        assert_eq!(
            get_status(router, "/api/v1/assistant/history").await,
            StatusCode::OK
        );
    }
}
