use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::generator::TextGenerator;
use super::service::{AssistantReply, AssistantRequest, AssistantService};
use super::session::ChatMessage;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub(crate) struct HistoryView {
    pub(crate) model: Option<String>,
    pub(crate) messages: Vec<ChatMessage>,
}

/// Router builder exposing the chat endpoints.
pub fn assistant_router<G>(service: Arc<AssistantService<G>>) -> Router
where
    G: TextGenerator + 'static,
{
    Router::new()
        .route("/api/v1/assistant/messages", post(message_handler::<G>))
        .route(
            "/api/v1/assistant/history",
            get(history_handler::<G>).delete(reset_handler::<G>),
        )
        .with_state(service)
}

pub(crate) async fn message_handler<G>(
    State(service): State<Arc<AssistantService<G>>>,
    Json(request): Json<AssistantRequest>,
) -> Result<Json<AssistantReply>, AppError>
where
    G: TextGenerator + 'static,
{
    match service.ask(request).await {
        Ok(reply) => Ok(Json(reply)),
        Err(err) => {
            let err = AppError::from(err);
            if err.status().is_server_error() {
                tracing::warn!(error = %err, "assistant could not answer");
            }
            Err(err)
        }
    }
}

pub(crate) async fn history_handler<G>(
    State(service): State<Arc<AssistantService<G>>>,
) -> Json<HistoryView>
where
    G: TextGenerator + 'static,
{
    Json(HistoryView {
        model: service.current_model(),
        messages: service.history(),
    })
}

pub(crate) async fn reset_handler<G>(State(service): State<Arc<AssistantService<G>>>) -> StatusCode
where
    G: TextGenerator + 'static,
{
    service.reset();
    StatusCode::NO_CONTENT
}
