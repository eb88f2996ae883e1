use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

use super::generator::{GenerationError, TextGenerator};
use super::prompt::{advisor_prompt, deterministic_reply, with_decision_line};
use super::selection::{ModelSelectionError, ModelSelector};
use super::session::{ChatMessage, ChatSession};
use crate::eligibility::{EligibilityClassifier, EligibilityResult, InvalidInput, LoanFields};

/// Inbound chat turn. `application` carries the numeric fields when the surface collected them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
    #[serde(default)]
    pub application: Option<LoanFields>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Model,
    Deterministic,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub reply: String,
    pub source: ReplySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<EligibilityResult>,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("message must not be empty")]
    EmptyMessage,
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    ModelSelection(#[from] ModelSelectionError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

struct SessionState {
    session: ChatSession,
    model: Option<String>,
    reselected: bool,
    /// Set once no model could be found; later turns fail fast until `reset()`.
    selection_failure: Option<ModelSelectionError>,
}

/// Chat glue around the classifier: records the transcript, computes any decision locally and
/// asks the provider only to phrase it.
pub struct AssistantService<G> {
    generator: Arc<G>,
    classifier: EligibilityClassifier,
    selector: ModelSelector,
    state: Mutex<SessionState>,
}

impl<G> AssistantService<G>
where
    G: TextGenerator + 'static,
{
    pub fn new(generator: Arc<G>, selector: ModelSelector) -> Self {
        Self {
            generator,
            classifier: EligibilityClassifier::standard(),
            selector,
            state: Mutex::new(SessionState {
                session: ChatSession::new(),
                model: None,
                reselected: false,
                selection_failure: None,
            }),
        }
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.lock_state().session.messages().to_vec()
    }

    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.session.reset();
        state.reselected = false;
        state.selection_failure = None;
    }

    pub fn current_model(&self) -> Option<String> {
        self.lock_state().model.clone()
    }

    /// Handle one user turn.
    pub async fn ask(&self, request: AssistantRequest) -> Result<AssistantReply, AssistantError> {
        let message = request.message.trim().to_string();
        if message.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }

        self.lock_state().session.push_user(message.clone());

        let eligibility = match request.application.filter(|fields| !fields.is_empty()) {
            Some(fields) => {
                let application = fields.parse()?;
                Some(self.classifier.classify(&application))
            }
            None => None,
        };

        let prompt = advisor_prompt(&message, eligibility.as_ref());
        let (reply, source, model) = match (self.generate(&prompt).await, &eligibility) {
            (Ok((text, model)), Some(result)) => {
                (with_decision_line(&text, result), ReplySource::Model, Some(model))
            }
            (Ok((text, model)), None) => (text, ReplySource::Model, Some(model)),
            (Err(err), Some(result)) => {
                warn!(error = %err, "provider unavailable; replying with computed decision");
                (deterministic_reply(result), ReplySource::Deterministic, None)
            }
            (Err(err), None) => return Err(err),
        };

        self.lock_state().session.push_assistant(reply.clone());

        Ok(AssistantReply {
            reply,
            source,
            model,
            eligibility,
        })
    }

    /// Generates with the session's model, re-selecting once per session when it fails.
    async fn generate(&self, prompt: &str) -> Result<(String, String), AssistantError> {
        let model = self.ensure_model().await?;

        let err = match self.generate_with(&model, prompt).await {
            Ok(text) => return Ok((text, model)),
            Err(err) => err,
        };

        let may_reselect = {
            let mut state = self.lock_state();
            !std::mem::replace(&mut state.reselected, true)
        };
        if !may_reselect {
            return Err(err.into());
        }

        warn!(%model, error = %err, "model call failed; looking for an alternative model");
        let alternative = self.select(Some(&model)).await?;
        self.lock_state().model = Some(alternative.clone());
        info!(from = %model, to = %alternative, "switched model");

        let text = self.generate_with(&alternative, prompt).await?;
        Ok((text, alternative))
    }

    async fn ensure_model(&self) -> Result<String, AssistantError> {
        {
            let state = self.lock_state();
            if let Some(model) = &state.model {
                return Ok(model.clone());
            }
            if let Some(failure) = &state.selection_failure {
                return Err(failure.clone().into());
            }
        }

        let model = self.select(None).await?;
        self.lock_state().model = Some(model.clone());
        Ok(model)
    }

    async fn select(&self, exclude: Option<&str>) -> Result<String, ModelSelectionError> {
        let selected = self.selector.choose(self.generator.as_ref(), exclude).await;
        if let Err(failure) = &selected {
            let mut state = self.lock_state();
            state.model = None;
            state.selection_failure = Some(failure.clone());
        }
        selected
    }

    async fn generate_with(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        let text = self.generator.generate(model, prompt).await?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(GenerationError::EmptyReply {
                model: model.to_string(),
            });
        }
        Ok(trimmed.to_string())
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
