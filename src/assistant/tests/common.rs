use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assistant::generator::{GenerationError, TextGenerator};
use crate::assistant::selection::{ModelSelector, PROBE_PROMPT};
use crate::assistant::service::{AssistantRequest, AssistantService};
use crate::eligibility::LoanFields;

/// In-memory provider with per-model behavior.
#[derive(Default)]
pub(super) struct ScriptedGenerator {
    /// Models that fail every call.
    pub(super) failing: Vec<String>,
    /// Models that answer probes but fail real prompts.
    pub(super) flaky: Vec<String>,
    /// Models that answer with empty text.
    pub(super) silent: Vec<String>,
    pub(super) listed: Vec<String>,
    pub(super) list_fails: bool,
    pub(super) reply: String,
    pub(super) calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub(super) fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    /// Non-probe prompts, in order.
    pub(super) fn prompts(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter(|(_, prompt)| prompt != PROBE_PROMPT)
            .collect()
    }
}

fn listed(names: &[String], model: &str) -> bool {
    names.iter().any(|name| name == model)
}

impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push((model.to_string(), prompt.to_string()));

        if listed(&self.failing, model) {
            return Err(GenerationError::Status {
                status: 500,
                body: format!("{model} offline"),
            });
        }
        if listed(&self.silent, model) {
            return Ok(String::new());
        }
        if prompt == PROBE_PROMPT {
            return Ok("testing model availability".to_string());
        }
        if listed(&self.flaky, model) {
            return Err(GenerationError::Status {
                status: 503,
                body: "overloaded".to_string(),
            });
        }
        Ok(self.reply.clone())
    }

    async fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        if self.list_fails {
            return Err(GenerationError::Status {
                status: 500,
                body: "listing disabled".to_string(),
            });
        }
        Ok(self.listed.clone())
    }
}

pub(super) fn names(models: &[&str]) -> Vec<String> {
    models.iter().map(|model| model.to_string()).collect()
}

pub(super) fn selector() -> ModelSelector {
    ModelSelector::new(names(&["gemini-1.5-mini", "gemini-1.5"]))
}

pub(super) fn service(
    generator: ScriptedGenerator,
) -> (Arc<AssistantService<ScriptedGenerator>>, Arc<ScriptedGenerator>) {
    let generator = Arc::new(generator);
    let service = Arc::new(AssistantService::new(generator.clone(), selector()));
    (service, generator)
}

pub(super) fn fields(income: &str, amount: &str, score: Option<&str>) -> LoanFields {
    LoanFields {
        monthly_income: Some(income.to_string()),
        loan_amount: Some(amount.to_string()),
        credit_score: score.map(str::to_string),
    }
}

pub(super) fn question(message: &str) -> AssistantRequest {
    AssistantRequest {
        message: message.to_string(),
        application: None,
    }
}

pub(super) fn eligibility_question(message: &str, application: LoanFields) -> AssistantRequest {
    AssistantRequest {
        message: message.to_string(),
        application: Some(application),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
