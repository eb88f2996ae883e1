use tracing::{debug, info, warn};

use super::generator::TextGenerator;

/// Prompt used to check that a model answers at all.
pub const PROBE_PROMPT: &str = "Say: testing model availability";

#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelSelectionError {
    #[error("no usable model found: every preferred and listed model failed to answer")]
    Exhausted,
    #[error("no usable model found: failed to list models: {0}")]
    Listing(String),
}

/// Picks the first model that answers a probe, preferring the configured list and then
/// whatever the provider lists (Gemini models ahead of the rest).
#[derive(Debug, Clone)]
pub struct ModelSelector {
    preferred: Vec<String>,
}

impl ModelSelector {
    pub fn new(preferred: Vec<String>) -> Self {
        Self { preferred }
    }

    pub fn preferred(&self) -> &[String] {
        &self.preferred
    }

    /// `exclude` skips a model already known to be failing.
    pub async fn choose<G: TextGenerator>(
        &self,
        generator: &G,
        exclude: Option<&str>,
    ) -> Result<String, ModelSelectionError> {
        let mut tried: Vec<String> = exclude.map(str::to_string).into_iter().collect();

        for model in &self.preferred {
            if tried.contains(model) {
                continue;
            }
            tried.push(model.clone());
            if probe(generator, model).await {
                info!(%model, "selected preferred model");
                return Ok(model.clone());
            }
        }

        let listed = generator
            .list_models()
            .await
            .map_err(|err| ModelSelectionError::Listing(err.to_string()))?;

        for model in listing_order(listed) {
            if tried.contains(&model) {
                continue;
            }
            tried.push(model.clone());
            if probe(generator, &model).await {
                info!(%model, "selected listed model");
                return Ok(model);
            }
        }

        warn!(attempted = tried.len(), "no model answered the availability probe");
        Err(ModelSelectionError::Exhausted)
    }
}

async fn probe<G: TextGenerator>(generator: &G, model: &str) -> bool {
    match generator.generate(model, PROBE_PROMPT).await {
        Ok(text) if !text.trim().is_empty() => true,
        Ok(_) => {
            debug!(%model, "model returned empty probe reply");
            false
        }
        Err(err) => {
            debug!(%model, error = %err, "model probe failed");
            false
        }
    }
}

fn listing_order(listed: Vec<String>) -> Vec<String> {
    let (mut gemini, others): (Vec<String>, Vec<String>) = listed
        .into_iter()
        .partition(|name| name.to_ascii_lowercase().contains("gemini"));
    gemini.extend(others);
    gemini
}
