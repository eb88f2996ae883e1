use loan_assistant::assistant::{AssistantError, AssistantService, GeminiClient, ModelSelector};
use loan_assistant::config::AssistantConfig;
use loan_assistant::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type GeminiAssistant = AssistantService<GeminiClient>;

/// Fails with a configuration error when no API key is configured.
pub(crate) fn build_assistant(config: &AssistantConfig) -> Result<Arc<GeminiAssistant>, AppError> {
    let api_key = config.require_api_key()?;
    let client = GeminiClient::new(&config.base_url, api_key, config.request_timeout)
        .map_err(AssistantError::from)?;
    let selector = ModelSelector::new(config.preferred_models.clone());

    Ok(Arc::new(AssistantService::new(Arc::new(client), selector)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_assistant::config::ConfigError;
    use std::time::Duration;

    fn assistant_config(api_key: Option<&str>) -> AssistantConfig {
        AssistantConfig {
            api_key: api_key.map(str::to_string),
            base_url: "http://127.0.0.1:9".to_string(),
            preferred_models: vec!["gemini-1.5-mini".to_string()],
            request_timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn assistant_requires_api_key() {
        match build_assistant(&assistant_config(None)) {
            Err(AppError::Config(ConfigError::MissingApiKey)) => {}
            Err(other) => panic!("expected missing api key, got {other}"),
            Ok(_) => panic!("assistant built without an api key"),
        }
    }

    #[test]
    fn assistant_starts_without_a_selected_model() {
        let assistant =
            build_assistant(&assistant_config(Some("test-key"))).expect("client builds");
        assert!(assistant.current_model().is_none());
        assert_eq!(assistant.history().len(), 1);
    }
}
