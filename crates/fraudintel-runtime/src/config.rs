//! Runtime configuration.
//!
//! Environment knobs:
//! - `FRAUDINTEL_CACHE` — completion caching on/off (default `true`)
//! - `FRAUDINTEL_CALL_TIMEOUT` — per-call timeout in humantime form,
//!   e.g. `90s` or `2m` (default 60s)
//! - `ENABLE_INSTRUMENTATION` — widen the default log filter so reasoning
//!   spans are emitted (observational only; never changes outputs)

use std::time::Duration;

use crate::providers::{CompletionConfig, ModelId, ProviderError};

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Default model identifier, in `provider/model` form.
pub const DEFAULT_MODEL: &str = "openai/gpt-5-2025-08-07";

/// Configuration for one runtime (producer + judge + harness).
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Parsed `provider/model` identifier
    pub model: ModelId,

    /// Sampling temperature
    pub temperature: f32,

    /// Completion caching on/off
    pub cache: bool,

    /// Per-call timeout. Applied per reasoning call, never per batch, so a
    /// hung call cannot take sibling workers down with it.
    pub call_timeout: Duration,

    /// Worker-pool override; `None` means one per processing unit
    pub concurrency: Option<usize>,
}

impl RuntimeConfig {
    /// Build a config for a model identifier, applying environment knobs.
    pub fn from_env(model_id: &str) -> Result<Self, ProviderError> {
        let model: ModelId = model_id.parse()?;
        let temperature = clamp_temperature(&model, 1.0);

        let cache = std::env::var("FRAUDINTEL_CACHE")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let call_timeout = std::env::var("FRAUDINTEL_CALL_TIMEOUT")
            .ok()
            .and_then(|v| humantime::parse_duration(&v).ok())
            .unwrap_or(DEFAULT_CALL_TIMEOUT);

        Ok(Self {
            model,
            temperature,
            cache,
            call_timeout,
            concurrency: None,
        })
    }

    /// Request a specific temperature; the GPT-5 family pins it to 1.0.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = clamp_temperature(&self.model, temperature);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency.max(1));
        self
    }

    /// The completion config handed to the provider.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.model.clone(),
            temperature: self.temperature,
            timeout: self.call_timeout,
            ..CompletionConfig::default()
        }
    }
}

/// Whether reasoning-span instrumentation was requested.
pub fn instrumentation_enabled() -> bool {
    std::env::var("ENABLE_INSTRUMENTATION")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

fn clamp_temperature(model: &ModelId, requested: f32) -> f32 {
    if model.model.to_lowercase().contains("gpt-5") && requested != 1.0 {
        tracing::warn!(
            model = %model,
            requested,
            "model only supports temperature=1.0, adjusting"
        );
        return 1.0;
    }
    requested
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_env(DEFAULT_MODEL).unwrap();
        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.call_timeout, DEFAULT_CALL_TIMEOUT);
        assert!(config.concurrency.is_none());
    }

    #[test]
    fn test_gpt5_pins_temperature() {
        let config = RuntimeConfig::from_env("openai/gpt-5-2025-08-07")
            .unwrap()
            .with_temperature(0.2);
        assert_eq!(config.temperature, 1.0);
    }

    #[test]
    fn test_other_models_keep_requested_temperature() {
        let config = RuntimeConfig::from_env("anthropic/claude-sonnet-4-5")
            .unwrap()
            .with_temperature(0.2);
        assert_eq!(config.temperature, 0.2);
    }

    #[test]
    fn test_completion_config_carries_bare_model_name() {
        let config = RuntimeConfig::from_env("openai/gpt-5-2025-08-07").unwrap();
        assert_eq!(config.completion_config().model, "gpt-5-2025-08-07");
    }

    #[test]
    fn test_invalid_model_id_rejected() {
        assert!(RuntimeConfig::from_env("no-provider-prefix").is_err());
    }
}
