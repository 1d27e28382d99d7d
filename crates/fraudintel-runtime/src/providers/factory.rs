//! Provider construction from model identifiers.
//!
//! Model identifiers use the `provider/model` form, e.g.
//! `openai/gpt-5-2025-08-07` or `anthropic/claude-sonnet-4-5`. The prefix
//! selects the backend; the rest is passed through as the bare model name.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::{LlmProvider, ProviderError};

/// Supported provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderName {
    OpenAi,
    Anthropic,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderName::OpenAi => write!(f, "openai"),
            ProviderName::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// A parsed `provider/model` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId {
    pub provider: ProviderName,
    pub model: String,
}

impl FromStr for ModelId {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, model) = s.split_once('/').ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "model identifier '{s}' must use the provider/model form, e.g. openai/gpt-5-2025-08-07"
            ))
        })?;

        let provider = match prefix {
            "openai" => ProviderName::OpenAi,
            "anthropic" => ProviderName::Anthropic,
            other => {
                return Err(ProviderError::NotConfigured(format!(
                    "unknown provider '{other}' in model identifier '{s}'"
                )))
            }
        };

        if model.is_empty() {
            return Err(ProviderError::NotConfigured(format!(
                "model identifier '{s}' has an empty model name"
            )));
        }

        Ok(Self {
            provider,
            model: model.to_string(),
        })
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Build the provider for a parsed model identifier.
///
/// Credentials come from the backend's environment variable. Selecting a
/// backend whose feature is not compiled in is a configuration error, not a
/// panic.
pub fn build_provider(id: &ModelId) -> Result<Arc<dyn LlmProvider>, ProviderError> {
    match id.provider {
        ProviderName::OpenAi => {
            #[cfg(feature = "openai")]
            {
                Ok(Arc::new(super::OpenAiProvider::from_env()?))
            }
            #[cfg(not(feature = "openai"))]
            {
                Err(ProviderError::NotConfigured(
                    "OpenAI provider requires the 'openai' feature".to_string(),
                ))
            }
        }
        ProviderName::Anthropic => {
            #[cfg(feature = "anthropic")]
            {
                Ok(Arc::new(super::AnthropicProvider::from_env()?))
            }
            #[cfg(not(feature = "anthropic"))]
            {
                Err(ProviderError::NotConfigured(
                    "Anthropic provider requires the 'anthropic' feature".to_string(),
                ))
            }
        }
    }
}
