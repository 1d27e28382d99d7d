//! Generic reasoning-task executor.
//!
//! A [`Reasoner`] runs any [`TaskSchema`] against a provider: it renders the
//! schema into a system prompt that asks the model to reason step by step and
//! then emit exactly the declared output fields as JSON, sends the input
//! fields as the user message, extracts and validates the JSON reply, and
//! memoizes validated outputs. All three analysis tasks and all three judges
//! go through this one code path; only the schema differs.
//!
//! Retry policy lives here and nowhere else: transient rate limits are
//! retried with exponential backoff, every other failure propagates to the
//! caller as a typed error.

use backon::{ExponentialBuilder, Retryable};
use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;

use fraudintel_core::{FieldMap, FieldType, FieldValue, SchemaError, TaskSchema};

use crate::cache::{CallKey, CompletionCache};
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError};

/// Errors from a reasoning call.
#[derive(Error, Debug)]
pub enum ReasonError {
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("completion was not valid JSON: {0}")]
    MalformedCompletion(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Shared framing for every reasoning task.
///
/// The model is asked to think before answering; only the declared JSON
/// fields are surfaced to callers, the `reasoning` key is discarded.
const BASE_SYSTEM_PROMPT: &str = r#"You are a fraud-analysis reasoning engine.

Work strictly from the case data you are given. Do not invent facts that are
not present in the inputs.

Reason step by step before answering. Respond with a single JSON object and
nothing else. The object must contain:
- "reasoning": your step-by-step analysis as a string
- every output field listed below, exactly as declared

Output fields that are lists must be JSON arrays. Scores must be JSON numbers
between 0.0 and 1.0. Do not add fields that are not declared. Do not wrap the
object in markdown fences."#;

/// Executes reasoning tasks against one provider.
pub struct Reasoner {
    provider: Arc<dyn LlmProvider>,
    config: CompletionConfig,
    cache: Option<Arc<CompletionCache>>,
}

impl Reasoner {
    pub fn new(provider: Arc<dyn LlmProvider>, config: CompletionConfig) -> Self {
        Self {
            provider,
            config,
            cache: None,
        }
    }

    /// Memoize validated outputs in `cache`.
    pub fn with_cache(mut self, cache: Arc<CompletionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Run one reasoning task.
    ///
    /// Inputs must cover the schema's declared input fields (optional fields
    /// may be absent). The returned map carries exactly the declared output
    /// fields, validated and trimmed; a completion missing a declared field
    /// is a schema error, never silently defaulted.
    pub async fn run(&self, schema: &TaskSchema, inputs: &FieldMap) -> Result<FieldMap, ReasonError> {
        let key = CallKey::new(schema.name, inputs);
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                tracing::debug!(task = schema.name, "completion cache hit");
                return Ok(hit);
            }
        }

        let messages = vec![
            ChatMessage::system(render_system_prompt(schema)),
            ChatMessage::user(render_inputs(schema, inputs)?),
        ];

        let span = tracing::info_span!(
            "reasoning_task",
            task = schema.name,
            model = %self.config.model,
            provider = self.provider.name(),
        );
        let response = async {
            (|| async { self.provider.complete(messages.clone(), &self.config).await })
                .retry(ExponentialBuilder::default().with_max_times(2))
                .when(|e: &ProviderError| matches!(e, ProviderError::RateLimited { .. }))
                .await
        }
        .instrument(span)
        .await?;

        tracing::debug!(
            task = schema.name,
            tokens = response.usage.total(),
            "reasoning task completed"
        );

        let outputs = parse_outputs(schema, &response.content)?;
        if let Some(cache) = &self.cache {
            cache.insert(key, outputs.clone()).await;
        }
        Ok(outputs)
    }
}

/// Render the full system prompt for a schema.
fn render_system_prompt(schema: &TaskSchema) -> String {
    let mut prompt = format!("{BASE_SYSTEM_PROMPT}\n\n## Task\n{}\n\n## Output Fields\n", schema.description);
    for spec in &schema.outputs {
        prompt.push_str(&format!("- \"{}\" ({}): {}\n", spec.name, spec.ty, spec.description));
    }
    prompt
}

/// Render the input fields as the user message, in schema order.
fn render_inputs(schema: &TaskSchema, inputs: &FieldMap) -> Result<String, SchemaError> {
    let mut message = String::new();
    for spec in &schema.inputs {
        let rendered = match inputs.get(spec.name) {
            Some(FieldValue::Text(s)) => s.clone(),
            Some(value) => serde_json::to_string(value).unwrap_or_default(),
            None if !spec.required => String::new(),
            None => {
                return Err(SchemaError::MissingInput {
                    task: schema.name.to_string(),
                    field: spec.name.to_string(),
                })
            }
        };
        message.push_str(&format!("## {} ({})\n{}\n\n", spec.name, spec.description, rendered));
    }
    Ok(message)
}

/// Extract and validate the declared output fields from a completion.
fn parse_outputs(schema: &TaskSchema, content: &str) -> Result<FieldMap, ReasonError> {
    let object = extract_json_object(content)?;

    let mut outputs = FieldMap::new();
    for spec in &schema.outputs {
        let value = object.get(spec.name).ok_or_else(|| SchemaError::MissingField {
            task: schema.name.to_string(),
            field: spec.name.to_string(),
        })?;
        outputs.insert(
            spec.name.to_string(),
            FieldValue::from_json(spec.ty, spec.name, value)?,
        );
    }

    schema.validate_outputs(&mut outputs)?;
    Ok(outputs)
}

/// Pull the outermost JSON object out of a completion.
///
/// Tolerates prose or markdown fences around the object by slicing from the
/// first `{` to the last `}`.
fn extract_json_object(content: &str) -> Result<serde_json::Map<String, serde_json::Value>, ReasonError> {
    let start = content
        .find('{')
        .ok_or_else(|| ReasonError::MalformedCompletion("no JSON object in completion".to_string()))?;
    let end = content
        .rfind('}')
        .ok_or_else(|| ReasonError::MalformedCompletion("unterminated JSON object".to_string()))?;
    if end < start {
        return Err(ReasonError::MalformedCompletion(
            "unterminated JSON object".to_string(),
        ));
    }

    let value: serde_json::Value = serde_json::from_str(&content[start..=end])
        .map_err(|e| ReasonError::MalformedCompletion(e.to_string()))?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(ReasonError::MalformedCompletion(
            "completion JSON was not an object".to_string(),
        )),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Scripted providers shared by runtime tests.

    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::providers::{CompletionResponse, TokenUsage};

    /// Returns a fixed completion and counts invocations.
    pub struct ScriptedProvider {
        content: String,
        pub calls: AtomicUsize,
    }

    impl ScriptedProvider {
        pub fn new(content: impl Into<String>) -> Self {
            Self {
                content: content.into(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            _config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CompletionResponse {
                content: self.content.clone(),
                usage: TokenUsage::default(),
                model: "scripted".to_string(),
                stop_reason: Some("stop".to_string()),
            })
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Always fails with a non-retryable error.
    pub struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            _config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            Err(ProviderError::ApiError {
                status: 500,
                message: "scripted failure".to_string(),
            })
        }

        async fn health_check(&self) -> bool {
            false
        }

        fn name(&self) -> &str {
            "failing"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{FailingProvider, ScriptedProvider};
    use super::*;
    use fraudintel_core::{TaskKind, CASE_INPUT_FIELDS};
    use std::sync::atomic::Ordering;

    fn case_inputs() -> FieldMap {
        CASE_INPUT_FIELDS
            .iter()
            .map(|(name, _)| (name.to_string(), FieldValue::from("{}")))
            .collect()
    }

    const HYPOTHESIS_COMPLETION: &str = r#"Here is my analysis.
{
  "reasoning": "The device change plus password reset points at takeover.",
  "hypotheses": ["account takeover"],
  "supporting_evidence": ["  new device fingerprint  "],
  "confidence_scores": [0.9]
}"#;

    #[tokio::test]
    async fn test_run_parses_and_trims_outputs() {
        let schema = TaskKind::Hypothesis.producer_schema();
        let reasoner = Reasoner::new(
            Arc::new(ScriptedProvider::new(HYPOTHESIS_COMPLETION)),
            CompletionConfig::default(),
        );

        let outputs = reasoner.run(&schema, &case_inputs()).await.unwrap();
        assert_eq!(outputs.len(), 3);
        assert_eq!(
            outputs["supporting_evidence"].as_text_list().unwrap(),
            &["new device fingerprint".to_string()]
        );
        // The reasoning key is not surfaced.
        assert!(!outputs.contains_key("reasoning"));
    }

    #[tokio::test]
    async fn test_missing_declared_field_is_schema_error() {
        let schema = TaskKind::Hypothesis.producer_schema();
        let reasoner = Reasoner::new(
            Arc::new(ScriptedProvider::new(
                r#"{"hypotheses": ["ato"], "supporting_evidence": ["x"]}"#,
            )),
            CompletionConfig::default(),
        );

        let err = reasoner.run(&schema, &case_inputs()).await.unwrap_err();
        assert!(matches!(
            err,
            ReasonError::Schema(SchemaError::MissingField { ref field, .. })
                if field == "confidence_scores"
        ));
    }

    #[tokio::test]
    async fn test_non_json_completion_is_malformed() {
        let schema = TaskKind::Contradiction.producer_schema();
        let reasoner = Reasoner::new(
            Arc::new(ScriptedProvider::new("I refuse to answer in JSON.")),
            CompletionConfig::default(),
        );

        let err = reasoner.run(&schema, &case_inputs()).await.unwrap_err();
        assert!(matches!(err, ReasonError::MalformedCompletion(_)));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let schema = TaskKind::Narrative.producer_schema();
        let reasoner = Reasoner::new(Arc::new(FailingProvider), CompletionConfig::default());

        let err = reasoner.run(&schema, &case_inputs()).await.unwrap_err();
        assert!(matches!(err, ReasonError::Provider(_)));
    }

    #[tokio::test]
    async fn test_cache_short_circuits_repeat_calls() {
        let schema = TaskKind::Hypothesis.producer_schema();
        let provider = Arc::new(ScriptedProvider::new(HYPOTHESIS_COMPLETION));
        let reasoner = Reasoner::new(provider.clone(), CompletionConfig::default())
            .with_cache(Arc::new(CompletionCache::default()));

        let inputs = case_inputs();
        reasoner.run(&schema, &inputs).await.unwrap();
        reasoner.run(&schema, &inputs).await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_system_prompt_declares_output_fields() {
        let prompt = render_system_prompt(&TaskKind::Narrative.judge_schema());
        assert!(prompt.contains("\"narrative_quality\""));
        assert!(prompt.contains("\"conciseness\""));
        assert!(prompt.contains("Reason step by step"));
    }

    #[test]
    fn test_render_inputs_requires_declared_fields() {
        let schema = TaskKind::Hypothesis.producer_schema();
        let err = render_inputs(&schema, &FieldMap::new()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingInput { .. }));
    }

    #[test]
    fn test_extract_json_tolerates_fences() {
        let content = "```json\n{\"a\": 1}\n```";
        let object = extract_json_object(content).unwrap();
        assert_eq!(object["a"], 1);
    }
}
