//! # fraudintel-runtime
//!
//! LLM-backed reasoning tasks and the judged-evaluation harness.
//!
//! This crate owns every model call in the system. The deterministic parts
//! (schemas, examples, scoring math) live in `fraudintel-core`; here they are
//! wired to a provider:
//!
//! - [`providers`] — the `LlmProvider` abstraction plus Anthropic and OpenAI
//!   backends behind features
//! - [`reasoner`] — one generic executor for any task schema: prompt
//!   rendering, JSON extraction, schema validation, retry, caching
//! - [`producer`] / [`judge`] — the two halves of a task family
//! - [`metric`] — judged scoring with the presence-heuristic fallback
//! - [`harness`] — the parallel batch evaluator
//!
//! ## Failure model
//!
//! Producer failures propagate and abort a batch. Judge failures are values
//! ([`judge::JudgeOutcome::Failed`]) absorbed by the metric; a single judge
//! failure never aborts an evaluation pass.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fraudintel_core::{Dataset, TaskKind};
//! use fraudintel_runtime::{build_runtime, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_env("openai/gpt-5-2025-08-07")?;
//! let harness = build_runtime(TaskKind::Hypothesis, &config)?;
//!
//! let examples = Dataset::new("datasets").examples(TaskKind::Hypothesis)?;
//! let report = harness.evaluate(&examples).await?;
//! println!("aggregate: {:.3}", report.aggregate);
//! ```

use std::sync::Arc;

use fraudintel_core::TaskKind;

pub mod cache;
pub mod config;
pub mod harness;
pub mod judge;
pub mod metric;
pub mod producer;
pub mod providers;
pub mod reasoner;

// Re-export main types at crate root
pub use cache::CompletionCache;
pub use config::{instrumentation_enabled, RuntimeConfig, DEFAULT_MODEL};
pub use harness::{CaseScore, EvalHarness, EvalReport, HarnessError};
pub use judge::{JudgeOutcome, JudgeService};
pub use metric::{admit_prediction, evaluate_prediction};
pub use producer::Producer;
pub use providers::{build_provider, LlmProvider, ModelId, ProviderError};
pub use reasoner::{ReasonError, Reasoner};

/// Build a ready-to-run harness for one task family.
///
/// Constructs the provider from the config's model identifier, a shared
/// completion cache (if enabled), one producer, and one judge. The judge is
/// created here, once, and owned by the harness for the run's lifetime.
pub fn build_runtime(kind: TaskKind, config: &RuntimeConfig) -> Result<EvalHarness, ProviderError> {
    let provider = build_provider(&config.model)?;
    let completion_config = config.completion_config();

    let cache = config.cache.then(|| Arc::new(CompletionCache::default()));
    let make_reasoner = || {
        let reasoner = Reasoner::new(provider.clone(), completion_config.clone());
        match &cache {
            Some(cache) => reasoner.with_cache(cache.clone()),
            None => reasoner,
        }
    };

    let producer = Producer::new(kind, make_reasoner());
    let judge = JudgeService::new(kind, make_reasoner());

    let harness = EvalHarness::new(producer, judge);
    Ok(match config.concurrency {
        Some(n) => harness.with_concurrency(n),
        None => harness,
    })
}
