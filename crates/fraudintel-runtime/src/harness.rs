//! The judged-evaluation harness.
//!
//! Runs a producer over an entire example set and reports an aggregate
//! score. Two passes:
//!
//! 1. **Parallel aggregate pass**: examples fan out over a bounded worker
//!    pool (`buffer_unordered`, one permit per available processing unit by
//!    default). Each worker produces and scores one example independently;
//!    the aggregate is the mean, so worker completion order is irrelevant.
//! 2. **Sequential display pass**: re-runs the producer per example in input
//!    order and records positionally-labeled per-case scores. The duplicated
//!    work is deliberate, trading efficiency for a transparent per-case
//!    breakdown (the completion cache absorbs most of the cost).
//!
//! Failure policy: a producer failure aborts the batch; a judge failure
//! degrades that example's score to the presence heuristic and the run
//! continues. The harness holds no state across runs.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use thiserror::Error;

use fraudintel_core::{case_label, mean, CaseExample};

use crate::judge::JudgeService;
use crate::metric::evaluate_prediction;
use crate::producer::Producer;
use crate::reasoner::ReasonError;

/// Errors from a harness run.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("cannot evaluate an empty example set")]
    EmptyExampleSet,

    #[error("production failed: {0}")]
    Produce(#[from] ReasonError),
}

/// Score for one positionally-labeled case.
#[derive(Debug, Clone)]
pub struct CaseScore {
    pub label: String,
    pub score: f64,
}

/// Result of one harness run.
#[derive(Debug)]
pub struct EvalReport {
    /// Mean score over the full example set, in [0, 1].
    pub aggregate: f64,

    /// Per-case scores from the sequential display pass, in input order.
    pub per_case: Vec<CaseScore>,

    pub evaluated_at: DateTime<Utc>,
}

/// Batch evaluator for one task family.
pub struct EvalHarness {
    producer: Producer,
    judge: JudgeService,
    concurrency: usize,
}

impl EvalHarness {
    /// Create a harness with one worker per available processing unit.
    pub fn new(producer: Producer, judge: JudgeService) -> Self {
        Self {
            producer,
            judge,
            concurrency: default_concurrency(),
        }
    }

    /// Override the worker-pool size (floored at 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Evaluate the full ordered example set.
    ///
    /// The example ordering is load bearing: display labels are positional,
    /// so reordering the input reorders the labels identically.
    pub async fn evaluate(&self, examples: &[CaseExample]) -> Result<EvalReport, HarnessError> {
        if examples.is_empty() {
            return Err(HarnessError::EmptyExampleSet);
        }

        tracing::info!(
            examples = examples.len(),
            workers = self.concurrency,
            task = %self.producer.kind(),
            "starting evaluation pass"
        );

        let scores: Vec<f64> = stream::iter(examples.iter().map(|ex| self.score_example(ex)))
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;
        let aggregate = mean(&scores);

        let mut per_case = Vec::with_capacity(examples.len());
        for (index, example) in examples.iter().enumerate() {
            let score = self.score_example(example).await?;
            per_case.push(CaseScore {
                label: case_label(index),
                score,
            });
        }

        Ok(EvalReport {
            aggregate,
            per_case,
            evaluated_at: Utc::now(),
        })
    }

    /// Produce and score one example. Production errors propagate; judge
    /// failures are absorbed by the metric.
    async fn score_example(&self, example: &CaseExample) -> Result<f64, HarnessError> {
        let prediction = self.producer.run(example).await?;
        Ok(evaluate_prediction(&self.judge, example, &prediction).await)
    }

    pub fn producer(&self) -> &Producer {
        &self.producer
    }

    pub fn judge(&self) -> &JudgeService {
        &self.judge
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
