//! LLM-as-judge scoring service.
//!
//! The judge is an explicitly owned dependency: constructed once at harness
//! startup and shared by reference across workers, never a hidden global.
//! Each call is self-contained, so concurrent use needs no locking beyond
//! what the provider itself guarantees.
//!
//! Judging failures are values, not errors: [`JudgeOutcome::Failed`] carries
//! the reason and the metric decides what to do with it. Nothing in this
//! module can abort an evaluation pass.

use fraudintel_core::{CaseExample, FieldMap, TaskKind, TaskSchema};

use crate::reasoner::Reasoner;

/// Result of one judging call.
#[derive(Debug)]
pub enum JudgeOutcome {
    /// Criterion scores keyed by criterion name, each in [0, 1].
    Scored(FieldMap),

    /// The judge call failed; the reason is diagnostic only.
    Failed(String),
}

/// Scores predictions against gold data for one task family.
pub struct JudgeService {
    kind: TaskKind,
    schema: TaskSchema,
    reasoner: Reasoner,
}

impl JudgeService {
    pub fn new(kind: TaskKind, reasoner: Reasoner) -> Self {
        Self {
            kind,
            schema: kind.judge_schema(),
            reasoner,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Judge a prediction against the example's gold outputs.
    pub async fn judge(&self, example: &CaseExample, prediction: &FieldMap) -> JudgeOutcome {
        let inputs = match self.judge_inputs(example, prediction) {
            Ok(inputs) => inputs,
            Err(reason) => return JudgeOutcome::Failed(reason),
        };

        match self.reasoner.run(&self.schema, &inputs).await {
            Ok(judgment) => JudgeOutcome::Scored(judgment),
            Err(e) => JudgeOutcome::Failed(e.to_string()),
        }
    }

    /// Pair predicted and gold values under the judge's input field names.
    fn judge_inputs(&self, example: &CaseExample, prediction: &FieldMap) -> Result<FieldMap, String> {
        let mut inputs = FieldMap::new();
        for binding in self.kind.judge_bindings() {
            let predicted = prediction
                .get(binding.source)
                .ok_or_else(|| format!("prediction is missing '{}'", binding.source))?;
            let gold = example
                .gold(binding.source)
                .ok_or_else(|| format!("gold labels are missing '{}'", binding.source))?;

            inputs.insert(binding.predicted.to_string(), predicted.clone());
            inputs.insert(binding.gold.to_string(), gold.clone());
        }
        Ok(inputs)
    }
}
