//! The metric: one scalar quality signal per (example, prediction) pair.
//!
//! The judge's criterion scores are combined with fixed task-specific
//! weights. When judging fails, the metric degrades to the presence
//! heuristic (0.5 if the prediction has any content, else 0.0) instead of
//! propagating the failure: a single judge failure must never abort an
//! evaluation pass. The degradation is logged as a diagnostic; it is not
//! part of the scoring contract.
//!
//! Two operating modes exist over the same quantity: [`evaluate_prediction`]
//! reports the raw score in [0, 1], [`admit_prediction`] answers the
//! selection question `score >= 0.7`.

use fraudintel_core::{combine, presence_fallback, CaseExample, FieldMap, ADMIT_THRESHOLD};

use crate::judge::{JudgeOutcome, JudgeService};

/// Score one prediction in float mode.
pub async fn evaluate_prediction(
    judge: &JudgeService,
    example: &CaseExample,
    prediction: &FieldMap,
) -> f64 {
    let kind = judge.kind();

    match judge.judge(example, prediction).await {
        JudgeOutcome::Scored(judgment) => match combine(kind, &judgment) {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!(task = %kind, error = %e, "judgment unusable, using presence heuristic");
                presence_fallback(kind, prediction)
            }
        },
        JudgeOutcome::Failed(reason) => {
            tracing::warn!(task = %kind, reason = %reason, "judge evaluation failed, using presence heuristic");
            presence_fallback(kind, prediction)
        }
    }
}

/// Score one prediction in boolean selection mode.
///
/// Exactly equivalent to `evaluate_prediction(..) >= ADMIT_THRESHOLD`,
/// including on the fallback path.
pub async fn admit_prediction(
    judge: &JudgeService,
    example: &CaseExample,
    prediction: &FieldMap,
) -> bool {
    evaluate_prediction(judge, example, prediction).await >= ADMIT_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::CompletionConfig;
    use crate::reasoner::test_support::{FailingProvider, ScriptedProvider};
    use crate::reasoner::Reasoner;
    use fraudintel_core::{FieldValue, TaskKind, CASE_INPUT_FIELDS};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn example(kind: TaskKind) -> CaseExample {
        let inputs: BTreeMap<String, String> = CASE_INPUT_FIELDS
            .iter()
            .map(|(name, _)| (name.to_string(), "{}".to_string()))
            .collect();

        let mut expected = FieldMap::new();
        for spec in &kind.producer_schema().outputs {
            let gold = match spec.ty {
                fraudintel_core::FieldType::Text => FieldValue::from("gold text"),
                fraudintel_core::FieldType::TextList => {
                    FieldValue::TextList(vec!["gold item".to_string()])
                }
                fraudintel_core::FieldType::FloatList => FieldValue::FloatList(vec![0.9]),
                fraudintel_core::FieldType::Float => FieldValue::Float(0.9),
            };
            expected.insert(spec.name.to_string(), gold);
        }

        CaseExample::new(&kind.producer_schema(), inputs, expected).unwrap()
    }

    fn nonempty_prediction(kind: TaskKind) -> FieldMap {
        example(kind).expected().clone()
    }

    fn empty_prediction(kind: TaskKind) -> FieldMap {
        kind.producer_schema()
            .outputs
            .iter()
            .map(|spec| {
                let empty = match spec.ty {
                    fraudintel_core::FieldType::Text => FieldValue::Text(String::new()),
                    fraudintel_core::FieldType::TextList => FieldValue::TextList(vec![]),
                    fraudintel_core::FieldType::FloatList => FieldValue::FloatList(vec![]),
                    fraudintel_core::FieldType::Float => FieldValue::Float(0.0),
                };
                (spec.name.to_string(), empty)
            })
            .collect()
    }

    fn judge(kind: TaskKind, provider: Arc<dyn crate::providers::LlmProvider>) -> JudgeService {
        JudgeService::new(kind, Reasoner::new(provider, CompletionConfig::default()))
    }

    #[tokio::test]
    async fn test_weighted_combination() {
        let j = judge(
            TaskKind::Hypothesis,
            Arc::new(ScriptedProvider::new(
                r#"{"hypothesis_quality": 1.0, "evidence_quality": 0.5}"#,
            )),
        );
        let kind = TaskKind::Hypothesis;

        let score = evaluate_prediction(&j, &example(kind), &nonempty_prediction(kind)).await;
        assert!((score - 0.8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fallback_for_every_task_family() {
        for kind in [TaskKind::Hypothesis, TaskKind::Contradiction, TaskKind::Narrative] {
            let j = judge(kind, Arc::new(FailingProvider));
            let ex = example(kind);

            let with_content = evaluate_prediction(&j, &ex, &nonempty_prediction(kind)).await;
            assert_eq!(with_content, 0.5, "{kind}: non-empty prediction");

            let without = evaluate_prediction(&j, &ex, &empty_prediction(kind)).await;
            assert_eq!(without, 0.0, "{kind}: empty prediction");
        }
    }

    #[tokio::test]
    async fn test_fallback_is_deterministic() {
        let j = judge(TaskKind::Narrative, Arc::new(FailingProvider));
        let kind = TaskKind::Narrative;
        let ex = example(kind);
        let prediction = nonempty_prediction(kind);

        let first = evaluate_prediction(&j, &ex, &prediction).await;
        let second = evaluate_prediction(&j, &ex, &prediction).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_selection_mode_matches_threshold() {
        // Judged score 0.8 -> admitted.
        let j = judge(
            TaskKind::Hypothesis,
            Arc::new(ScriptedProvider::new(
                r#"{"hypothesis_quality": 1.0, "evidence_quality": 0.5}"#,
            )),
        );
        let kind = TaskKind::Hypothesis;
        assert!(admit_prediction(&j, &example(kind), &nonempty_prediction(kind)).await);

        // Judged score 0.5 -> rejected.
        let j = judge(
            TaskKind::Hypothesis,
            Arc::new(ScriptedProvider::new(
                r#"{"hypothesis_quality": 0.5, "evidence_quality": 0.5}"#,
            )),
        );
        assert!(!admit_prediction(&j, &example(kind), &nonempty_prediction(kind)).await);
    }

    #[tokio::test]
    async fn test_selection_mode_applies_on_fallback_too() {
        let j = judge(TaskKind::Contradiction, Arc::new(FailingProvider));
        let kind = TaskKind::Contradiction;

        // Fallback yields 0.5, below the 0.7 threshold.
        assert!(!admit_prediction(&j, &example(kind), &nonempty_prediction(kind)).await);
    }
}
