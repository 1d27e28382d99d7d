//! Scoring math: criterion weights, combination, fallback, aggregation.
//!
//! The judge returns one score per named criterion; this module combines them
//! into a single quality signal with fixed, task-specific weights, and
//! supplies the crude presence heuristic used when judging fails. All scores
//! live in [0, 1].

use crate::schema::{SchemaError, TaskKind};
use crate::types::FieldMap;

/// Score at or above which a prediction is admitted in selection mode.
pub const ADMIT_THRESHOLD: f64 = 0.7;

/// Score assigned by the fallback heuristic when the prediction has content.
pub const FALLBACK_PRESENT: f64 = 0.5;

/// One weighted judge criterion.
#[derive(Debug, Clone, Copy)]
pub struct Criterion {
    pub name: &'static str,
    pub weight: f64,
}

impl TaskKind {
    /// The judge criteria and their fixed convex weights for this family.
    pub fn criteria(&self) -> &'static [Criterion] {
        match self {
            TaskKind::Hypothesis => &[
                Criterion {
                    name: "hypothesis_quality",
                    weight: 0.6,
                },
                Criterion {
                    name: "evidence_quality",
                    weight: 0.4,
                },
            ],
            TaskKind::Contradiction => &[
                Criterion {
                    name: "contradiction_quality",
                    weight: 0.5,
                },
                Criterion {
                    name: "missing_info_quality",
                    weight: 0.5,
                },
            ],
            TaskKind::Narrative => &[
                Criterion {
                    name: "narrative_quality",
                    weight: 0.5,
                },
                Criterion {
                    name: "headline_quality",
                    weight: 0.3,
                },
                Criterion {
                    name: "conciseness",
                    weight: 0.2,
                },
            ],
        }
    }
}

/// Combine a judgment's criterion scores into one scalar in [0, 1].
///
/// Each criterion is clamped before weighting, so a judge that wanders
/// outside [0, 1] cannot push the combined score out of range.
pub fn combine(kind: TaskKind, judgment: &FieldMap) -> Result<f64, SchemaError> {
    let mut combined = 0.0;
    for criterion in kind.criteria() {
        let value = judgment
            .get(criterion.name)
            .and_then(|v| v.as_float())
            .ok_or_else(|| SchemaError::MissingField {
                task: kind.judge_schema().name.to_string(),
                field: criterion.name.to_string(),
            })?;
        combined += criterion.weight * value.clamp(0.0, 1.0);
    }
    Ok(combined.clamp(0.0, 1.0))
}

/// Presence heuristic used when the judge is unavailable.
///
/// 0.5 if any declared output field of the prediction carries content,
/// 0.0 otherwise.
pub fn presence_fallback(kind: TaskKind, prediction: &FieldMap) -> f64 {
    let schema = kind.producer_schema();
    let has_content = schema
        .outputs
        .iter()
        .any(|spec| prediction.get(spec.name).is_some_and(|v| !v.is_empty()));

    if has_content {
        FALLBACK_PRESENT
    } else {
        0.0
    }
}

/// Arithmetic mean of per-example scores.
///
/// Returns 0.0 for an empty slice; callers reject empty example sets before
/// reaching this point.
pub fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Positional display labels for the fixed case ordering.
pub const CASE_DISPLAY_LABELS: [&str; 3] =
    ["Case A (ATO)", "Case B (Synthetic)", "Case C (Legitimate)"];

/// Display label for the example at `index`.
///
/// Labels are positional, not content-derived; indexes past the fixed label
/// set fall back to a numbered name.
pub fn case_label(index: usize) -> String {
    CASE_DISPLAY_LABELS
        .get(index)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Case {}", index + 1))
}
