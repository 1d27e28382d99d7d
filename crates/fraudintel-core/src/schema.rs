//! Declarative task schemas.
//!
//! Each reasoning task (producer or judge) is described by a [`TaskSchema`]:
//! a task description plus ordered, typed input and output field specs. One
//! generic executor consumes the descriptor, so the three analysis tasks and
//! their judges share a single implementation instead of one ad hoc type
//! per task.

use std::fmt;
use thiserror::Error;

use crate::types::FieldMap;

/// Errors from schema validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("task '{task}' output is missing declared field '{field}'")]
    MissingField { task: String, field: String },

    #[error("field '{field}' has wrong type, expected {expected}")]
    WrongType { field: String, expected: FieldType },

    #[error("task '{task}' received undeclared input field '{field}'")]
    UnexpectedInput { task: String, field: String },

    #[error("task '{task}' is missing required input field '{field}'")]
    MissingInput { task: String, field: String },
}

/// The type of a task field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    TextList,
    Float,
    FloatList,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::TextList => write!(f, "list of strings"),
            FieldType::Float => write!(f, "number in [0, 1]"),
            FieldType::FloatList => write!(f, "list of numbers in [0, 1]"),
        }
    }
}

/// One declared input or output field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub ty: FieldType,
    pub required: bool,
}

impl FieldSpec {
    const fn required(name: &'static str, description: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            description,
            ty,
            required: true,
        }
    }

    const fn optional(name: &'static str, description: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            description,
            ty,
            required: false,
        }
    }
}

/// A complete reasoning-task descriptor.
#[derive(Debug, Clone)]
pub struct TaskSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub inputs: Vec<FieldSpec>,
    pub outputs: Vec<FieldSpec>,
}

impl TaskSchema {
    /// Validate a produced output map against the declared output fields.
    ///
    /// Every declared field must be present with the declared type; a missing
    /// field is a contract violation, never silently defaulted. Text content
    /// is trimmed of surrounding whitespace in place.
    pub fn validate_outputs(&self, outputs: &mut FieldMap) -> Result<(), SchemaError> {
        for spec in &self.outputs {
            let value = outputs.get_mut(spec.name).ok_or_else(|| SchemaError::MissingField {
                task: self.name.to_string(),
                field: spec.name.to_string(),
            })?;

            if value.field_type() != spec.ty {
                return Err(SchemaError::WrongType {
                    field: spec.name.to_string(),
                    expected: spec.ty,
                });
            }

            value.trim_text();
        }

        Ok(())
    }

    /// Look up a declared input spec by name.
    pub fn input(&self, name: &str) -> Option<&FieldSpec> {
        self.inputs.iter().find(|spec| spec.name == name)
    }
}

/// The three analysis task families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Hypothesis,
    Contradiction,
    Narrative,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Hypothesis => write!(f, "hypothesis"),
            TaskKind::Contradiction => write!(f, "contradiction"),
            TaskKind::Narrative => write!(f, "narrative"),
        }
    }
}

/// Case input fields shared by every producer task, in prompt order.
pub const CASE_INPUT_FIELDS: [(&str, &str); 7] = [
    ("identity_data", "JSON string of identity and KYC information"),
    ("account_data", "JSON string of account information and recent changes"),
    ("transaction_data", "JSON string of chronological transaction list"),
    ("device_network_data", "JSON string of device and network information"),
    ("behavioral_data", "JSON string of behavioral patterns"),
    ("link_graph_data", "JSON string of entity connections and histories"),
    ("model_rule_signals", "JSON string of model scores and triggered rules"),
];

/// How one scored producer field binds to the judge's input fields.
#[derive(Debug, Clone, Copy)]
pub struct JudgeBinding {
    /// Producer output field (also the gold label field).
    pub source: &'static str,
    /// Judge input carrying the predicted value.
    pub predicted: &'static str,
    /// Judge input carrying the gold value.
    pub gold: &'static str,
}

impl TaskKind {
    fn case_inputs() -> Vec<FieldSpec> {
        CASE_INPUT_FIELDS
            .iter()
            .map(|(name, desc)| FieldSpec::required(name, desc, FieldType::Text))
            .collect()
    }

    /// Schema for the artifact-producing task of this family.
    pub fn producer_schema(&self) -> TaskSchema {
        match self {
            TaskKind::Hypothesis => TaskSchema {
                name: "hypothesis_generator",
                description: "Generate fraud hypotheses based on case data.",
                inputs: Self::case_inputs(),
                outputs: vec![
                    FieldSpec::required(
                        "hypotheses",
                        "Plausible fraud types or explanations",
                        FieldType::TextList,
                    ),
                    FieldSpec::required(
                        "supporting_evidence",
                        "Key evidence snippets",
                        FieldType::TextList,
                    ),
                    FieldSpec::required(
                        "confidence_scores",
                        "Confidence scores (0-1) for each hypothesis",
                        FieldType::FloatList,
                    ),
                ],
            },
            TaskKind::Contradiction => TaskSchema {
                name: "contradiction_checker",
                description: "Identify contradictions in case data and request missing information.",
                inputs: Self::case_inputs(),
                outputs: vec![
                    FieldSpec::required(
                        "contradictions",
                        "Internal inconsistencies found in the case data",
                        FieldType::TextList,
                    ),
                    FieldSpec::required(
                        "missing_info_requests",
                        "Specific information that would resolve open questions",
                        FieldType::TextList,
                    ),
                ],
            },
            TaskKind::Narrative => {
                let mut inputs = Self::case_inputs();
                inputs.push(FieldSpec::optional(
                    "analyst_paragraph",
                    "Optional text from analyst (can be empty)",
                    FieldType::Text,
                ));
                TaskSchema {
                    name: "narrative_drafter",
                    description: "Draft a concise fraud analysis narrative based on case data.",
                    inputs,
                    outputs: vec![
                        FieldSpec::required(
                            "draft_narrative",
                            "1-3 paragraph concise, evidence-grounded summary of the case",
                            FieldType::Text,
                        ),
                        FieldSpec::required(
                            "headline",
                            "One-line summary of the case",
                            FieldType::Text,
                        ),
                    ],
                }
            }
        }
    }

    /// Schema for the quality-judging task of this family.
    pub fn judge_schema(&self) -> TaskSchema {
        match self {
            TaskKind::Hypothesis => TaskSchema {
                name: "hypothesis_judge",
                description:
                    "Judge the quality of fraud hypothesis generation compared to gold standard.",
                inputs: vec![
                    FieldSpec::required(
                        "predicted_hypotheses",
                        "Generated fraud hypotheses",
                        FieldType::TextList,
                    ),
                    FieldSpec::required(
                        "gold_hypotheses",
                        "Expected fraud hypotheses",
                        FieldType::TextList,
                    ),
                    FieldSpec::required(
                        "predicted_evidence",
                        "Generated supporting evidence",
                        FieldType::TextList,
                    ),
                    FieldSpec::required(
                        "gold_evidence",
                        "Expected supporting evidence",
                        FieldType::TextList,
                    ),
                ],
                outputs: vec![
                    FieldSpec::required(
                        "hypothesis_quality",
                        "Score 0.0-1.0 evaluating how well predicted hypotheses match expected fraud types semantically",
                        FieldType::Float,
                    ),
                    FieldSpec::required(
                        "evidence_quality",
                        "Score 0.0-1.0 evaluating coverage and relevance of supporting evidence",
                        FieldType::Float,
                    ),
                ],
            },
            TaskKind::Contradiction => TaskSchema {
                name: "contradiction_judge",
                description: "Judge the quality of contradiction detection compared to gold standard.",
                inputs: vec![
                    FieldSpec::required(
                        "predicted_contradictions",
                        "Detected contradictions",
                        FieldType::TextList,
                    ),
                    FieldSpec::required(
                        "gold_contradictions",
                        "Expected contradictions",
                        FieldType::TextList,
                    ),
                    FieldSpec::required(
                        "predicted_missing_info",
                        "Requested missing information",
                        FieldType::TextList,
                    ),
                    FieldSpec::required(
                        "gold_missing_info",
                        "Expected missing information requests",
                        FieldType::TextList,
                    ),
                ],
                outputs: vec![
                    FieldSpec::required(
                        "contradiction_quality",
                        "Score 0.0-1.0 evaluating coverage of the expected contradictions",
                        FieldType::Float,
                    ),
                    FieldSpec::required(
                        "missing_info_quality",
                        "Score 0.0-1.0 evaluating relevance of the missing-information requests",
                        FieldType::Float,
                    ),
                ],
            },
            TaskKind::Narrative => TaskSchema {
                name: "narrative_judge",
                description: "Judge the quality of fraud narrative and headline generation.",
                inputs: vec![
                    FieldSpec::required(
                        "predicted_narrative",
                        "Generated fraud analysis narrative",
                        FieldType::Text,
                    ),
                    FieldSpec::required(
                        "gold_narrative",
                        "Expected fraud analysis narrative",
                        FieldType::Text,
                    ),
                    FieldSpec::required(
                        "predicted_headline",
                        "Generated case headline",
                        FieldType::Text,
                    ),
                    FieldSpec::required(
                        "gold_headline",
                        "Expected case headline",
                        FieldType::Text,
                    ),
                ],
                outputs: vec![
                    FieldSpec::required(
                        "narrative_quality",
                        "Score 0.0-1.0 evaluating narrative completeness, accuracy, and clarity",
                        FieldType::Float,
                    ),
                    FieldSpec::required(
                        "headline_quality",
                        "Score 0.0-1.0 evaluating headline accuracy and conciseness",
                        FieldType::Float,
                    ),
                    FieldSpec::required(
                        "conciseness",
                        "Score 0.0-1.0 evaluating appropriate length and brevity",
                        FieldType::Float,
                    ),
                ],
            },
        }
    }

    /// Which producer fields the judge scores, and under what input names.
    pub fn judge_bindings(&self) -> &'static [JudgeBinding] {
        match self {
            TaskKind::Hypothesis => &[
                JudgeBinding {
                    source: "hypotheses",
                    predicted: "predicted_hypotheses",
                    gold: "gold_hypotheses",
                },
                JudgeBinding {
                    source: "supporting_evidence",
                    predicted: "predicted_evidence",
                    gold: "gold_evidence",
                },
            ],
            TaskKind::Contradiction => &[
                JudgeBinding {
                    source: "contradictions",
                    predicted: "predicted_contradictions",
                    gold: "gold_contradictions",
                },
                JudgeBinding {
                    source: "missing_info_requests",
                    predicted: "predicted_missing_info",
                    gold: "gold_missing_info",
                },
            ],
            TaskKind::Narrative => &[
                JudgeBinding {
                    source: "draft_narrative",
                    predicted: "predicted_narrative",
                    gold: "gold_narrative",
                },
                JudgeBinding {
                    source: "headline",
                    predicted: "predicted_headline",
                    gold: "gold_headline",
                },
            ],
        }
    }
}
