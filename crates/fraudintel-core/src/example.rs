//! Labeled case examples.
//!
//! A [`CaseExample`] is one input/output pair for a task family: the case's
//! JSON-encoded input fields plus the gold outputs an analyst curated for it.
//! Examples are built once at startup and never mutated afterwards.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::schema::{SchemaError, TaskKind, TaskSchema};
use crate::types::{FieldMap, FieldValue};

/// One labeled example for a task family.
#[derive(Debug, Clone)]
pub struct CaseExample {
    inputs: BTreeMap<String, String>,
    expected: FieldMap,
}

impl CaseExample {
    /// Build an example, enforcing that input keys are exactly the schema's
    /// declared input fields.
    ///
    /// Required fields must be present (an empty string is allowed); optional
    /// fields absent from `inputs` default to the empty string.
    pub fn new(
        schema: &TaskSchema,
        inputs: BTreeMap<String, String>,
        expected: FieldMap,
    ) -> Result<Self, SchemaError> {
        for key in inputs.keys() {
            if schema.input(key).is_none() {
                return Err(SchemaError::UnexpectedInput {
                    task: schema.name.to_string(),
                    field: key.clone(),
                });
            }
        }

        let mut inputs = inputs;
        for spec in &schema.inputs {
            if !inputs.contains_key(spec.name) {
                if spec.required {
                    return Err(SchemaError::MissingInput {
                        task: schema.name.to_string(),
                        field: spec.name.to_string(),
                    });
                }
                inputs.insert(spec.name.to_string(), String::new());
            }
        }

        Ok(Self { inputs, expected })
    }

    /// The case input fields, keyed by declared field name.
    pub fn inputs(&self) -> &BTreeMap<String, String> {
        &self.inputs
    }

    /// The gold outputs for this example.
    pub fn expected(&self) -> &FieldMap {
        &self.expected
    }

    /// A gold output field by name.
    pub fn gold(&self, field: &str) -> Option<&FieldValue> {
        self.expected.get(field)
    }
}

/// Ground-truth labels for one case, a superset across all task families.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseLabels {
    #[serde(default)]
    pub hypotheses: Vec<String>,
    #[serde(default)]
    pub supporting_evidence: Vec<String>,
    #[serde(default)]
    pub confidence_scores: Vec<f64>,
    #[serde(default)]
    pub contradictions: Vec<String>,
    #[serde(default)]
    pub missing_info_requests: Vec<String>,
    #[serde(default)]
    pub draft_narrative: String,
    #[serde(default)]
    pub headline: String,
}

impl CaseLabels {
    /// The gold output map for one task family.
    pub fn expected_outputs(&self, kind: TaskKind) -> FieldMap {
        let mut expected = FieldMap::new();
        match kind {
            TaskKind::Hypothesis => {
                expected.insert("hypotheses".to_string(), self.hypotheses.clone().into());
                expected.insert(
                    "supporting_evidence".to_string(),
                    self.supporting_evidence.clone().into(),
                );
                expected.insert(
                    "confidence_scores".to_string(),
                    self.confidence_scores.clone().into(),
                );
            }
            TaskKind::Contradiction => {
                expected.insert("contradictions".to_string(), self.contradictions.clone().into());
                expected.insert(
                    "missing_info_requests".to_string(),
                    self.missing_info_requests.clone().into(),
                );
            }
            TaskKind::Narrative => {
                expected.insert(
                    "draft_narrative".to_string(),
                    self.draft_narrative.clone().into(),
                );
                expected.insert("headline".to_string(), self.headline.clone().into());
            }
        }
        expected
    }
}
