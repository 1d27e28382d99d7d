//! The artifact-producing side of a task family.
//!
//! One parameterized component covers hypothesis generation, contradiction
//! checking, and narrative drafting; the family's producer schema supplies
//! the fields and the reasoner supplies the execution. Failures propagate
//! uncaught: production errors are the harness's problem, not the
//! producer's.

use fraudintel_core::{CaseExample, FieldMap, FieldValue, TaskKind, TaskSchema};

use crate::reasoner::{ReasonError, Reasoner};

/// Produces the analytical artifact for one task family.
pub struct Producer {
    kind: TaskKind,
    schema: TaskSchema,
    reasoner: Reasoner,
}

impl Producer {
    pub fn new(kind: TaskKind, reasoner: Reasoner) -> Self {
        Self {
            kind,
            schema: kind.producer_schema(),
            reasoner,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn schema(&self) -> &TaskSchema {
        &self.schema
    }

    /// Run the producer over one example's inputs.
    ///
    /// The returned prediction covers every declared output field, validated
    /// and trimmed. Not persisted anywhere; callers score it and drop it.
    pub async fn run(&self, example: &CaseExample) -> Result<FieldMap, ReasonError> {
        let inputs: FieldMap = example
            .inputs()
            .iter()
            .map(|(name, value)| (name.clone(), FieldValue::from(value.clone())))
            .collect();

        self.reasoner.run(&self.schema, &inputs).await
    }
}
