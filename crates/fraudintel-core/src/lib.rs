//! # fraudintel-core
//!
//! Deterministic core for fraud-case analysis evaluation.
//!
//! This crate holds everything that does not touch a language model:
//! - Declarative task schemas for the three analysis tasks (hypothesis
//!   generation, contradiction checking, narrative drafting) and their
//!   judges
//! - Typed field values and labeled case examples
//! - The case dataset loader (fixed three-case layout, loaded in order)
//! - Scoring math: criterion weights, combination, the presence-heuristic
//!   fallback, aggregation, and positional case labels
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same inputs always produce the same outputs
//! 2. **No LLM calls**: model invocation lives in `fraudintel-runtime`
//! 3. **Strict schemas**: a missing declared output field is an error,
//!    never a silent default
//! 4. **Bounded scores**: every combined score lands in [0, 1]

pub mod dataset;
pub mod example;
pub mod schema;
pub mod scoring;
pub mod types;

// Re-export main types at crate root
pub use dataset::{Dataset, DatasetError, CASES};
pub use example::{CaseExample, CaseLabels};
pub use schema::{
    FieldSpec, FieldType, JudgeBinding, SchemaError, TaskKind, TaskSchema, CASE_INPUT_FIELDS,
};
pub use scoring::{
    case_label, combine, mean, presence_fallback, Criterion, ADMIT_THRESHOLD,
    CASE_DISPLAY_LABELS,
};
pub use types::{FieldMap, FieldValue};
