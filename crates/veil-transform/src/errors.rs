use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::person::Gender;
use crate::template::TemplateError;

/// Fatal problems found while building a transformer. No transformer is
/// returned when one of these occurs.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("unknown param '{0}'")]
    UnknownParam(String),
    #[error("missing required param '{0}'")]
    MissingParam(&'static str),
    #[error("invalid value for param '{param}': {reason}")]
    InvalidParam { param: String, reason: String },
    #[error("invalid {param} '{value}': expected one of {expected}")]
    InvalidEnum {
        param: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("columns must list at least one column")]
    EmptyColumns,
    #[error("column '{0}' is listed more than once")]
    DuplicateColumn(String),
    #[error("column '{column}' not found in {table}")]
    UnknownColumn { column: String, table: String },
    #[error("column '{column}' has type '{data_type}' which cannot hold generated text")]
    IncompatibleColumnType { column: String, data_type: String },
    #[error("template for column '{column}': {source}")]
    Template {
        column: String,
        #[source]
        source: TemplateError,
    },
    #[error("{list} list is empty for gender {gender}")]
    EmptyCorpus { list: &'static str, gender: Gender },
    #[error("gender mapping value '{0}' is claimed by both genders")]
    AmbiguousGenderMapping(String),
    #[error("unknown transformer '{0}'")]
    UnknownTransformer(String),
    #[error("transformer '{0}' is already registered")]
    DuplicateTransformer(&'static str),
}

/// Row-time failure to produce a person from entropy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("insufficient entropy: need {required} bytes, got {actual}")]
    InsufficientEntropy { required: usize, actual: usize },
    #[error("gender policy Any needs a gender slice the entropy layout does not have")]
    MissingGenderSlice,
    #[error("corpus was not validated for gender {0}")]
    UnvalidatedGender(Gender),
}

/// Failure while transforming a single row.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("transform cancelled")]
    Cancelled,
    #[error("column '{column}': {source}")]
    Generation {
        column: String,
        #[source]
        source: GenerationError,
    },
    #[error("column '{column}': {source}")]
    Record {
        column: String,
        #[source]
        source: veil_core::Error,
    },
}

/// Advisory issue returned alongside a successfully built transformer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    pub code: &'static str,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ValidationWarning {
    pub fn new(
        code: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint,
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}
