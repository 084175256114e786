use thiserror::Error;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::value::IntKind;

/// Malformed input for one type. Fatal for that type only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("type {type_name}: no constant values")]
    Empty { type_name: String },

    #[error("type {type_name}: can't handle non-integer constant kind {kind:?}")]
    UnsupportedKind { type_name: String, kind: String },

    #[error("type {type_name}: value {value} of {constant} does not fit {kind}")]
    ValueOutOfRange {
        type_name: String,
        constant: String,
        value: String,
        kind: IntKind,
    },

    #[error("no values defined for types: {}", .0.join(","))]
    UnknownTypes(Vec<String>),
}

impl InputError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            InputError::Empty { .. } => DiagnosticCode::STR0001EmptyValueSet,
            InputError::UnsupportedKind { .. } => DiagnosticCode::STR0002UnsupportedKind,
            InputError::ValueOutOfRange { .. } => DiagnosticCode::STR0003ValueOutOfRange,
            InputError::UnknownTypes(_) => DiagnosticCode::STR0004UnknownType,
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        match self {
            InputError::Empty { type_name }
            | InputError::UnsupportedKind { type_name, .. }
            | InputError::ValueOutOfRange { type_name, .. } => Some(type_name),
            InputError::UnknownTypes(_) => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let d = Diagnostic::error(self.code(), self.to_string());
        match self.type_name() {
            Some(name) => d.with_type(name),
            None => d,
        }
    }
}

/// Rejected `GenerateOptions`; nothing is generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("lookup template {0:?} has no \"{{}}\" placeholder")]
    MissingPlaceholder(String),

    #[error("lookup template {template:?} yields non-identifier {name:?} for {type_name}")]
    InvalidLookupName {
        template: String,
        type_name: String,
        name: String,
    },

    #[error("run threshold must be at least 1")]
    ZeroRunThreshold,

    #[error("lookup thresholds out of order: {0} > {1}")]
    UnorderedLookupThresholds(usize, usize),
}
