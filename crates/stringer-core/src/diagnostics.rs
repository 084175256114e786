use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Manifest,
    Normalize,
    Emit,
    Verify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticCode {
    STR0001EmptyValueSet,
    STR0002UnsupportedKind,
    STR0003ValueOutOfRange,
    STR0004UnknownType,
    STR0005DuplicateType,
    STR0901InternalBug,
}

impl DiagnosticCode {
    pub fn code_str(self) -> &'static str {
        match self {
            DiagnosticCode::STR0001EmptyValueSet => "STR0001",
            DiagnosticCode::STR0002UnsupportedKind => "STR0002",
            DiagnosticCode::STR0003ValueOutOfRange => "STR0003",
            DiagnosticCode::STR0004UnknownType => "STR0004",
            DiagnosticCode::STR0005DuplicateType => "STR0005",
            DiagnosticCode::STR0901InternalBug => "STR0901",
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            DiagnosticCode::STR0001EmptyValueSet => "type has no constant values",
            DiagnosticCode::STR0002UnsupportedKind => "unsupported underlying kind",
            DiagnosticCode::STR0003ValueOutOfRange => "constant value does not fit its kind",
            DiagnosticCode::STR0004UnknownType => "requested type not found in manifest",
            DiagnosticCode::STR0005DuplicateType => "type requested more than once",
            DiagnosticCode::STR0901InternalBug => "internal stringer bug: generated invalid Rust",
        }
    }

    pub fn default_help(self) -> Option<&'static str> {
        match self {
            DiagnosticCode::STR0002UnsupportedKind => {
                Some("Only i8..i64, isize, u8..u64 and usize newtypes can be stringified.")
            }
            DiagnosticCode::STR0004UnknownType => {
                Some("Check the --type list against the manifest's type names.")
            }
            DiagnosticCode::STR0005DuplicateType => {
                Some("Only the first occurrence is generated; drop the repeated name.")
            }
            DiagnosticCode::STR0901InternalBug => {
                Some("The unverified output was written anyway; compile it to see the error.")
            }
            _ => None,
        }
    }

    fn phase(self) -> Phase {
        match self {
            DiagnosticCode::STR0001EmptyValueSet | DiagnosticCode::STR0002UnsupportedKind => {
                Phase::Normalize
            }
            DiagnosticCode::STR0003ValueOutOfRange | DiagnosticCode::STR0004UnknownType => {
                Phase::Manifest
            }
            DiagnosticCode::STR0005DuplicateType => Phase::Emit,
            DiagnosticCode::STR0901InternalBug => Phase::Verify,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub phase: Phase,
    pub severity: Severity,
    /// Enumeration type the diagnostic belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            phase: code.phase(),
            severity: Severity::Error,
            type_name: None,
            message: message.into(),
            help: code.default_help().map(|s| s.to_string()),
        }
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(code, message)
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} {:?}: {}",
            self.code.code_str(),
            self.phase,
            self.severity,
            self.message
        )?;
        if let Some(help) = &self.help {
            write!(f, "\n  help: {help}")?;
        }
        Ok(())
    }
}

pub fn render_diagnostics_md() -> String {
    let mut rows: Vec<(&str, Phase, &str, &str)> = all_codes()
        .iter()
        .map(|&code| {
            (
                code.code_str(),
                code.phase(),
                code.default_message(),
                code.default_help().unwrap_or(""),
            )
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = String::new();
    out.push_str("# stringer diagnostics catalog\n\n");
    out.push_str("This document is generated from `crates/stringer-core/src/diagnostics.rs`.\n\n");
    out.push_str("| Code | Phase | Message | Help |\n");
    out.push_str("| ---- | ----- | ------- | ---- |\n");
    for (code, phase, msg, help) in rows {
        out.push_str(&format!("| {code} | {phase:?} | {msg} | {help} |\n"));
    }
    out
}

fn all_codes() -> &'static [DiagnosticCode] {
    &[
        DiagnosticCode::STR0001EmptyValueSet,
        DiagnosticCode::STR0002UnsupportedKind,
        DiagnosticCode::STR0003ValueOutOfRange,
        DiagnosticCode::STR0004UnknownType,
        DiagnosticCode::STR0005DuplicateType,
        DiagnosticCode::STR0901InternalBug,
    ]
}
