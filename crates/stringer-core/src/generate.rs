use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use stringer_contracts::TOOL_NAME;

use crate::check::render_guard;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Severity};
use crate::emit::SourceWriter;
use crate::error::{InputError, OptionsError};
use crate::forward::{ForwardPlan, ForwardStrategy};
use crate::lookup::{LookupPlan, LookupStrategy};
use crate::normalize::normalize;
use crate::options::GenerateOptions;
use crate::value::EnumType;
use crate::verify::verify_source;

/// Output of one generation pass for one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedType {
    pub type_name: String,
    pub source: String,
    pub distinct_values: usize,
    pub forward: ForwardStrategy,
    pub lookup: Option<LookupStrategy>,
}

/// Generates the guard, the `Display` impl and the optional lookup function
/// for one type. The pass owns its buffer and returns the finished text.
pub fn generate_type(
    ty: &EnumType,
    options: &GenerateOptions,
) -> Result<GeneratedType, InputError> {
    let normalized = normalize(ty)?;
    let mut w = SourceWriter::new();

    render_guard(&ty.values, &mut w);

    let forward = ForwardPlan::select(&normalized.members, options.run_threshold);
    debug!(
        type_name = %ty.name,
        values = normalized.members.len(),
        strategy = ?forward.strategy(),
        "forward code shape"
    );
    forward.render(&ty.name, &mut w);

    let lookup = options.lookup_fn_name(&ty.name).map(|fn_name| {
        let plan = LookupPlan::select(&normalized.members, options.lookup_thresholds);
        debug!(
            type_name = %ty.name,
            function = %fn_name,
            strategy = ?plan.strategy(),
            "reverse lookup code shape"
        );
        plan.render(&ty.name, &fn_name, &mut w);
        plan.strategy()
    });

    Ok(GeneratedType {
        type_name: ty.name.clone(),
        source: w.finish(),
        distinct_values: normalized.members.len(),
        forward: forward.strategy(),
        lookup,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeader {
    /// Arguments echoed in the "Code generated" line.
    pub args: String,
    pub source_sha256: Option<String>,
}

impl FileHeader {
    fn render(&self) -> String {
        let command = if self.args.trim().is_empty() {
            TOOL_NAME.to_string()
        } else {
            format!("{TOOL_NAME} {}", self.args.trim())
        };
        let mut out = format!("// Code generated by \"{command}\"; DO NOT EDIT.\n");
        if let Some(sha) = &self.source_sha256 {
            out.push_str(&format!("// Input sha256: {sha}\n"));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeReport {
    pub type_name: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct_values: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward: Option<ForwardStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LookupStrategy>,
}

/// All requested types rendered into one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub source: String,
    pub types: Vec<TypeReport>,
    /// False when the text failed the syntax check; it is kept unverified.
    pub verified: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratedFile {
    /// True when every requested type produced output and the text verified.
    pub fn ok(&self) -> bool {
        self.verified
            && self.types.iter().all(|t| t.ok)
            && !self
                .diagnostics
                .iter()
                .any(|d| d.severity == Severity::Error)
    }

    /// Records a type that failed before reaching the generator.
    pub fn record_input_error(&mut self, err: &InputError) {
        warn!("{err}");
        if let Some(name) = err.type_name() {
            self.types.push(TypeReport {
                type_name: name.to_string(),
                ok: false,
                distinct_values: None,
                forward: None,
                lookup: None,
            });
        }
        self.diagnostics.push(err.to_diagnostic());
    }
}

/// Generates every type in order and verifies the combined text.
///
/// A type with malformed input contributes no text and an error diagnostic;
/// the others are still generated. A repeated type name is generated once,
/// at its first occurrence, with a warning. Options are checked up front
/// since they apply to all types.
pub fn generate_file(
    types: &[EnumType],
    options: &GenerateOptions,
    header: &FileHeader,
) -> Result<GeneratedFile, OptionsError> {
    options.validate()?;
    for ty in types {
        options.validate_type(&ty.name)?;
    }

    let mut file = GeneratedFile {
        source: header.render(),
        types: Vec::with_capacity(types.len()),
        verified: true,
        diagnostics: Vec::new(),
    };

    let mut seen = BTreeSet::new();
    for ty in types {
        if !seen.insert(ty.name.as_str()) {
            warn!("type {} repeated; keeping its first occurrence", ty.name);
            file.diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::STR0005DuplicateType,
                    format!("type {} repeated; keeping its first occurrence", ty.name),
                )
                .with_type(&ty.name),
            );
            continue;
        }
        match generate_type(ty, options) {
            Ok(generated) => {
                file.source.push('\n');
                file.source.push_str(&generated.source);
                file.types.push(TypeReport {
                    type_name: generated.type_name,
                    ok: true,
                    distinct_values: Some(generated.distinct_values),
                    forward: Some(generated.forward),
                    lookup: generated.lookup,
                });
            }
            Err(err) => file.record_input_error(&err),
        }
    }

    if let Err(diag) = verify_source(&file.source) {
        warn!("warning: internal error: {}", diag.message);
        warn!("warning: compile the generated file to analyze the error");
        file.verified = false;
        file.diagnostics.push(diag);
    }
    Ok(file)
}
