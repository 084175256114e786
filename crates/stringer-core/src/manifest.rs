//! JSON hand-off from the source-analysis step.
//!
//! The analyzer resolves constant declarations and their values; this module
//! turns its manifest into [`EnumType`]s and applies the display-name policy
//! (explicit override, line comment, trimmed declaration name).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stringer_contracts::MANIFEST_SCHEMA_VERSION;

use crate::error::InputError;
use crate::value::{EnumType, IntKind, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub schema_version: String,
    pub types: Vec<ManifestType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestType {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub values: Vec<ManifestValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestValue {
    /// Declared constant name.
    pub name: String,
    pub value: serde_json::Number,
    /// Path of the constant in generated code; defaults to `<Type>::<name>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Explicit display name; wins over every other source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Trailing line comment of the declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Prefix trimmed from declared names.
    pub trim_prefix: String,
    /// Use the line comment as display name when present.
    pub line_comment: bool,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("parse manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("manifest schema_version mismatch: expected {expected} got {got:?}")]
    SchemaVersion { expected: &'static str, got: String },
}

pub fn parse_manifest(bytes: &[u8]) -> Result<Manifest, ManifestError> {
    let m: Manifest = serde_json::from_slice(bytes)?;
    if m.schema_version.trim() != MANIFEST_SCHEMA_VERSION {
        return Err(ManifestError::SchemaVersion {
            expected: MANIFEST_SCHEMA_VERSION,
            got: m.schema_version,
        });
    }
    Ok(m)
}

/// Types ready for generation plus the ones that could not be converted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub types: Vec<EnumType>,
    pub errors: Vec<InputError>,
}

impl Manifest {
    /// Converts the requested types, in request order. An empty request
    /// selects every type in manifest order.
    pub fn resolve(&self, requested: &[String], opts: &ResolveOptions) -> Resolved {
        let mut out = Resolved::default();
        let mut missing = Vec::new();

        let selected: Vec<&ManifestType> = if requested.is_empty() {
            self.types.iter().collect()
        } else {
            requested
                .iter()
                .filter_map(|name| {
                    let found = self.types.iter().find(|t| &t.name == name);
                    if found.is_none() {
                        missing.push(name.clone());
                    }
                    found
                })
                .collect()
        };

        for ty in selected {
            match ty.to_enum_type(opts) {
                Ok(t) => out.types.push(t),
                Err(e) => out.errors.push(e),
            }
        }
        if !missing.is_empty() {
            out.errors.push(InputError::UnknownTypes(missing));
        }
        out
    }
}

impl ManifestType {
    pub fn to_enum_type(&self, opts: &ResolveOptions) -> Result<EnumType, InputError> {
        // Unknown kinds still convert; the normalizer rejects them.
        let kind = IntKind::from_name(&self.kind);
        let mut values = Vec::with_capacity(self.values.len());
        for v in &self.values {
            if v.name == "_" {
                continue;
            }
            let n = self.int_value(v, kind)?;
            let name = display_name(v, opts);
            let reference = v
                .reference
                .clone()
                .unwrap_or_else(|| format!("{}::{}", self.name, v.name));
            let signed = kind.map_or(n < 0, IntKind::is_signed);
            let mut value = if signed {
                Value::signed(name, reference, n as i64)
            } else {
                Value::unsigned(name, reference, n as u64)
            };
            if let Some(canonical) = &v.canonical {
                value.canonical = canonical.clone();
            }
            values.push(value);
        }
        Ok(EnumType {
            name: self.name.clone(),
            kind: self.kind.clone(),
            values,
        })
    }

    fn int_value(&self, v: &ManifestValue, kind: Option<IntKind>) -> Result<i128, InputError> {
        let out_of_range = || InputError::ValueOutOfRange {
            type_name: self.name.clone(),
            constant: v.name.clone(),
            value: v.value.to_string(),
            kind: kind.unwrap_or(IntKind::I64),
        };
        let n = if let Some(i) = v.value.as_i64() {
            i as i128
        } else if let Some(u) = v.value.as_u64() {
            u as i128
        } else {
            return Err(out_of_range());
        };
        match kind {
            Some(k) if !k.contains(n) => Err(out_of_range()),
            _ => Ok(n),
        }
    }
}

fn display_name(v: &ManifestValue, opts: &ResolveOptions) -> String {
    if let Some(display) = &v.display {
        return display.clone();
    }
    if opts.line_comment {
        if let Some(comment) = v.comment.as_deref().map(str::trim) {
            if !comment.is_empty() {
                return comment.to_string();
            }
        }
    }
    v.name
        .strip_prefix(opts.trim_prefix.as_str())
        .unwrap_or(&v.name)
        .to_string()
}
