use serde::{Deserialize, Serialize};

use crate::error::OptionsError;
use crate::forward::DEFAULT_RUN_THRESHOLD;
use crate::lookup::DEFAULT_LOOKUP_THRESHOLDS;

/// Placeholder in the lookup template replaced with the type name.
pub const LOOKUP_PLACEHOLDER: &str = "{}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Name template of the reverse-lookup function; empty disables it.
    pub lookup_template: String,
    /// Run counts above this use a sparse `match` instead of range tests.
    pub run_threshold: usize,
    /// Largest set sizes for the hashed switch and the binary search.
    pub lookup_thresholds: (usize, usize),
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            lookup_template: String::new(),
            run_threshold: DEFAULT_RUN_THRESHOLD,
            lookup_thresholds: DEFAULT_LOOKUP_THRESHOLDS,
        }
    }
}

impl GenerateOptions {
    pub fn lookup_enabled(&self) -> bool {
        !self.lookup_template.is_empty()
    }

    /// Reverse-lookup function name for `type_name`, if lookup is enabled.
    pub fn lookup_fn_name(&self, type_name: &str) -> Option<String> {
        if !self.lookup_enabled() {
            return None;
        }
        Some(self.lookup_template.replacen(LOOKUP_PLACEHOLDER, type_name, 1))
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.run_threshold == 0 {
            return Err(OptionsError::ZeroRunThreshold);
        }
        let (lo, hi) = self.lookup_thresholds;
        if lo > hi {
            return Err(OptionsError::UnorderedLookupThresholds(lo, hi));
        }
        if self.lookup_enabled() && !self.lookup_template.contains(LOOKUP_PLACEHOLDER) {
            return Err(OptionsError::MissingPlaceholder(self.lookup_template.clone()));
        }
        Ok(())
    }

    /// Checks that the lookup template yields an identifier for `type_name`.
    pub fn validate_type(&self, type_name: &str) -> Result<(), OptionsError> {
        let Some(name) = self.lookup_fn_name(type_name) else {
            return Ok(());
        };
        if syn::parse_str::<syn::Ident>(&name).is_err() {
            return Err(OptionsError::InvalidLookupName {
                template: self.lookup_template.clone(),
                type_name: type_name.to_string(),
                name,
            });
        }
        Ok(())
    }
}
