use crate::diagnostics::{Diagnostic, DiagnosticCode};

/// Parses generated text as a Rust file.
///
/// A failure here is a bug in the generator, never in the input. Callers keep
/// the text and report the diagnostic so the defect can be inspected.
pub fn verify_source(src: &str) -> Result<(), Diagnostic> {
    match syn::parse_file(src) {
        Ok(_) => Ok(()),
        Err(e) => Err(Diagnostic::error(
            DiagnosticCode::STR0901InternalBug,
            format!("invalid Rust generated: {e}"),
        )),
    }
}
