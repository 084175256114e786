//! Schema identifiers for the files `stringer` reads and writes.
//!
//! Bump the version suffix whenever the manifest or report shape changes.

pub const MANIFEST_SCHEMA_VERSION: &str = "stringer.manifest@0.1.0";
pub const REPORT_SCHEMA_VERSION: &str = "stringer.report@0.1.0";

/// Tool name written into generated file headers and reports.
pub const TOOL_NAME: &str = "stringer";
