//! Namespace mangling.
//!
//! A dotted IDL namespace becomes nested `pub mod` blocks. The functions here
//! are pure: the same input always yields the same text, and
//! [`namespace_close`] balances exactly what [`namespace_open`] opened.

use idlgen_schema::field_ident;

/// Name of the extra innermost module added in embedded mode.
pub const EMBEDDED_MODULE: &str = "embedded";

fn segments(namespace: &str, embedded: bool) -> Vec<String> {
    let mut segments: Vec<String> = namespace
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(field_ident)
        .collect();
    if embedded && !segments.is_empty() {
        segments.push(EMBEDDED_MODULE.to_string());
    }
    segments
}

/// Opens one module per namespace segment, left to right.
///
/// An empty namespace yields an empty string even in embedded mode.
#[must_use]
pub fn namespace_open(namespace: &str, embedded: bool) -> String {
    let mut output = String::new();
    for segment in segments(namespace, embedded) {
        output.push_str(&format!("pub mod {segment} {{\n"));
    }
    if !output.is_empty() {
        output.push('\n');
    }
    output
}

/// Closes the modules opened by [`namespace_open`] with the same arguments.
#[must_use]
pub fn namespace_close(namespace: &str, embedded: bool) -> String {
    let count = segments(namespace, embedded).len();
    if count == 0 {
        return String::new();
    }
    format!("\n{} // namespace\n", "}".repeat(count))
}

/// Module path of the namespace, e.g. `tutorial::calc::embedded`.
#[must_use]
pub fn namespace_path(namespace: &str, embedded: bool) -> String {
    segments(namespace, embedded).join("::")
}
