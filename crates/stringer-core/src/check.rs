use crate::emit::SourceWriter;
use crate::value::Value;

/// Emits a `const` block that stops compiling once a constant's value
/// drifts from the value it had when the code was generated.
///
/// Every declared constant is checked, duplicates included, so renumbering
/// any of them is caught. The subtraction happens in the constant's own
/// type, so a typed canonical literal such as `8u32` is accepted and an
/// overflow is a compile error like any other mismatch.
pub fn render_guard(values: &[Value], w: &mut SourceWriter) {
    w.open("const _: () =");
    w.line("// A failed constant evaluation here means the constant values have changed.");
    w.line("// Re-run the stringer command to generate them again.");
    for v in values {
        w.line(&format!(
            "assert!({}.0 - {} == 0);",
            v.reference,
            canonical_literal(v)
        ));
    }
    w.close_with("};");
}

/// Right-hand side of the guard. Anything other than a plain decimal
/// literal is parenthesized, since `-` binds tighter than `<<`, `&` or `|`.
fn canonical_literal(v: &Value) -> String {
    let text = v.canonical.trim();
    if text.is_empty() {
        v.to_string()
    } else if is_decimal_literal(text) {
        text.to_string()
    } else {
        format!("({text})")
    }
}

fn is_decimal_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    digits.starts_with(|c: char| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_asserts_each_constant() {
        let values = vec![
            Value::signed("Minus", "T::MINUS", -1),
            Value::signed("Zero", "T::ZERO", 0),
            Value::signed("Alias", "T::ALIAS", 0),
        ];
        let mut w = SourceWriter::new();
        render_guard(&values, &mut w);
        let src = w.finish();
        assert!(src.starts_with("const _: () = {\n"), "{src}");
        assert!(src.contains("    assert!(T::MINUS.0 - -1 == 0);\n"), "{src}");
        assert!(src.contains("    assert!(T::ALIAS.0 - 0 == 0);\n"), "{src}");
        assert!(src.ends_with("};\n"), "{src}");
    }

    #[test]
    fn blank_canonical_falls_back_to_decimal() {
        let mut v = Value::unsigned("Max", "T::MAX", u64::MAX);
        v.canonical = String::new();
        assert_eq!(canonical_literal(&v), "18446744073709551615");
    }

    #[test]
    fn expression_canonical_is_parenthesized() {
        let mut eight = Value::signed("Eight", "G::EIGHT", 8);
        eight.canonical = "1 << 3".to_string();
        let mut mask = Value::unsigned("Mask", "G::MASK", 6);
        mask.canonical = "2 | 4".to_string();
        let mut typed = Value::unsigned("Typed", "G::TYPED", 8);
        typed.canonical = "8u32".to_string();
        let mut w = SourceWriter::new();
        render_guard(&[eight, mask, typed], &mut w);
        let src = w.finish();
        assert!(src.contains("assert!(G::EIGHT.0 - (1 << 3) == 0);"), "{src}");
        assert!(src.contains("assert!(G::MASK.0 - (2 | 4) == 0);"), "{src}");
        assert!(src.contains("assert!(G::TYPED.0 - (8u32) == 0);"), "{src}");
        syn::parse_file(&src).expect("guard parses");
    }

    #[test]
    fn plain_literals_stay_bare() {
        assert!(is_decimal_literal("-9223372036854775808"));
        assert!(is_decimal_literal("1_000"));
        assert!(!is_decimal_literal("-"));
        assert!(!is_decimal_literal("0x10"));
        assert!(!is_decimal_literal("1 << 3"));
    }
}
