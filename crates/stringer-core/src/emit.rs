/// Indented line buffer for generated Rust.
///
/// Each generation pass owns one writer and hands its text back through
/// [`SourceWriter::finish`]; writers are never shared between types.
#[derive(Debug, Default)]
pub struct SourceWriter {
    out: String,
    indent: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, s: &str) {
        if s.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(s);
        self.out.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Writes `head {` and indents.
    pub fn open(&mut self, head: &str) {
        self.line(&format!("{head} {{"));
        self.indent += 1;
    }

    pub fn close(&mut self) {
        self.close_with("}");
    }

    /// Dedents and writes `tail`, e.g. `};`.
    pub fn close_with(&mut self, tail: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(tail);
    }

    /// Closes the current block and opens the next one on the same line,
    /// e.g. `} else if x {`.
    pub fn reopen(&mut self, joint: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(joint);
        self.indent += 1;
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Rust string literal for `s`.
pub fn str_literal(s: &str) -> String {
    format!("{s:?}")
}

/// Identifier of a generated item, e.g. `_Pill_name_2`.
pub(crate) fn item_ident(type_name: &str, item: &str, suffix: &str) -> String {
    format!("_{type_name}_{item}{suffix}")
}

/// Call-site fallback: `write!(f, "Pill({})", <value>)`.
pub(crate) fn fallback_write(type_name: &str, value_expr: &str) -> String {
    let fmt = str_literal(&format!("{type_name}({{}})"));
    format!("write!(f, {fmt}, {value_expr})")
}
