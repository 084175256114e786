use serde::{Deserialize, Serialize};

use crate::emit::{str_literal, SourceWriter};

/// Element type of a generated offset index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexWidth {
    U8,
    U16,
    U32,
}

impl IndexWidth {
    /// Smallest unsigned width holding every offset into a blob of `blob_len` bytes.
    pub fn for_len(blob_len: usize) -> IndexWidth {
        if blob_len < 1 << 8 {
            IndexWidth::U8
        } else if blob_len < 1 << 16 {
            IndexWidth::U16
        } else {
            // 2^32 bytes of names is enough for anyone.
            IndexWidth::U32
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            IndexWidth::U8 => 8,
            IndexWidth::U16 => 16,
            IndexWidth::U32 => 32,
        }
    }

    pub fn rust_type(self) -> &'static str {
        match self {
            IndexWidth::U8 => "u8",
            IndexWidth::U16 => "u16",
            IndexWidth::U32 => "u32",
        }
    }
}

/// Names concatenated into one blob plus cumulative byte offsets.
///
/// `offsets` has one entry per name plus a leading zero, so name `i` is
/// `blob[offsets[i]..offsets[i + 1]]` and the last offset is `blob.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTable {
    blob: String,
    offsets: Vec<usize>,
}

impl NameTable {
    pub fn build<'a, I>(names: I) -> NameTable
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut blob = String::new();
        let mut offsets = vec![0];
        for name in names {
            blob.push_str(name);
            offsets.push(blob.len());
        }
        NameTable { blob, offsets }
    }

    pub fn blob(&self) -> &str {
        &self.blob
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Number of names in the table.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn width(&self) -> IndexWidth {
        IndexWidth::for_len(self.blob.len())
    }

    pub fn span(&self, i: usize) -> Option<(usize, usize)> {
        if i >= self.len() {
            return None;
        }
        Some((self.offsets[i], self.offsets[i + 1]))
    }

    pub fn get(&self, i: usize) -> Option<&str> {
        let (begin, end) = self.span(i)?;
        Some(&self.blob[begin..end])
    }

    /// `const <ident>: &str = "...";`
    pub fn declare_blob(&self, w: &mut SourceWriter, ident: &str) {
        w.line("#[allow(non_upper_case_globals)]");
        w.line(&format!("const {ident}: &str = {};", str_literal(&self.blob)));
    }

    /// `static <ident>: [uN; len+1] = [0, ...];`
    pub fn declare_index(&self, w: &mut SourceWriter, ident: &str) {
        let items: Vec<String> = self.offsets.iter().map(|o| o.to_string()).collect();
        w.line("#[allow(non_upper_case_globals)]");
        w.line(&format!(
            "static {ident}: [{}; {}] = [{}];",
            self.width().rust_type(),
            self.offsets.len(),
            items.join(", ")
        ));
    }
}

/// Expression slicing name `i` out of a blob through its index.
pub(crate) fn indexed_slice(blob: &str, index: &str, i: &str) -> String {
    format!("&{blob}[{index}[{i}] as usize..{index}[{i} + 1] as usize]")
}
