use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Underlying primitive of an enumeration newtype (`struct Pill(pub i32)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl IntKind {
    pub fn from_name(name: &str) -> Option<IntKind> {
        match name.trim() {
            "i8" => Some(IntKind::I8),
            "i16" => Some(IntKind::I16),
            "i32" => Some(IntKind::I32),
            "i64" => Some(IntKind::I64),
            "isize" => Some(IntKind::Isize),
            "u8" => Some(IntKind::U8),
            "u16" => Some(IntKind::U16),
            "u32" => Some(IntKind::U32),
            "u64" => Some(IntKind::U64),
            "usize" => Some(IntKind::Usize),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntKind::I8 => "i8",
            IntKind::I16 => "i16",
            IntKind::I32 => "i32",
            IntKind::I64 => "i64",
            IntKind::Isize => "isize",
            IntKind::U8 => "u8",
            IntKind::U16 => "u16",
            IntKind::U32 => "u32",
            IntKind::U64 => "u64",
            IntKind::Usize => "usize",
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            IntKind::I8 | IntKind::I16 | IntKind::I32 | IntKind::I64 | IntKind::Isize
        )
    }

    /// Inclusive value range. `isize`/`usize` are treated as 64-bit.
    pub fn range(self) -> (i128, i128) {
        match self {
            IntKind::I8 => (i8::MIN as i128, i8::MAX as i128),
            IntKind::I16 => (i16::MIN as i128, i16::MAX as i128),
            IntKind::I32 => (i32::MIN as i128, i32::MAX as i128),
            IntKind::I64 | IntKind::Isize => (i64::MIN as i128, i64::MAX as i128),
            IntKind::U8 => (0, u8::MAX as i128),
            IntKind::U16 => (0, u16::MAX as i128),
            IntKind::U32 => (0, u32::MAX as i128),
            IntKind::U64 | IntKind::Usize => (0, u64::MAX as i128),
        }
    }

    pub fn contains(self, v: i128) -> bool {
        let (lo, hi) = self.range();
        lo <= v && v <= hi
    }
}

impl fmt::Display for IntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared constant of an enumeration type.
///
/// The value is stored as a bit pattern alone; `signed` says whether to read
/// it as `i64` or `u64`. The only places this matters are ordering and the
/// literals written into generated code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    /// Display name, the text the value renders as.
    pub name: String,
    /// Path expression naming the constant in the generated code (`Pill::ASPIRIN`).
    pub reference: String,
    pub bits: u64,
    pub signed: bool,
    /// Literal form of the value, used by the consistency guard.
    pub canonical: String,
}

impl Value {
    pub fn signed(name: impl Into<String>, reference: impl Into<String>, v: i64) -> Self {
        Value {
            name: name.into(),
            reference: reference.into(),
            bits: v as u64,
            signed: true,
            canonical: v.to_string(),
        }
    }

    pub fn unsigned(name: impl Into<String>, reference: impl Into<String>, v: u64) -> Self {
        Value {
            name: name.into(),
            reference: reference.into(),
            bits: v,
            signed: false,
            canonical: v.to_string(),
        }
    }

    /// Numeric value widened so signed and unsigned patterns compare correctly.
    pub fn as_i128(&self) -> i128 {
        if self.signed {
            self.bits as i64 as i128
        } else {
            self.bits as i128
        }
    }

    pub fn cmp_value(&self, other: &Value) -> Ordering {
        self.as_i128().cmp(&other.as_i128())
    }
}

/// Decimal literal of the value; what the generated code compares against.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i128())
    }
}

/// All declared constants of one type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    /// Underlying kind as the collaborator spelled it; validated by the normalizer.
    pub kind: String,
    pub values: Vec<Value>,
}
