use crate::error::InputError;
use crate::value::{EnumType, IntKind, Value};

/// A value that survived normalization, with its position in the caller's
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub pos: usize,
    pub value: Value,
}

impl Member {
    pub fn name(&self) -> &str {
        &self.value.name
    }
}

/// The sorted, deduplicated constant set of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub type_name: String,
    pub kind: IntKind,
    /// Strictly increasing by value.
    pub members: Vec<Member>,
}

/// Sorts by value and drops duplicate values.
///
/// The sort is stable, so for equal values the constant declared first comes
/// first and is the one kept. Its name is the one the stringifier prints.
/// Keeping more than one would make the generated `match` arms overlap.
pub fn normalize(ty: &EnumType) -> Result<Normalized, InputError> {
    let Some(kind) = IntKind::from_name(&ty.kind) else {
        return Err(InputError::UnsupportedKind {
            type_name: ty.name.clone(),
            kind: ty.kind.clone(),
        });
    };
    if ty.values.is_empty() {
        return Err(InputError::Empty {
            type_name: ty.name.clone(),
        });
    }

    let mut members: Vec<Member> = ty
        .values
        .iter()
        .enumerate()
        .map(|(pos, value)| Member {
            pos,
            value: value.clone(),
        })
        .collect();
    members.sort_by(|a, b| a.value.cmp_value(&b.value));
    members.dedup_by(|later, kept| later.value.bits == kept.value.bits);

    Ok(Normalized {
        type_name: ty.name.clone(),
        kind,
        members,
    })
}
