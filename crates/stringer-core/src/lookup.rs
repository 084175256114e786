//! Name → value code shapes for the optional reverse-lookup function.
//!
//! Small sets get a hash `match`: one arm per distinct FNV-1a hash with the
//! colliding names tested one after another. A hash arm per name costs a few
//! lines each, so mid-sized sets switch to a binary search over a sorted name
//! blob, and very large ones to a lazily built `HashMap`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::emit::{item_ident, str_literal, SourceWriter};
use crate::normalize::Member;
use crate::table::{indexed_slice, NameTable};

pub const DEFAULT_LOOKUP_THRESHOLDS: (usize, usize) = (500, 5000);

const FNV_OFFSET_BASIS: u32 = 2166136261;
const FNV_PRIME: u32 = 16777619;

pub fn fnv1a32(s: &str) -> u32 {
    let mut h = FNV_OFFSET_BASIS;
    for b in s.bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    HashedSwitch,
    BinarySearch,
    DirectMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupEntry<'a> {
    pub name: &'a str,
    pub reference: &'a str,
    pub value: i128,
    pub pos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupPlan<'a> {
    /// Sorted by (hash, name).
    HashedSwitch { entries: Vec<(u32, LookupEntry<'a>)> },
    /// Sorted by name; `table` holds the names in the same order.
    BinarySearch {
        entries: Vec<LookupEntry<'a>>,
        table: NameTable,
    },
    DirectMap {
        entries: Vec<LookupEntry<'a>>,
        index: BTreeMap<&'a str, i128>,
    },
}

/// One entry per distinct display name, sorted by name. When two values
/// share a name, the one declared first wins.
fn distinct_names(members: &[Member]) -> Vec<LookupEntry<'_>> {
    let mut entries: Vec<LookupEntry<'_>> = members
        .iter()
        .map(|m| LookupEntry {
            name: &m.value.name,
            reference: &m.value.reference,
            value: m.value.as_i128(),
            pos: m.pos,
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(b.name).then(a.pos.cmp(&b.pos)));
    entries.dedup_by(|later, kept| later.name == kept.name);
    entries
}

impl<'a> LookupPlan<'a> {
    /// Picks the code shape from the size of the deduplicated value set.
    pub fn select(members: &'a [Member], thresholds: (usize, usize)) -> LookupPlan<'a> {
        let (switch_max, search_max) = thresholds;
        let entries = distinct_names(members);
        let n = members.len();
        if n <= switch_max {
            let mut hashed: Vec<(u32, LookupEntry<'a>)> =
                entries.into_iter().map(|e| (fnv1a32(e.name), e)).collect();
            hashed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.name.cmp(b.1.name)));
            LookupPlan::HashedSwitch { entries: hashed }
        } else if n <= search_max {
            let table = NameTable::build(entries.iter().map(|e| e.name));
            LookupPlan::BinarySearch { entries, table }
        } else {
            let index = entries.iter().map(|e| (e.name, e.value)).collect();
            LookupPlan::DirectMap { entries, index }
        }
    }

    pub fn strategy(&self) -> LookupStrategy {
        match self {
            LookupPlan::HashedSwitch { .. } => LookupStrategy::HashedSwitch,
            LookupPlan::BinarySearch { .. } => LookupStrategy::BinarySearch,
            LookupPlan::DirectMap { .. } => LookupStrategy::DirectMap,
        }
    }

    /// Value the generated function returns for `name`. Mirrors the emitted
    /// search, including hash bucketing.
    pub fn lookup(&self, name: &str) -> Option<i128> {
        match self {
            LookupPlan::HashedSwitch { entries } => {
                let h = fnv1a32(name);
                let start = entries.partition_point(|(eh, _)| *eh < h);
                entries[start..]
                    .iter()
                    .take_while(|(eh, _)| *eh == h)
                    .find(|(_, e)| e.name == name)
                    .map(|(_, e)| e.value)
            }
            LookupPlan::BinarySearch { entries, table } => {
                let (mut lo, mut hi) = (0usize, entries.len());
                while lo < hi {
                    let mid = lo + (hi - lo) / 2;
                    let s = table.get(mid)?;
                    match name.cmp(s) {
                        std::cmp::Ordering::Equal => return Some(entries[mid].value),
                        std::cmp::Ordering::Less => hi = mid,
                        std::cmp::Ordering::Greater => lo = mid + 1,
                    }
                }
                None
            }
            LookupPlan::DirectMap { index, .. } => index.get(name).copied(),
        }
    }

    pub fn render(&self, type_name: &str, fn_name: &str, w: &mut SourceWriter) {
        w.blank();
        match self {
            LookupPlan::HashedSwitch { entries } => {
                render_hashed_switch(type_name, fn_name, entries, w)
            }
            LookupPlan::BinarySearch { entries, table } => {
                render_binary_search(type_name, fn_name, entries, table, w)
            }
            LookupPlan::DirectMap { entries, .. } => {
                render_direct_map(type_name, fn_name, entries, w)
            }
        }
    }
}

fn open_fn(type_name: &str, fn_name: &str, w: &mut SourceWriter) {
    w.line("#[allow(non_snake_case)]");
    w.open(&format!("pub fn {fn_name}(name: &str) -> Option<{type_name}>"));
}

fn render_hashed_switch(
    type_name: &str,
    fn_name: &str,
    entries: &[(u32, LookupEntry<'_>)],
    w: &mut SourceWriter,
) {
    open_fn(type_name, fn_name, w);
    w.line("// fnv1a32 hash");
    w.line(&format!("let mut h: u32 = {FNV_OFFSET_BASIS};"));
    w.open("for &b in name.as_bytes()");
    w.line("h ^= b as u32;");
    w.line(&format!("h = h.wrapping_mul({FNV_PRIME});"));
    w.close();
    w.blank();
    w.open("match h");
    let mut prev: Option<u32> = None;
    for (h, e) in entries {
        if prev != Some(*h) {
            if prev.is_some() {
                w.close();
            }
            w.open(&format!("0x{h:08x} =>"));
            prev = Some(*h);
        }
        w.open(&format!("if name == {}", str_literal(e.name)));
        w.line(&format!("return Some({});", e.reference));
        w.close();
    }
    if prev.is_some() {
        w.close();
    }
    w.line("_ => {}");
    w.close();
    w.line("None");
    w.close();
}

fn render_binary_search(
    type_name: &str,
    fn_name: &str,
    entries: &[LookupEntry<'_>],
    table: &NameTable,
    w: &mut SourceWriter,
) {
    let names = item_ident(type_name, "name", "_lookup");
    let index = item_ident(type_name, "index", "_lookup");
    let values = item_ident(type_name, "value", "_lookup");
    table.declare_blob(w, &names);
    table.declare_index(w, &index);
    // Values in exactly the order of the sorted names.
    w.line("#[allow(non_upper_case_globals)]");
    w.line(&format!(
        "static {values}: [{type_name}; {}] = [",
        entries.len()
    ));
    w.indent();
    for e in entries {
        w.line(&format!("{},", e.reference));
    }
    w.dedent();
    w.line("];");
    w.blank();

    open_fn(type_name, fn_name, w);
    w.line(&format!("let (mut lo, mut hi) = (0usize, {values}.len());"));
    w.open("while lo < hi");
    w.line("let mid = lo + (hi - lo) / 2;");
    w.line(&format!("let s = {};", indexed_slice(&names, &index, "mid")));
    w.open("match name.cmp(s)");
    w.line(&format!(
        "::core::cmp::Ordering::Equal => return Some({values}[mid]),"
    ));
    w.line("::core::cmp::Ordering::Less => hi = mid,");
    w.line("::core::cmp::Ordering::Greater => lo = mid + 1,");
    w.close();
    w.close();
    w.line("None");
    w.close();
}

fn render_direct_map(
    type_name: &str,
    fn_name: &str,
    entries: &[LookupEntry<'_>],
    w: &mut SourceWriter,
) {
    open_fn(type_name, fn_name, w);
    let map = format!("::std::collections::HashMap<&'static str, {type_name}>");
    w.line(&format!("static LOOKUP: ::std::sync::OnceLock<{map}> ="));
    w.indent();
    w.line("::std::sync::OnceLock::new();");
    w.dedent();
    w.line("LOOKUP");
    w.indent();
    w.open(".get_or_init(||");
    w.line("[");
    w.indent();
    for e in entries {
        w.line(&format!("({}, {}),", str_literal(e.name), e.reference));
    }
    w.dedent();
    w.line("]");
    w.line(".into_iter()");
    w.line(".collect()");
    w.close_with("})");
    w.line(".get(name)");
    w.line(".copied()");
    w.dedent();
    w.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn members(names: &[&str]) -> Vec<Member> {
        names
            .iter()
            .enumerate()
            .map(|(pos, name)| Member {
                pos,
                value: Value::signed(*name, format!("T::{}", name.to_uppercase()), pos as i64),
            })
            .collect()
    }

    fn rendered(plan: &LookupPlan<'_>) -> String {
        let mut w = SourceWriter::new();
        plan.render("T", "parse_T", &mut w);
        w.finish()
    }

    #[test]
    fn fnv1a32_known_vectors() {
        assert_eq!(fnv1a32(""), 0x811c9dc5);
        assert_eq!(fnv1a32("a"), 0xe40c292c);
        assert_eq!(fnv1a32("foobar"), 0xbf9cf968);
    }

    #[test]
    fn hashed_switch_resolves_every_name() {
        let ms = members(&["Placebo", "Aspirin", "Ibuprofen"]);
        let plan = LookupPlan::select(&ms, DEFAULT_LOOKUP_THRESHOLDS);
        assert_eq!(plan.strategy(), LookupStrategy::HashedSwitch);
        assert_eq!(plan.lookup("Aspirin"), Some(1));
        assert_eq!(plan.lookup("Ibuprofen"), Some(2));
        assert_eq!(plan.lookup("aspirin"), None);
        assert_eq!(plan.lookup(""), None);

        let src = rendered(&plan);
        let arm = format!("0x{:08x} => {{", fnv1a32("Aspirin"));
        assert!(src.contains(&arm), "{src}");
        assert!(src.contains("return Some(T::ASPIRIN);"), "{src}");
        assert!(src.contains("pub fn parse_T(name: &str) -> Option<T> {"), "{src}");
    }

    #[test]
    fn hashed_switch_entries_sorted_by_hash() {
        let ms = members(&["d", "c", "b", "a"]);
        let plan = LookupPlan::select(&ms, DEFAULT_LOOKUP_THRESHOLDS);
        let LookupPlan::HashedSwitch { entries } = plan else {
            panic!("expected hashed switch");
        };
        let hashes: Vec<u32> = entries.iter().map(|(h, _)| *h).collect();
        let mut sorted = hashes.clone();
        sorted.sort();
        assert_eq!(hashes, sorted);
    }

    #[test]
    fn binary_search_sorts_names_bytewise() {
        let ms = members(&["b", "a", "B", "c"]);
        let plan = LookupPlan::select(&ms, (1, 10));
        assert_eq!(plan.strategy(), LookupStrategy::BinarySearch);
        let LookupPlan::BinarySearch { entries, table } = &plan else {
            unreachable!();
        };
        let names: Vec<&str> = entries.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["B", "a", "b", "c"]);
        assert_eq!(table.blob(), "Babc");
        for (i, name) in ["b", "a", "B", "c"].iter().enumerate() {
            assert_eq!(plan.lookup(name), Some(i as i128));
        }
        assert_eq!(plan.lookup("A"), None);
        assert_eq!(plan.lookup("d"), None);

        let src = rendered(&plan);
        assert!(src.contains("static _T_value_lookup: [T; 4] = ["), "{src}");
        assert!(src.contains("let mid = lo + (hi - lo) / 2;"), "{src}");
    }

    #[test]
    fn direct_map_past_upper_threshold() {
        let ms = members(&["x", "y", "z"]);
        let plan = LookupPlan::select(&ms, (1, 2));
        assert_eq!(plan.strategy(), LookupStrategy::DirectMap);
        assert_eq!(plan.lookup("y"), Some(1));
        assert_eq!(plan.lookup("w"), None);
        let src = rendered(&plan);
        assert!(src.contains("(\"z\", T::Z),"), "{src}");
        assert!(src.contains(".get(name)"), "{src}");
    }

    #[test]
    fn shared_display_name_keeps_first_declared() {
        let ms = vec![
            Member {
                pos: 1,
                value: Value::signed("Dup", "T::LATER", 0),
            },
            Member {
                pos: 0,
                value: Value::signed("Dup", "T::EARLIER", 7),
            },
        ];
        for thresholds in [(10, 20), (0, 20), (0, 0)] {
            let plan = LookupPlan::select(&ms, thresholds);
            assert_eq!(plan.lookup("Dup"), Some(7), "{:?}", plan.strategy());
        }
    }
}
