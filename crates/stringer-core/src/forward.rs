//! Value → name code shapes.
//!
//! Which shape to emit depends on the number of runs in the values. One run
//! is a bounds check and an offset. For a handful of runs an `if` chain of
//! range tests stays small. Past the run threshold the chain's linear scan
//! and code size stop paying off and a `match` over every value is emitted
//! instead. Realistically that only happens for bit masks, which deserve an
//! analysis of their own some other day.

use serde::{Deserialize, Serialize};

use crate::emit::{fallback_write, item_ident, SourceWriter};
use crate::normalize::Member;
use crate::runs::{split_into_runs, Run};
use crate::table::{indexed_slice, NameTable};

pub const DEFAULT_RUN_THRESHOLD: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardStrategy {
    OneRun,
    MultiRun,
    SparseMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardPlan<'a> {
    OneRun {
        run: Run<'a>,
        table: NameTable,
    },
    MultiRun {
        runs: Vec<(Run<'a>, NameTable)>,
    },
    /// Every value maps to explicit begin/end offsets into one shared blob.
    SparseMap {
        members: &'a [Member],
        table: NameTable,
    },
}

fn table_of(members: &[Member]) -> NameTable {
    NameTable::build(members.iter().map(Member::name))
}

impl<'a> ForwardPlan<'a> {
    /// Picks the code shape from the run count alone.
    pub fn select(members: &'a [Member], run_threshold: usize) -> ForwardPlan<'a> {
        let runs = split_into_runs(members);
        match runs.len() {
            1 => ForwardPlan::OneRun {
                run: runs[0],
                table: table_of(runs[0]),
            },
            n if n <= run_threshold => ForwardPlan::MultiRun {
                runs: runs.into_iter().map(|r| (r, table_of(r))).collect(),
            },
            _ => ForwardPlan::SparseMap {
                members,
                table: table_of(members),
            },
        }
    }

    pub fn strategy(&self) -> ForwardStrategy {
        match self {
            ForwardPlan::OneRun { .. } => ForwardStrategy::OneRun,
            ForwardPlan::MultiRun { .. } => ForwardStrategy::MultiRun,
            ForwardPlan::SparseMap { .. } => ForwardStrategy::SparseMap,
        }
    }

    /// Name the generated `Display` impl prints for `v`, or `None` when it
    /// falls back to `TypeName(v)`. Mirrors the emitted arithmetic.
    pub fn name_of(&self, v: i128) -> Option<&str> {
        match self {
            ForwardPlan::OneRun { run, table } => {
                let idx = v - run[0].value.as_i128();
                if idx < 0 || idx >= table.len() as i128 {
                    return None;
                }
                table.get(idx as usize)
            }
            ForwardPlan::MultiRun { runs } => runs.iter().find_map(|(run, table)| {
                let lo = run[0].value.as_i128();
                let hi = run[run.len() - 1].value.as_i128();
                if lo <= v && v <= hi {
                    table.get((v - lo) as usize)
                } else {
                    None
                }
            }),
            ForwardPlan::SparseMap { members, table } => {
                let i = members
                    .binary_search_by(|m| m.value.as_i128().cmp(&v))
                    .ok()?;
                table.get(i)
            }
        }
    }

    pub fn stringify(&self, type_name: &str, v: i128) -> String {
        match self.name_of(v) {
            Some(name) => name.to_string(),
            None => format!("{type_name}({v})"),
        }
    }

    pub fn render(&self, type_name: &str, w: &mut SourceWriter) {
        match self {
            ForwardPlan::OneRun { run, table } => render_one_run(type_name, run, table, w),
            ForwardPlan::MultiRun { runs } => render_multiple_runs(type_name, runs, w),
            ForwardPlan::SparseMap { members, table } => {
                render_sparse_map(type_name, members, table, w)
            }
        }
    }
}

fn open_display(type_name: &str, w: &mut SourceWriter) {
    w.open(&format!("impl ::core::fmt::Display for {type_name}"));
    w.open("fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result");
}

fn close_display(w: &mut SourceWriter) {
    w.close();
    w.close();
}

fn render_one_run(type_name: &str, run: Run<'_>, table: &NameTable, w: &mut SourceWriter) {
    let name = item_ident(type_name, "name", "");
    let index = item_ident(type_name, "index", "");
    w.blank();
    table.declare_blob(w, &name);
    table.declare_index(w, &index);
    w.blank();

    open_display(type_name, w);
    let lo = run[0].value.as_i128();
    if lo == 0 {
        w.line("let idx = self.0 as i128;");
    } else {
        w.line(&format!("let idx = self.0 as i128 - {lo};"));
    }
    w.open(&format!("if idx < 0 || idx >= ({index}.len() - 1) as i128"));
    w.line(&format!("return {};", fallback_write(type_name, "self.0")));
    w.close();
    w.line("let idx = idx as usize;");
    w.line(&format!(
        "f.write_str({})",
        indexed_slice(&name, &index, "idx")
    ));
    close_display(w);
}

fn render_multiple_runs(type_name: &str, runs: &[(Run<'_>, NameTable)], w: &mut SourceWriter) {
    w.blank();
    for (k, (_, table)) in runs.iter().enumerate() {
        table.declare_blob(w, &item_ident(type_name, "name", &format!("_{k}")));
    }
    // A single-value run is printed straight from its name constant.
    for (k, (run, table)) in runs.iter().enumerate() {
        if run.len() != 1 {
            table.declare_index(w, &item_ident(type_name, "index", &format!("_{k}")));
        }
    }
    w.blank();

    open_display(type_name, w);
    w.line("let i = self.0;");
    for (k, (run, _)) in runs.iter().enumerate() {
        let first = &run[0].value;
        let last = &run[run.len() - 1].value;
        let cond = if run.len() == 1 {
            format!("i == {first}")
        } else if first.bits == 0 && !first.signed {
            // For an unsigned lower bound of 0, "0 <= i" would be redundant.
            format!("i <= {last}")
        } else {
            format!("({first}..={last}).contains(&i)")
        };
        if k == 0 {
            w.open(&format!("let name = if {cond}"));
        } else {
            w.reopen(&format!("}} else if {cond} {{"));
        }

        let name = item_ident(type_name, "name", &format!("_{k}"));
        if run.len() == 1 {
            w.line(&name);
            continue;
        }
        if first.bits == 0 {
            w.line("let i = i as usize;");
        } else {
            w.line(&format!("let i = (i as i128 - {first}) as usize;"));
        }
        let index = item_ident(type_name, "index", &format!("_{k}"));
        w.line(&indexed_slice(&name, &index, "i"));
    }
    w.reopen("} else {");
    w.line(&format!("return {};", fallback_write(type_name, "i")));
    w.close_with("};");
    w.line("f.write_str(name)");
    close_display(w);
}

fn render_sparse_map(type_name: &str, members: &[Member], table: &NameTable, w: &mut SourceWriter) {
    let name = item_ident(type_name, "name", "");
    w.blank();
    table.declare_blob(w, &name);
    w.blank();

    open_display(type_name, w);
    w.open("let name = match self.0");
    for (i, m) in members.iter().enumerate() {
        let Some((begin, end)) = table.span(i) else {
            continue;
        };
        w.line(&format!("{} => &{name}[{begin}..{end}],", m.value));
    }
    w.line(&format!("i => return {},", fallback_write(type_name, "i")));
    w.close_with("};");
    w.line("f.write_str(name)");
    close_display(w);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn members(values: &[i64]) -> Vec<Member> {
        values
            .iter()
            .enumerate()
            .map(|(pos, &v)| Member {
                pos,
                value: Value::signed(format!("V{v}"), format!("T::V{pos}"), v),
            })
            .collect()
    }

    fn rendered(plan: &ForwardPlan<'_>) -> String {
        let mut w = SourceWriter::new();
        plan.render("T", &mut w);
        w.finish()
    }

    #[test]
    fn one_run_resolves_and_falls_back() {
        let ms = members(&[3, 4, 5]);
        let plan = ForwardPlan::select(&ms, DEFAULT_RUN_THRESHOLD);
        assert_eq!(plan.strategy(), ForwardStrategy::OneRun);
        assert_eq!(plan.stringify("T", 4), "V4");
        assert_eq!(plan.stringify("T", 2), "T(2)");
        assert_eq!(plan.stringify("T", 6), "T(6)");

        let src = rendered(&plan);
        assert!(src.contains("let idx = self.0 as i128 - 3;"), "{src}");
        assert!(src.contains("static _T_index: [u8; 4] = [0, 2, 4, 6];"), "{src}");
    }

    #[test]
    fn multiple_runs_use_range_tests() {
        let ms = members(&[-3, -2, 0, 1, 2, 9]);
        let plan = ForwardPlan::select(&ms, DEFAULT_RUN_THRESHOLD);
        assert_eq!(plan.strategy(), ForwardStrategy::MultiRun);
        for v in [-3, -2, 0, 1, 2, 9] {
            assert_eq!(plan.stringify("T", v), format!("V{v}"));
        }
        assert_eq!(plan.stringify("T", -1), "T(-1)");
        assert_eq!(plan.stringify("T", 8), "T(8)");

        let src = rendered(&plan);
        assert!(src.contains("let name = if (-3..=-2).contains(&i) {"), "{src}");
        assert!(src.contains("} else if (0..=2).contains(&i) {"), "{src}");
        assert!(src.contains("} else if i == 9 {"), "{src}");
        assert!(src.contains("let i = (i as i128 - -3) as usize;"), "{src}");
        assert!(!src.contains("_T_index_2"), "single-value run has no index: {src}");
    }

    #[test]
    fn unsigned_zero_lower_bound_is_one_sided() {
        let ms: Vec<Member> = [0u64, 1, 2, 7, 8]
            .iter()
            .enumerate()
            .map(|(pos, &v)| Member {
                pos,
                value: Value::unsigned(format!("U{v}"), format!("T::U{v}"), v),
            })
            .collect();
        let plan = ForwardPlan::select(&ms, DEFAULT_RUN_THRESHOLD);
        let src = rendered(&plan);
        assert!(src.contains("let name = if i <= 2 {"), "{src}");
        assert!(src.contains("let i = i as usize;"), "{src}");
        assert!(src.contains("} else if (7..=8).contains(&i) {"), "{src}");
    }

    #[test]
    fn many_runs_become_a_sparse_map() {
        let values: Vec<i64> = (1..12).map(|k| 1i64 << k).collect();
        let ms = members(&values);
        let plan = ForwardPlan::select(&ms, DEFAULT_RUN_THRESHOLD);
        assert_eq!(plan.strategy(), ForwardStrategy::SparseMap);
        for v in &values {
            assert_eq!(plan.stringify("T", *v as i128), format!("V{v}"));
        }
        assert_eq!(plan.stringify("T", 3), "T(3)");

        let src = rendered(&plan);
        assert!(src.contains("2 => &_T_name[0..2],"), "{src}");
        assert!(src.contains("4 => &_T_name[2..4],"), "{src}");
        assert!(src.contains("i => return write!(f, \"T({})\", i),"), "{src}");
    }

    #[test]
    fn ten_runs_stay_multi_run() {
        let values: Vec<i64> = (0..10).map(|k| k * 10).collect();
        let ms = members(&values);
        assert_eq!(
            ForwardPlan::select(&ms, DEFAULT_RUN_THRESHOLD).strategy(),
            ForwardStrategy::MultiRun
        );
        assert_eq!(ForwardPlan::select(&ms, 9).strategy(), ForwardStrategy::SparseMap);
    }
}
