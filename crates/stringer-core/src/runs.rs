use crate::normalize::Member;

/// A maximal slice of members whose values increase by exactly one.
pub type Run<'a> = &'a [Member];

/// Breaks normalized members into runs of contiguous values.
/// For example, given 1,2,3,5,6,7 it returns {1,2,3},{5,6,7}.
///
/// Adjacency is tested on the bit pattern with a wrapping increment, which
/// makes `-1, 0` contiguous for signed types.
pub fn split_into_runs(members: &[Member]) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut rest = members;
    while !rest.is_empty() {
        let mut i = 1;
        while i < rest.len() && rest[i].value.bits == rest[i - 1].value.bits.wrapping_add(1) {
            i += 1;
        }
        let (run, tail) = rest.split_at(i);
        runs.push(run);
        rest = tail;
    }
    runs
}
