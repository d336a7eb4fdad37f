// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Run Segmenter
// ─────────────────────────────────────────────────────────────────────
//! Partitions matched pairs into maximal runs of consecutive radial order.
//!
//! The direction is fixed once per spectrum (see `OrderDirection`); pair
//! `i + 1` extends the run of pair `i` iff `direction.continues(n_i, n_{i+1})`.
//! A pair that fails to continue closes the current run as its last member.

use gmode_types::{MatchedPair, OrderDirection, Run};

/// Split `pairs` into runs covering every pair exactly once, in order.
pub fn segment_runs(pairs: &[MatchedPair], direction: OrderDirection) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    if pairs.is_empty() {
        return runs;
    }

    let mut start = 0;
    for (i, w) in pairs.windows(2).enumerate() {
        if !direction.continues(w[0].radial_order, w[1].radial_order) {
            runs.push(Run::new(&pairs[start..=i]));
            start = i + 1;
        }
    }
    runs.push(Run::new(&pairs[start..]));
    runs
}
