// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Sequence Selector
// ─────────────────────────────────────────────────────────────────────
//! Picks the longest run; equal-longest runs are ranked by mean
//! chi-square, and a tie on that too keeps the earliest run.

use gmode_types::Run;

/// Select the best run, or `None` for an empty list.
pub fn select_run<'a>(runs: &[Run<'a>]) -> Option<Run<'a>> {
    let max_len = runs.iter().map(Run::len).max()?;
    let mut longest = runs.iter().filter(|r| r.len() == max_len);

    let mut best = *longest.next()?;
    let mut best_score = best.mean_chi_square();
    for run in longest {
        let score = run.mean_chi_square();
        if score < best_score {
            best = *run;
            best_score = score;
        }
    }
    Some(best)
}
