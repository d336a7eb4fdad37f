// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Period-Spacing Series
// ─────────────────────────────────────────────────────────────────────
//! Period spacings ΔP_i = |P_i − P_{i+1}| in seconds, and the chi-square
//! between observed and aligned theoretical spacings.
//!
//! This score compares *spacings*; it is unrelated to the per-point
//! chi-square used to rank runs.

use gmode_types::{AlignedMode, ObservedSegment, INSUFFICIENT_THEORY_CHI2};

/// Day-to-second conversion.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Observed spacings with their propagated errors, both in seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpacingSeries {
    pub spacings: Vec<f64>,
    pub errors: Vec<f64>,
}

#[inline]
fn spacing(a: f64, b: f64) -> f64 {
    (a - b).abs() * SECONDS_PER_DAY
}

/// Observed spacing series, `σ_ΔP = sqrt(σ_i² + σ_{i+1}²)` in seconds.
pub fn observed_spacings(periods: &[f64], errors: &[f64]) -> SpacingSeries {
    let spacings = periods.windows(2).map(|w| spacing(w[0], w[1])).collect();
    let errors = errors
        .windows(2)
        .map(|w| (w[0] * w[0] + w[1] * w[1]).sqrt() * SECONDS_PER_DAY)
        .collect();
    SpacingSeries { spacings, errors }
}

/// Theoretical spacing series in seconds.
pub fn theoretical_spacings(periods: &[f64]) -> Vec<f64> {
    periods.windows(2).map(|w| spacing(w[0], w[1])).collect()
}

/// Mean squared, error-weighted residual between observed and aligned
/// spacings.
///
/// A spacing touching an absent theoretical mode counts as
/// `INSUFFICIENT_THEORY_CHI2`, so a partly unmatched alignment always
/// scores worse than a complete one. Single-mode segments have no
/// spacing and score `0.0`.
pub fn alignment_chi_square(segment: &ObservedSegment, modes: &[Option<AlignedMode>]) -> f64 {
    let observed = observed_spacings(segment.periods(), segment.period_errors());

    let (sum, count) = modes
        .windows(2)
        .zip(observed.spacings.iter().zip(&observed.errors))
        .map(|(w, (&dp_obs, &err))| match (w[0], w[1]) {
            (Some(a), Some(b)) => {
                let z = (dp_obs - spacing(a.period, b.period)) / err;
                z * z
            }
            _ => INSUFFICIENT_THEORY_CHI2,
        })
        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
