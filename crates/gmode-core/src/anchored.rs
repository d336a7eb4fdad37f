// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Anchor-Based Pattern Building
// ─────────────────────────────────────────────────────────────────────
//! Builds a theoretical pattern outward from one chosen observed mode.
//!
//! The anchor is compared in the segment's own observable (frequency or
//! period), not in periods: closest-in-frequency and closest-in-period
//! can pick different modes.

use gmode_types::{AlignedPattern, GmodeError, GmodeResult, ObservedSegment, TheoreticalSpectrum};

use crate::aligner::{align, anchor_offset};
use crate::spacing::alignment_chi_square;

/// Align from a given observed value, which must occur in `segment`.
pub fn build_from_anchor(
    spectrum: &TheoreticalSpectrum,
    segment: &ObservedSegment,
    anchor: f64,
) -> GmodeResult<AlignedPattern> {
    let observed_anchor = segment
        .values()
        .iter()
        .position(|&v| v == anchor)
        .ok_or(GmodeError::AnchorNotObserved(anchor))?;

    let theoretical_anchor = closest_index(spectrum.values(segment.observable()), anchor);

    let offset = anchor_offset(observed_anchor, theoretical_anchor);
    let modes = align(spectrum, segment.len(), offset);
    let chi2 = alignment_chi_square(segment, &modes);

    log::debug!(
        "anchor {anchor}: observed #{observed_anchor} ↔ theoretical #{theoretical_anchor}, spacing_chi2={chi2:.4}"
    );

    Ok(AlignedPattern {
        modes,
        alignment_chi_square: chi2,
        offset: Some(offset),
    })
}

/// Align from the segment's highest-frequency mode.
pub fn build_from_highest_frequency(
    spectrum: &TheoreticalSpectrum,
    segment: &ObservedSegment,
) -> GmodeResult<AlignedPattern> {
    build_from_anchor(spectrum, segment, segment.highest_frequency_value())
}

/// First index minimising `|values[j] − target|`.
fn closest_index(values: &[f64], target: f64) -> usize {
    let mut best = (0, f64::INFINITY);
    for (j, &v) in values.iter().enumerate() {
        let d = (v - target).abs();
        if d < best.1 {
            best = (j, d);
        }
    }
    best.0
}
