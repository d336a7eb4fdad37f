// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Pattern Aligner
// ─────────────────────────────────────────────────────────────────────
//! Places the theoretical spectrum against a whole observed segment.
//!
//! One anchor pair (observed index `i_obs` ↔ theoretical index `i_theo`)
//! fixes `offset = i_theo − i_obs`; observed position `i` then maps to
//! theoretical index `offset + i`. Positions falling outside the spectrum
//! get no counterpart. Interior holes cannot occur.

use gmode_types::{AlignedMode, TheoreticalSpectrum};

/// Offset implied by an anchor pair.
#[inline]
pub fn anchor_offset(observed_anchor: usize, theoretical_anchor: usize) -> isize {
    theoretical_anchor as isize - observed_anchor as isize
}

/// Theoretical counterpart of each of `observed_len` positions.
pub fn align(
    spectrum: &TheoreticalSpectrum,
    observed_len: usize,
    offset: isize,
) -> Vec<Option<AlignedMode>> {
    let periods = spectrum.periods();
    let frequencies = spectrum.frequencies();
    let orders = spectrum.orders();

    (0..observed_len)
        .map(|i| {
            let index = usize::try_from(offset + i as isize).ok()?;
            (index < periods.len()).then(|| AlignedMode {
                index,
                period: periods[index],
                frequency: frequencies[index],
                radial_order: orders[index],
            })
        })
        .collect()
}
