// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Chi-Square Longest-Sequence Pattern
// ─────────────────────────────────────────────────────────────────────
//! Full pipeline for one observed segment:
//!   1. Match every observed period to its closest theoretical period
//!   2. Split the matches into runs of consecutive radial order
//!   3. Select the longest run (mean chi-square breaks ties)
//!   4. Align the spectrum to the segment from the run's first pair
//!   5. Score the alignment on period spacings

use gmode_types::{AlignedPattern, GmodeError, GmodeResult, ObservedSegment, TheoreticalSpectrum};

use crate::aligner::{align, anchor_offset};
use crate::matcher::match_segment;
use crate::segmenter::segment_runs;
use crate::selector::select_run;
use crate::spacing::alignment_chi_square;

/// Build the theoretical counterpart of `segment` from the best run of
/// consecutive radial orders.
///
/// Fails with `InsufficientTheory` before any segmentation when the
/// spectrum is shorter than the segment.
pub fn chisq_longest_sequence(
    spectrum: &TheoreticalSpectrum,
    segment: &ObservedSegment,
) -> GmodeResult<AlignedPattern> {
    let pairs = match_segment(spectrum, segment)?;
    let runs = segment_runs(&pairs, spectrum.order_direction());

    let run = select_run(&runs)
        .ok_or_else(|| GmodeError::Validation("observed segment has no modes".to_string()))?;
    let anchor = run
        .first()
        .ok_or_else(|| GmodeError::Validation("selected run is empty".to_string()))?;

    let offset = anchor_offset(anchor.observed_index, anchor.theoretical_index);
    let modes = align(spectrum, segment.len(), offset);
    let chi2 = alignment_chi_square(segment, &modes);

    log::debug!(
        "longest sequence: {} runs, best len={} mean_chi2={:.4}, offset={offset}, spacing_chi2={chi2:.4}",
        runs.len(),
        run.len(),
        run.mean_chi_square(),
    );

    Ok(AlignedPattern {
        modes,
        alignment_chi_square: chi2,
        offset: Some(offset),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmode_types::{Observable, INSUFFICIENT_THEORY_CHI2};

    fn ramp_spectrum() -> TheoreticalSpectrum {
        TheoreticalSpectrum::from_periods(vec![1.0, 1.1, 1.2, 1.3, 1.4], vec![-5, -4, -3, -2, -1])
            .unwrap()
    }

    #[test]
    fn test_two_mode_scenario() {
        // 1.05 sits exactly halfway between 1.0 and 1.1 in f64, so it matches
        // index 0 (first occurrence); the 1.22 ↔ 1.2 run wins the length tie
        // on chi-square and anchors the alignment.
        let seg = ObservedSegment::from_periods(vec![1.05, 1.22], vec![0.01, 0.01]).unwrap();
        let p = chisq_longest_sequence(&ramp_spectrum(), &seg).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.offset, Some(1));
        assert_eq!(p.values_with_sentinel(Observable::Period), vec![1.1, 1.2]);
        assert_eq!(p.orders_with_sentinel(), vec![-4, -3]);
    }

    #[test]
    fn test_consecutive_run_anchor() {
        let seg = ObservedSegment::from_periods(vec![1.09, 1.21, 1.29], vec![0.01; 3]).unwrap();
        let p = chisq_longest_sequence(&ramp_spectrum(), &seg).unwrap();
        assert_eq!(p.offset, Some(1));
        assert_eq!(p.orders_with_sentinel(), vec![-4, -3, -2]);
        assert!(p.alignment_chi_square.is_finite());
    }

    #[test]
    fn test_insufficient_theory_before_segmentation() {
        let s = TheoreticalSpectrum::from_periods(vec![1.0, 1.1, 1.2], vec![-3, -2, -1]).unwrap();
        let seg = ObservedSegment::from_periods(vec![1.0, 1.1, 1.2, 1.3, 1.4], vec![0.01; 5])
            .unwrap();
        assert!(matches!(
            chisq_longest_sequence(&s, &seg),
            Err(GmodeError::InsufficientTheory { .. })
        ));
    }

    #[test]
    fn test_trailing_sentinels() {
        // Best run anchors the first two observed modes on the last two
        // theoretical modes; the third observed mode falls off the end.
        let seg = ObservedSegment::from_periods(vec![1.3, 1.4, 1.9], vec![0.01; 3]).unwrap();
        let p = chisq_longest_sequence(&ramp_spectrum(), &seg).unwrap();
        assert_eq!(p.offset, Some(3));
        assert_eq!(p.orders_with_sentinel(), vec![-2, -1, -1]);
        assert!(p.modes[0].is_some());
        assert!(p.modes[1].is_some());
        assert!(p.modes[2].is_none());
        // The spacing into the missing mode carries the worst-case score.
        assert!(p.alignment_chi_square >= INSUFFICIENT_THEORY_CHI2 / 2.0);
    }

    #[test]
    fn test_leading_sentinels() {
        let seg = ObservedSegment::from_periods(vec![0.5, 1.0, 1.1], vec![0.01; 3]).unwrap();
        let p = chisq_longest_sequence(&ramp_spectrum(), &seg).unwrap();
        assert_eq!(p.offset, Some(-1));
        assert!(p.modes[0].is_none());
        assert_eq!(p.orders_with_sentinel(), vec![-1, -5, -4]);
    }

    #[test]
    fn test_single_mode_segment() {
        let seg = ObservedSegment::from_periods(vec![1.31], vec![0.01]).unwrap();
        let p = chisq_longest_sequence(&ramp_spectrum(), &seg).unwrap();
        assert_eq!(p.len(), 1);
        assert_eq!(p.orders_with_sentinel(), vec![-2]);
        assert_eq!(p.alignment_chi_square, 0.0);
    }

    #[test]
    fn test_descending_spectrum() {
        let s = TheoreticalSpectrum::from_periods(
            vec![0.4, 0.5, 0.6, 0.7, 0.8, 0.9],
            vec![-1, -2, -3, -4, -5, -6],
        )
        .unwrap();
        let seg = ObservedSegment::from_periods(vec![0.61, 0.69, 0.91], vec![0.01; 3]).unwrap();
        let p = chisq_longest_sequence(&s, &seg).unwrap();
        // -3,-4 chain; 0.91 matches -6 and breaks off. The alignment from
        // the longest run still places -5 against the third observed mode.
        assert_eq!(p.offset, Some(2));
        assert_eq!(p.orders_with_sentinel(), vec![-3, -4, -5]);
    }

    #[test]
    fn test_deterministic() {
        let seg = ObservedSegment::from_periods(vec![1.02, 1.18, 1.33, 1.39], vec![0.02; 4])
            .unwrap();
        let a = chisq_longest_sequence(&ramp_spectrum(), &seg).unwrap();
        let b = chisq_longest_sequence(&ramp_spectrum(), &seg).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.alignment_chi_square.to_bits(),
            b.alignment_chi_square.to_bits()
        );
    }
}
