// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Sequence Matcher
// ─────────────────────────────────────────────────────────────────────
//! Pairs every observed period with its closest theoretical period.
//!
//! Closeness is the per-point chi-square `((p_obs − p_theo) / σ_obs)²`.
//! The first theoretical index attaining the minimum wins.

use gmode_types::{
    GmodeError, GmodeResult, MatchedPair, ObservedSegment, TheoreticalSpectrum,
};

/// Match each observed period of `segment` against the whole spectrum.
///
/// Returns one `MatchedPair` per observed period, in observed order.
/// Fails with `InsufficientTheory` when the spectrum has fewer modes than
/// the segment.
pub fn match_segment(
    spectrum: &TheoreticalSpectrum,
    segment: &ObservedSegment,
) -> GmodeResult<Vec<MatchedPair>> {
    if spectrum.len() < segment.len() {
        return Err(GmodeError::InsufficientTheory {
            theoretical: spectrum.len(),
            observed: segment.len(),
        });
    }

    let periods = spectrum.periods();
    let orders = spectrum.orders();

    let pairs = segment
        .periods()
        .iter()
        .zip(segment.period_errors())
        .enumerate()
        .map(|(observed_index, (&p_obs, &sigma))| {
            let (j, chi_square) = closest_period(periods, p_obs, sigma);
            MatchedPair {
                observed_index,
                observed_period: p_obs,
                theoretical_index: j,
                theoretical_period: periods[j],
                radial_order: orders[j],
                chi_square,
            }
        })
        .collect();

    Ok(pairs)
}

/// Index and chi-square of the theoretical period closest to `p_obs`.
///
/// With a zero error every chi-square would be infinite (or NaN on an exact
/// hit), so the ranking falls back to the absolute difference, which orders
/// candidates identically for any positive error.
fn closest_period(periods: &[f64], p_obs: f64, sigma: f64) -> (usize, f64) {
    if sigma > 0.0 {
        let mut best = (0, chi_square(p_obs, periods[0], sigma));
        for (j, &t) in periods.iter().enumerate().skip(1) {
            let chi2 = chi_square(p_obs, t, sigma);
            if chi2 < best.1 {
                best = (j, chi2);
            }
        }
        best
    } else {
        let mut best = (0, (p_obs - periods[0]).abs());
        for (j, &t) in periods.iter().enumerate().skip(1) {
            let d = (p_obs - t).abs();
            if d < best.1 {
                best = (j, d);
            }
        }
        let chi2 = if best.1 == 0.0 { 0.0 } else { f64::INFINITY };
        (best.0, chi2)
    }
}

#[inline]
fn chi_square(observed: f64, theoretical: f64, sigma: f64) -> f64 {
    let z = (observed - theoretical) / sigma;
    z * z
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum() -> TheoreticalSpectrum {
        TheoreticalSpectrum::from_periods(vec![1.0, 1.1, 1.2, 1.3, 1.4], vec![-5, -4, -3, -2, -1])
            .unwrap()
    }

    #[test]
    fn test_closest_matches() {
        let seg = ObservedSegment::from_periods(vec![1.08, 1.22], vec![0.01, 0.01]).unwrap();
        let pairs = match_segment(&spectrum(), &seg).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].theoretical_index, 1);
        assert_eq!(pairs[0].radial_order, -4);
        assert!((pairs[0].chi_square - 4.0).abs() < 1e-9);
        assert_eq!(pairs[1].theoretical_index, 2);
        assert_eq!(pairs[1].radial_order, -3);
        assert!((pairs[1].chi_square - 4.0).abs() < 1e-9);
        assert_eq!(pairs[1].observed_index, 1);
    }

    #[test]
    fn test_tie_goes_to_first_index() {
        let s = TheoreticalSpectrum::from_periods(vec![1.0, 2.0, 3.0], vec![-1, -2, -3]).unwrap();
        let seg = ObservedSegment::from_periods(vec![1.5], vec![0.5]).unwrap();
        let pairs = match_segment(&s, &seg).unwrap();
        assert_eq!(pairs[0].theoretical_index, 0);
        assert!((pairs[0].chi_square - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_exact_halfway_goes_to_first_index() {
        // In f64, 1.05 is exactly halfway between 1.0 and 1.1: both
        // chi-squares are 25.000000000000043, so index 0 wins.
        let seg = ObservedSegment::from_periods(vec![1.05], vec![0.01]).unwrap();
        let pairs = match_segment(&spectrum(), &seg).unwrap();
        assert_eq!(
            chi_square(1.05, 1.0, 0.01).to_bits(),
            chi_square(1.05, 1.1, 0.01).to_bits()
        );
        assert_eq!(pairs[0].theoretical_index, 0);
        assert_eq!(pairs[0].radial_order, -5);
    }

    #[test]
    fn test_insufficient_theory() {
        let s = TheoreticalSpectrum::from_periods(vec![1.0, 1.1, 1.2], vec![-3, -2, -1]).unwrap();
        let seg = ObservedSegment::from_periods(vec![1.0, 1.1, 1.2, 1.3, 1.4], vec![0.01; 5])
            .unwrap();
        assert!(matches!(
            match_segment(&s, &seg),
            Err(GmodeError::InsufficientTheory {
                theoretical: 3,
                observed: 5
            })
        ));
    }

    #[test]
    fn test_zero_error_exact_hit() {
        let seg = ObservedSegment::from_periods(vec![1.3, 1.26], vec![0.0, 0.0]).unwrap();
        let pairs = match_segment(&spectrum(), &seg).unwrap();
        assert_eq!(pairs[0].theoretical_index, 3);
        assert_eq!(pairs[0].chi_square, 0.0);
        assert_eq!(pairs[1].theoretical_index, 3);
        assert!(pairs[1].chi_square.is_infinite());
    }

    #[test]
    fn test_frequency_segment_matches_on_periods() {
        // 1/1.1 c/d ↔ 1.1 d
        let seg = ObservedSegment::new(
            gmode_types::Observable::Frequency,
            vec![1.0 / 1.1],
            vec![0.001],
        )
        .unwrap();
        let pairs = match_segment(&spectrum(), &seg).unwrap();
        assert_eq!(pairs[0].theoretical_index, 1);
    }
}
