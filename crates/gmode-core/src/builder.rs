// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Pattern Builder
// ─────────────────────────────────────────────────────────────────────
//! Method dispatch: one theoretical pattern per observed segment.

use gmode_types::{
    AlignedPattern, GmodeError, GmodeResult, ModelPattern, ObservedPattern, ObservedSegment,
    PatternMethod, TheoreticalSpectrum,
};

use crate::anchored::{build_from_anchor, build_from_highest_frequency};
use crate::longest_sequence::chisq_longest_sequence;

/// Build the pattern of one segment with the given method.
///
/// `segment_index` picks the anchor for the anchor-based method.
pub fn build_segment(
    spectrum: &TheoreticalSpectrum,
    segment: &ObservedSegment,
    segment_index: usize,
    method: &PatternMethod,
) -> GmodeResult<AlignedPattern> {
    match method {
        PatternMethod::ChisqLongestSequence => chisq_longest_sequence(spectrum, segment),
        PatternMethod::HighestAmplitude { anchors } => {
            let anchor = anchors.get(segment_index).copied().ok_or(
                GmodeError::InconsistentSegmentCount {
                    anchors: anchors.len(),
                    segments: segment_index + 1,
                },
            )?;
            build_from_anchor(spectrum, segment, anchor)
        }
        PatternMethod::HighestFrequency => build_from_highest_frequency(spectrum, segment),
    }
}

/// Build the theoretical counterpart of a whole observed pattern.
///
/// A segment the spectrum is too short for becomes all-absent with the
/// worst-case chi-square; the remaining segments are still matched.
/// Any other failure aborts the model.
pub fn build_model_pattern(
    spectrum: &TheoreticalSpectrum,
    observed: &ObservedPattern,
    method: &PatternMethod,
) -> GmodeResult<ModelPattern> {
    method.check_segment_count(observed.segments().len())?;

    let mut segments = Vec::with_capacity(observed.segments().len());
    for (i, segment) in observed.segments().iter().enumerate() {
        let pattern = match build_segment(spectrum, segment, i, method) {
            Ok(p) => p,
            Err(GmodeError::InsufficientTheory {
                theoretical,
                observed,
            }) => {
                log::debug!(
                    "segment {i}: {theoretical} theoretical modes for {observed} observed, marking unmatched"
                );
                AlignedPattern::unmatched(segment.len())
            }
            Err(e) => return Err(e),
        };
        segments.push(pattern);
    }
    Ok(ModelPattern { segments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmode_types::{Observable, INSUFFICIENT_THEORY_CHI2};

    fn spectrum() -> TheoreticalSpectrum {
        TheoreticalSpectrum::from_periods(vec![1.0, 1.1, 1.2, 1.3, 1.4], vec![-5, -4, -3, -2, -1])
            .unwrap()
    }

    fn two_segments() -> ObservedPattern {
        ObservedPattern::split_on_gaps(
            Observable::Period,
            &[1.01, 1.09, 0.0, 1.31, 1.41],
            &[0.01, 0.01, 0.0, 0.01, 0.01],
        )
        .unwrap()
    }

    #[test]
    fn test_longest_sequence_per_segment() {
        let m = build_model_pattern(&spectrum(), &two_segments(), &PatternMethod::default())
            .unwrap();
        assert_eq!(m.segments.len(), 2);
        assert_eq!(m.flatten_orders(), vec![-5, -4, 0, -2, -1]);
        assert_eq!(m.flatten(Observable::Period), vec![1.0, 1.1, 0.0, 1.3, 1.4]);
    }

    #[test]
    fn test_anchor_count_mismatch_is_rejected() {
        let method = PatternMethod::HighestAmplitude {
            anchors: vec![1.01],
        };
        assert!(matches!(
            build_model_pattern(&spectrum(), &two_segments(), &method),
            Err(GmodeError::InconsistentSegmentCount {
                anchors: 1,
                segments: 2
            })
        ));
    }

    #[test]
    fn test_anchor_per_segment() {
        let method = PatternMethod::HighestAmplitude {
            anchors: vec![1.09, 1.41],
        };
        let m = build_model_pattern(&spectrum(), &two_segments(), &method).unwrap();
        assert_eq!(m.segments[0].offset, Some(0));
        assert_eq!(m.segments[1].offset, Some(3));
        assert_eq!(m.flatten_orders(), vec![-5, -4, 0, -2, -1]);
    }

    #[test]
    fn test_insufficient_segment_is_isolated() {
        let short =
            TheoreticalSpectrum::from_periods(vec![1.0, 1.1, 1.2], vec![-3, -2, -1]).unwrap();
        let observed = ObservedPattern::split_on_gaps(
            Observable::Period,
            &[1.01, 0.0, 1.1, 1.2, 1.3, 1.4],
            &[0.01, 0.0, 0.01, 0.01, 0.01, 0.01],
        )
        .unwrap();
        let m = build_model_pattern(&short, &observed, &PatternMethod::default()).unwrap();
        assert_eq!(m.segments[0].orders_with_sentinel(), vec![-3]);
        assert_eq!(m.segments[1].orders_with_sentinel(), vec![-1; 4]);
        assert_eq!(m.segments[1].alignment_chi_square, INSUFFICIENT_THEORY_CHI2);
        assert!(!m.is_unmatched());
    }

    #[test]
    fn test_highest_frequency_method() {
        let m = build_model_pattern(
            &spectrum(),
            &two_segments(),
            &PatternMethod::HighestFrequency,
        )
        .unwrap();
        assert_eq!(m.flatten_orders(), vec![-5, -4, 0, -2, -1]);
    }

    #[test]
    fn test_anchor_missing_aborts_model() {
        let method = PatternMethod::HighestAmplitude {
            anchors: vec![1.09, 1.5],
        };
        assert!(matches!(
            build_model_pattern(&spectrum(), &two_segments(), &method),
            Err(GmodeError::AnchorNotObserved(_))
        ));
    }
}
