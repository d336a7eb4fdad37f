// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Matched Pairs, Runs and Aligned Patterns
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::spectrum::Observable;

/// Table value for a mode with no theoretical counterpart.
pub const ABSENT_SENTINEL: f64 = -1.0;

/// Table radial order for a mode with no theoretical counterpart.
pub const ABSENT_ORDER: i32 = -1;

/// Table value separating two segments of an interrupted pattern.
pub const GAP_MARKER: f64 = 0.0;

/// Alignment chi-square assigned when a model cannot be matched at all.
pub const INSUFFICIENT_THEORY_CHI2: f64 = 1e16;

/// One observed period paired with its closest theoretical period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    /// Position of the observed period within its segment.
    pub observed_index: usize,
    pub observed_period: f64,
    /// Position of the matched period within the theoretical spectrum.
    pub theoretical_index: usize,
    pub theoretical_period: f64,
    pub radial_order: i32,
    pub chi_square: f64,
}

/// Maximal stretch of matched pairs with consecutive radial orders.
///
/// Borrows a contiguous slice of the matcher's output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Run<'a> {
    pairs: &'a [MatchedPair],
}

impl<'a> Run<'a> {
    pub fn new(pairs: &'a [MatchedPair]) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &'a [MatchedPair] {
        self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pair that anchors the alignment.
    pub fn first(&self) -> Option<&'a MatchedPair> {
        self.pairs.first()
    }

    /// Sum of per-pair chi-squares divided by run length.
    pub fn mean_chi_square(&self) -> f64 {
        if self.pairs.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.pairs.iter().map(|p| p.chi_square).sum();
        sum / self.pairs.len() as f64
    }
}

/// A theoretical mode placed against an observed mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedMode {
    /// Position within the theoretical spectrum.
    pub index: usize,
    pub period: f64,
    pub frequency: f64,
    pub radial_order: i32,
}

impl AlignedMode {
    pub fn value(&self, observable: Observable) -> f64 {
        match observable {
            Observable::Period => self.period,
            Observable::Frequency => self.frequency,
        }
    }
}

/// Theoretical counterpart of one observed segment.
///
/// `modes` has exactly one entry per observed mode, in observed order;
/// `None` marks an observed mode beyond the ends of the theoretical
/// spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPattern {
    pub modes: Vec<Option<AlignedMode>>,
    /// Period-spacing chi-square between observation and alignment.
    pub alignment_chi_square: f64,
    /// Theoretical index minus observed index; `None` if nothing matched.
    pub offset: Option<isize>,
}

impl AlignedPattern {
    /// Worst-case pattern for a segment that could not be matched.
    pub fn unmatched(len: usize) -> Self {
        Self {
            modes: vec![None; len],
            alignment_chi_square: INSUFFICIENT_THEORY_CHI2,
            offset: None,
        }
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn matched_count(&self) -> usize {
        self.modes.iter().filter(|m| m.is_some()).count()
    }

    /// Values in the given observable, `-1` where absent.
    pub fn values_with_sentinel(&self, observable: Observable) -> Vec<f64> {
        self.modes
            .iter()
            .map(|m| m.map_or(ABSENT_SENTINEL, |m| m.value(observable)))
            .collect()
    }

    /// Radial orders, `-1` where absent.
    pub fn orders_with_sentinel(&self) -> Vec<i32> {
        self.modes
            .iter()
            .map(|m| m.map_or(ABSENT_ORDER, |m| m.radial_order))
            .collect()
    }
}

/// All segment patterns of one model, in segment order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPattern {
    pub segments: Vec<AlignedPattern>,
}

impl ModelPattern {
    /// Pattern of `-1` values shaped like the given segment lengths.
    pub fn unmatched(segment_lengths: impl IntoIterator<Item = usize>) -> Self {
        Self {
            segments: segment_lengths
                .into_iter()
                .map(AlignedPattern::unmatched)
                .collect(),
        }
    }

    /// Flat table row: segment values joined by `0` gap markers.
    pub fn flatten(&self, observable: Observable) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.flat_len());
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(GAP_MARKER);
            }
            out.extend(segment.values_with_sentinel(observable));
        }
        out
    }

    /// Flat radial orders, `0` between segments.
    pub fn flatten_orders(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(self.flat_len());
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(0);
            }
            out.extend(segment.orders_with_sentinel());
        }
        out
    }

    fn flat_len(&self) -> usize {
        let modes: usize = self.segments.iter().map(AlignedPattern::len).sum();
        modes + self.segments.len().saturating_sub(1)
    }

    /// Whether no segment has a single theoretical counterpart.
    pub fn is_unmatched(&self) -> bool {
        self.segments.iter().all(|s| s.matched_count() == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(order: i32, chi_square: f64) -> MatchedPair {
        MatchedPair {
            observed_index: 0,
            observed_period: 1.0,
            theoretical_index: 0,
            theoretical_period: 1.0,
            radial_order: order,
            chi_square,
        }
    }

    fn mode(index: usize, period: f64, order: i32) -> AlignedMode {
        AlignedMode {
            index,
            period,
            frequency: 1.0 / period,
            radial_order: order,
        }
    }

    #[test]
    fn test_run_mean_chi_square() {
        let pairs = [pair(-3, 1.0), pair(-2, 2.0), pair(-1, 0.0)];
        let run = Run::new(&pairs);
        assert_eq!(run.len(), 3);
        assert!((run.mean_chi_square() - 1.0).abs() < 1e-12);
        assert_eq!(run.first().map(|p| p.radial_order), Some(-3));
    }

    #[test]
    fn test_unmatched_pattern() {
        let p = AlignedPattern::unmatched(3);
        assert_eq!(p.len(), 3);
        assert_eq!(p.matched_count(), 0);
        assert_eq!(p.values_with_sentinel(Observable::Period), vec![-1.0; 3]);
        assert_eq!(p.orders_with_sentinel(), vec![-1; 3]);
        assert_eq!(p.alignment_chi_square, INSUFFICIENT_THEORY_CHI2);
    }

    #[test]
    fn test_flatten_inserts_gap_markers() {
        let model = ModelPattern {
            segments: vec![
                AlignedPattern {
                    modes: vec![Some(mode(1, 1.1, -4)), None],
                    alignment_chi_square: 0.0,
                    offset: Some(1),
                },
                AlignedPattern {
                    modes: vec![Some(mode(3, 2.0, -2))],
                    alignment_chi_square: 0.0,
                    offset: Some(3),
                },
            ],
        };
        assert_eq!(model.flatten(Observable::Period), vec![1.1, -1.0, 0.0, 2.0]);
        assert_eq!(model.flatten(Observable::Frequency), vec![1.0 / 1.1, -1.0, 0.0, 0.5]);
        assert_eq!(model.flatten_orders(), vec![-4, -1, 0, -2]);
        assert!(!model.is_unmatched());
    }

    #[test]
    fn test_model_unmatched_shape() {
        let model = ModelPattern::unmatched([2, 3]);
        assert!(model.is_unmatched());
        assert_eq!(
            model.flatten(Observable::Period),
            vec![-1.0, -1.0, 0.0, -1.0, -1.0, -1.0]
        );
    }
}
