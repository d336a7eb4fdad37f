// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Theoretical Spectra and Observed Segments
// ─────────────────────────────────────────────────────────────────────
//! Input sequences of the matching engine.
//!
//! A `TheoreticalSpectrum` holds one stellar model's modes, ordered by
//! radial order. An `ObservedPattern` holds the observed modes, already
//! split into gap-free `ObservedSegment`s. Both keep their values in the
//! observable the user asked for and expose periods for matching.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GmodeError, GmodeResult};

/// Observable used to express pulsation modes.
///
/// Periods are in days, frequencies in cycles per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Observable {
    Period,
    Frequency,
}

impl Observable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Observable::Period => "period",
            Observable::Frequency => "frequency",
        }
    }

    /// Column holding the measurement errors of this observable.
    pub fn error_column(&self) -> String {
        format!("{}_err", self.as_str())
    }
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Observable {
    type Err = GmodeError;

    fn from_str(s: &str) -> GmodeResult<Self> {
        match s {
            "period" => Ok(Observable::Period),
            "frequency" => Ok(Observable::Frequency),
            other => Err(GmodeError::InvalidObservable(other.to_string())),
        }
    }
}

impl TryFrom<String> for Observable {
    type Error = GmodeError;

    fn try_from(value: String) -> GmodeResult<Self> {
        value.parse()
    }
}

impl From<Observable> for String {
    fn from(value: Observable) -> Self {
        value.as_str().to_string()
    }
}

/// Direction in which radial order runs along a theoretical spectrum.
///
/// Inferred from the first two orders only: `Descending` when the second
/// order is exactly one below the first, `Ascending` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Orders go up by one (e.g. -5, -4, -3): |n| shrinks along the spectrum.
    Ascending,
    /// Orders go down by one (e.g. -1, -2, -3): |n| grows along the spectrum.
    Descending,
}

impl OrderDirection {
    /// Whether `next` continues a run of consecutive radial orders after `prev`.
    #[inline]
    pub fn continues(self, prev: i32, next: i32) -> bool {
        match self {
            OrderDirection::Ascending => prev.abs() == next.abs() + 1,
            OrderDirection::Descending => prev.abs() + 1 == next.abs(),
        }
    }
}

/// Ordered mode spectrum of one theoretical model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TheoreticalSpectrum {
    periods: Vec<f64>,
    frequencies: Vec<f64>,
    orders: Vec<i32>,
}

impl TheoreticalSpectrum {
    /// Build from periods (days) and their radial orders.
    pub fn from_periods(periods: Vec<f64>, orders: Vec<i32>) -> GmodeResult<Self> {
        check_spectrum(&periods, &orders, "period")?;
        let frequencies = periods.iter().map(|p| 1.0 / p).collect();
        Ok(Self {
            periods,
            frequencies,
            orders,
        })
    }

    /// Build from frequencies (cycles per day) and their radial orders.
    pub fn from_frequencies(frequencies: Vec<f64>, orders: Vec<i32>) -> GmodeResult<Self> {
        check_spectrum(&frequencies, &orders, "frequency")?;
        let periods = frequencies.iter().map(|f| 1.0 / f).collect();
        Ok(Self {
            periods,
            frequencies,
            orders,
        })
    }

    pub fn periods(&self) -> &[f64] {
        &self.periods
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn orders(&self) -> &[i32] {
        &self.orders
    }

    /// Mode values expressed in the given observable.
    pub fn values(&self, observable: Observable) -> &[f64] {
        match observable {
            Observable::Period => &self.periods,
            Observable::Frequency => &self.frequencies,
        }
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Radial-order direction from the first two orders.
    pub fn order_direction(&self) -> OrderDirection {
        match self.orders.as_slice() {
            [first, second, ..] if *second == first - 1 => OrderDirection::Descending,
            _ => OrderDirection::Ascending,
        }
    }

    /// Whether every adjacent pair of orders differs by the same unit step.
    ///
    /// `order_direction()` only looks at the first pair; this checks the
    /// whole spectrum.
    pub fn has_unit_order_step(&self) -> bool {
        let step = match self.orders.as_slice() {
            [first, second, ..] => second - first,
            _ => return true,
        };
        step.abs() == 1 && self.orders.windows(2).all(|w| w[1] - w[0] == step)
    }
}

fn check_spectrum(values: &[f64], orders: &[i32], what: &str) -> GmodeResult<()> {
    if values.is_empty() {
        return Err(GmodeError::Validation(
            "theoretical spectrum must contain at least one mode".to_string(),
        ));
    }
    if values.len() != orders.len() {
        return Err(GmodeError::Validation(format!(
            "theoretical spectrum has {} {what} values but {} radial orders",
            values.len(),
            orders.len()
        )));
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
        return Err(GmodeError::Validation(format!(
            "theoretical {what} must be finite and > 0, got {bad}"
        )));
    }
    Ok(())
}

/// One contiguous, gap-free part of an observed pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservedSegment {
    observable: Observable,
    values: Vec<f64>,
    errors: Vec<f64>,
    periods: Vec<f64>,
    period_errors: Vec<f64>,
}

impl ObservedSegment {
    /// Build from values and errors in the given observable.
    ///
    /// Frequencies are converted to periods with `P = 1/f` and
    /// `σ_P = σ_f / f²`.
    pub fn new(observable: Observable, values: Vec<f64>, errors: Vec<f64>) -> GmodeResult<Self> {
        if values.is_empty() {
            return Err(GmodeError::Validation(
                "observed segment must contain at least one mode".to_string(),
            ));
        }
        if values.len() != errors.len() {
            return Err(GmodeError::Validation(format!(
                "observed segment has {} values but {} errors",
                values.len(),
                errors.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(GmodeError::Validation(format!(
                "observed {observable} must be finite and > 0, got {bad}"
            )));
        }
        if let Some(bad) = errors.iter().find(|e| !e.is_finite() || **e < 0.0) {
            return Err(GmodeError::Validation(format!(
                "observed {observable} error must be finite and >= 0, got {bad}"
            )));
        }

        let (periods, period_errors) = match observable {
            Observable::Period => (values.clone(), errors.clone()),
            Observable::Frequency => (
                values.iter().map(|f| 1.0 / f).collect(),
                values
                    .iter()
                    .zip(&errors)
                    .map(|(f, e)| e / (f * f))
                    .collect(),
            ),
        };

        Ok(Self {
            observable,
            values,
            errors,
            periods,
            period_errors,
        })
    }

    /// Convenience constructor for period observations.
    pub fn from_periods(periods: Vec<f64>, errors: Vec<f64>) -> GmodeResult<Self> {
        Self::new(Observable::Period, periods, errors)
    }

    pub fn observable(&self) -> Observable {
        self.observable
    }

    /// Observed values in the segment's own observable.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    pub fn periods(&self) -> &[f64] {
        &self.periods
    }

    pub fn period_errors(&self) -> &[f64] {
        &self.period_errors
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the highest-frequency mode, in the segment's observable.
    ///
    /// The largest frequency, or the smallest period.
    pub fn highest_frequency_value(&self) -> f64 {
        match self.observable {
            Observable::Frequency => self.values.iter().copied().fold(f64::MIN, f64::max),
            Observable::Period => self.values.iter().copied().fold(f64::MAX, f64::min),
        }
    }
}

/// An observed pattern split at its interruptions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservedPattern {
    observable: Observable,
    segments: Vec<ObservedSegment>,
}

impl ObservedPattern {
    pub fn new(observable: Observable, segments: Vec<ObservedSegment>) -> GmodeResult<Self> {
        if segments.is_empty() {
            return Err(GmodeError::Validation(
                "observed pattern must contain at least one segment".to_string(),
            ));
        }
        if let Some(seg) = segments.iter().find(|s| s.observable() != observable) {
            return Err(GmodeError::Validation(format!(
                "segment observable {} does not match pattern observable {observable}",
                seg.observable()
            )));
        }
        Ok(Self {
            observable,
            segments,
        })
    }

    /// Split a flat observation column at gap rows (value exactly 0).
    ///
    /// Gap rows are dropped together with their error entry. A gap at the
    /// start or end, or two adjacent gaps, would leave an empty segment and
    /// is rejected.
    pub fn split_on_gaps(observable: Observable, values: &[f64], errors: &[f64]) -> GmodeResult<Self> {
        if values.len() != errors.len() {
            return Err(GmodeError::Validation(format!(
                "observation column has {} values but {} errors",
                values.len(),
                errors.len()
            )));
        }

        let mut segments = Vec::new();
        let mut current_values = Vec::new();
        let mut current_errors = Vec::new();

        for (row, (&value, &error)) in values.iter().zip(errors).enumerate() {
            if value == 0.0 {
                if current_values.is_empty() {
                    return Err(GmodeError::Validation(format!(
                        "gap at observation row {} leaves an empty segment",
                        row + 1
                    )));
                }
                segments.push(ObservedSegment::new(
                    observable,
                    std::mem::take(&mut current_values),
                    std::mem::take(&mut current_errors),
                )?);
            } else {
                current_values.push(value);
                current_errors.push(error);
            }
        }

        if current_values.is_empty() {
            return Err(GmodeError::Validation(
                "observed pattern ends with a gap or has no modes".to_string(),
            ));
        }
        segments.push(ObservedSegment::new(observable, current_values, current_errors)?);

        Self::new(observable, segments)
    }

    pub fn observable(&self) -> Observable {
        self.observable
    }

    pub fn segments(&self) -> &[ObservedSegment] {
        &self.segments
    }

    /// Total number of observed modes over all segments.
    pub fn n_modes(&self) -> usize {
        self.segments.iter().map(ObservedSegment::len).sum()
    }
}
