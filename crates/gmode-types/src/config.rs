// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{GmodeError, GmodeResult};
use crate::spectrum::Observable;

/// How a theoretical pattern is built from a model's spectrum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternMethod {
    /// Longest run of consecutive radial orders, ties broken by chi-square.
    #[default]
    ChisqLongestSequence,
    /// Build outward from a given observed mode, one anchor per segment.
    /// Anchors are expressed in the configured observable.
    HighestAmplitude { anchors: Vec<f64> },
    /// Build outward from the highest observed frequency of each segment.
    HighestFrequency,
}

impl PatternMethod {
    pub fn name(&self) -> &'static str {
        match self {
            PatternMethod::ChisqLongestSequence => "chisq_longest_sequence",
            PatternMethod::HighestAmplitude { .. } => "highest_amplitude",
            PatternMethod::HighestFrequency => "highest_frequency",
        }
    }

    /// Check the method against the number of observed segments.
    ///
    /// Only the anchor-based method cares: it needs exactly one anchor per
    /// segment.
    pub fn check_segment_count(&self, segments: usize) -> GmodeResult<()> {
        match self {
            PatternMethod::HighestAmplitude { anchors } if anchors.len() != segments => {
                Err(GmodeError::InconsistentSegmentCount {
                    anchors: anchors.len(),
                    segments,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Configuration of the pattern-construction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Observable the observations (and output) are expressed in.
    /// Default: period.
    pub observable: Observable,

    /// Pattern-building method.
    /// Default: chisq_longest_sequence.
    pub method: PatternMethod,

    /// Worker threads for the per-model fan-out (0 = one per core).
    pub threads: usize,

    /// Grid columns echoed as model parameters. `None` echoes every
    /// column that is not a radial-order column.
    pub parameter_columns: Option<Vec<String>>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            observable: Observable::Period,
            method: PatternMethod::default(),
            threads: 0,
            parameter_columns: None,
        }
    }
}

impl PatternConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> GmodeResult<()> {
        if let PatternMethod::HighestAmplitude { anchors } = &self.method {
            if anchors.is_empty() {
                return Err(GmodeError::Config(
                    "method.anchors must hold one value per observed segment, got none"
                        .to_string(),
                ));
            }
            if let Some(bad) = anchors.iter().find(|a| !a.is_finite() || **a <= 0.0) {
                return Err(GmodeError::Config(format!(
                    "method.anchors must be finite and > 0, got {bad}"
                )));
            }
        }
        if let Some(columns) = &self.parameter_columns {
            if columns.iter().any(|c| c.trim().is_empty()) {
                return Err(GmodeError::Config(
                    "parameter_columns must not contain empty names".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> GmodeResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| GmodeError::Config(format!("JSON parse error: {e}")))
    }
}

/// Merit function the table was scored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeritFunction {
    /// Reduced chi-square.
    #[serde(rename = "CS")]
    ChiSquare,
    /// Mahalanobis distance.
    #[serde(rename = "MD")]
    Mahalanobis,
}

impl MeritFunction {
    pub fn tag(&self) -> &'static str {
        match self {
            MeritFunction::ChiSquare => "CS",
            MeritFunction::Mahalanobis => "MD",
        }
    }
}

/// Configuration of the Bayesian credible-region pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredibleRegionConfig {
    /// Default: CS.
    pub merit_function: MeritFunction,

    /// Number of observables entering the merit function.
    pub n_observables: usize,

    /// Number of free model parameters (k).
    pub n_free_parameters: usize,

    /// Columns whose value frequencies form the prior.
    pub free_parameters: Vec<String>,

    /// Width of the region in standard deviations (1, 2 or 3).
    /// Default: 2.
    pub sigma: u8,

    /// ln(det V) of the variance-covariance matrix; required for MD.
    pub ln_det_v: Option<f64>,
}

impl Default for CredibleRegionConfig {
    fn default() -> Self {
        Self {
            merit_function: MeritFunction::ChiSquare,
            n_observables: 0,
            n_free_parameters: 0,
            free_parameters: Vec::new(),
            sigma: 2,
            ln_det_v: None,
        }
    }
}

impl CredibleRegionConfig {
    /// Cumulative probability enclosed by the configured sigma level.
    pub fn percentile(&self) -> GmodeResult<f64> {
        match self.sigma {
            1 => Ok(0.68),
            2 => Ok(0.95),
            3 => Ok(0.997),
            other => Err(GmodeError::Config(format!(
                "sigma must be 1, 2 or 3, got {other}"
            ))),
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> GmodeResult<()> {
        self.percentile()?;
        match self.merit_function {
            MeritFunction::ChiSquare => {
                if self.n_observables <= self.n_free_parameters {
                    return Err(GmodeError::Config(format!(
                        "n_observables must exceed n_free_parameters for CS, got {} <= {}",
                        self.n_observables, self.n_free_parameters
                    )));
                }
            }
            MeritFunction::Mahalanobis => match self.ln_det_v {
                Some(v) if v.is_finite() => {}
                Some(v) => {
                    return Err(GmodeError::Config(format!(
                        "ln_det_v must be finite, got {v}"
                    )))
                }
                None => {
                    return Err(GmodeError::Config(
                        "ln_det_v is required for the MD merit function".to_string(),
                    ))
                }
            },
        }
        if self.free_parameters.iter().any(|c| c.trim().is_empty()) {
            return Err(GmodeError::Config(
                "free_parameters must not contain empty names".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> GmodeResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| GmodeError::Config(format!("JSON parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_config_default_valid() {
        let cfg = PatternConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.observable, Observable::Period);
        assert_eq!(cfg.method, PatternMethod::ChisqLongestSequence);
    }

    #[test]
    fn test_pattern_config_from_json() {
        let cfg = PatternConfig::from_json(
            r#"{"observable": "frequency", "method": {"kind": "highest_amplitude", "anchors": [1.2, 2.4]}}"#,
        )
        .unwrap();
        assert_eq!(cfg.observable, Observable::Frequency);
        assert_eq!(
            cfg.method,
            PatternMethod::HighestAmplitude {
                anchors: vec![1.2, 2.4]
            }
        );
        assert_eq!(cfg.threads, 0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_pattern_config_invalid_observable() {
        let err = PatternConfig::from_json(r#"{"observable": "amplitude"}"#).unwrap_err();
        assert!(err.to_string().contains("amplitude"));
    }

    #[test]
    fn test_pattern_config_empty_anchors() {
        let cfg = PatternConfig {
            method: PatternMethod::HighestAmplitude { anchors: vec![] },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_segment_count_check() {
        let method = PatternMethod::HighestAmplitude {
            anchors: vec![1.0],
        };
        assert!(method.check_segment_count(1).is_ok());
        assert!(matches!(
            method.check_segment_count(2),
            Err(GmodeError::InconsistentSegmentCount {
                anchors: 1,
                segments: 2
            })
        ));
        assert!(PatternMethod::ChisqLongestSequence
            .check_segment_count(5)
            .is_ok());
    }

    #[test]
    fn test_credible_region_percentile() {
        let mut cfg = CredibleRegionConfig::default();
        assert!((cfg.percentile().unwrap() - 0.95).abs() < 1e-12);
        cfg.sigma = 4;
        assert!(cfg.percentile().is_err());
    }

    #[test]
    fn test_credible_region_validate_cs() {
        let cfg = CredibleRegionConfig {
            n_observables: 36,
            n_free_parameters: 6,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
        let bad = CredibleRegionConfig {
            n_observables: 6,
            n_free_parameters: 6,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_credible_region_validate_md_requires_det() {
        let cfg = CredibleRegionConfig {
            merit_function: MeritFunction::Mahalanobis,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        let ok = CredibleRegionConfig {
            merit_function: MeritFunction::Mahalanobis,
            ln_det_v: Some(-120.5),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_credible_region_from_json() {
        let cfg = CredibleRegionConfig::from_json(
            r#"{"merit_function": "MD", "n_free_parameters": 5, "free_parameters": ["M", "Z"], "sigma": 1, "ln_det_v": 3.5}"#,
        )
        .unwrap();
        assert_eq!(cfg.merit_function, MeritFunction::Mahalanobis);
        assert_eq!(cfg.free_parameters, vec!["M".to_string(), "Z".to_string()]);
        assert!(cfg.validate().is_ok());
    }
}
