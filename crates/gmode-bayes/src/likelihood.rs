// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Merit Likelihoods
// ─────────────────────────────────────────────────────────────────────

use std::f64::consts::PI;

use gmode_types::{CredibleRegionConfig, GmodeError, GmodeResult, MeritFunction};

/// Likelihood of a merit value relative to the best model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Likelihood {
    /// `exp(−½ x / (n − k))`
    ChiSquare { degrees_of_freedom: f64 },
    /// `exp(−½ (x + k ln 2π + ln det V))`
    Mahalanobis { k: f64, ln_det_v: f64 },
}

impl Likelihood {
    pub fn from_config(config: &CredibleRegionConfig) -> GmodeResult<Self> {
        match config.merit_function {
            MeritFunction::ChiSquare => {
                if config.n_observables <= config.n_free_parameters {
                    return Err(GmodeError::Config(format!(
                        "n_observables ({}) must exceed n_free_parameters ({})",
                        config.n_observables, config.n_free_parameters
                    )));
                }
                Ok(Likelihood::ChiSquare {
                    degrees_of_freedom: (config.n_observables - config.n_free_parameters) as f64,
                })
            }
            MeritFunction::Mahalanobis => {
                let ln_det_v = config.ln_det_v.ok_or_else(|| {
                    GmodeError::Config("ln_det_v is required for the MD merit function".to_string())
                })?;
                Ok(Likelihood::Mahalanobis {
                    k: config.n_free_parameters as f64,
                    ln_det_v,
                })
            }
        }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        match *self {
            Likelihood::ChiSquare { degrees_of_freedom } => (-0.5 * x / degrees_of_freedom).exp(),
            Likelihood::Mahalanobis { k, ln_det_v } => {
                (-0.5 * (x + k * (2.0 * PI).ln() + ln_det_v)).exp()
            }
        }
    }
}
