// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Bayesian Credible Region
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Credible region of the maximum-likelihood model from a table of
//! per-model merit values (reduced chi-square or Mahalanobis distance).

pub mod likelihood;
pub mod merit;
pub mod region;

pub use likelihood::Likelihood;
pub use merit::{MeritRow, MeritTable, MERIT_COLUMN};
pub use region::{
    credible_region, credible_region_files, parameter_priors, region_weights, CredibleRegion,
    ParameterPrior,
};
