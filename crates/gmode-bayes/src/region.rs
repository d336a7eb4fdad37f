// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Credible Region
// ─────────────────────────────────────────────────────────────────────
//! Bayesian credible region around the best model of a merit table.
//!
//! Each model is weighted by its likelihood relative to the best model
//! times the prior of its free-parameter values, where a value's prior
//! is its relative frequency in the grid. Models are taken best-first
//! until their normalised weight reaches the sigma level's probability.

use std::collections::HashMap;
use std::path::Path;

use gmode_types::{CredibleRegionConfig, GmodeError, GmodeResult};

use crate::likelihood::Likelihood;
use crate::merit::MeritTable;

/// Prior of every value of one free parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterPrior {
    pub column: usize,
    pub probabilities: HashMap<String, f64>,
}

impl ParameterPrior {
    pub fn of(&self, value: &str) -> f64 {
        self.probabilities
            .get(&value_key(value))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Cells that parse as numbers are grouped by value (`0.01` == `0.010`);
/// anything else by its text.
fn value_key(cell: &str) -> String {
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => v.to_string(),
        _ => cell.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CredibleRegion {
    /// Models inside the region, best first.
    pub table: MeritTable,
    /// Cumulative probability enclosed.
    pub probability: f64,
}

/// Relative frequency of each value of the given columns.
pub fn parameter_priors(table: &MeritTable, free_parameters: &[String]) -> GmodeResult<Vec<ParameterPrior>> {
    let n = table.len() as f64;
    free_parameters
        .iter()
        .map(|name| {
            let column = table.column_index(name)?;
            let mut counts: HashMap<String, f64> = HashMap::new();
            for row in table.rows() {
                *counts.entry(value_key(&row.cells[column])).or_insert(0.0) += 1.0;
            }
            counts.values_mut().for_each(|c| *c /= n);
            Ok(ParameterPrior {
                column,
                probabilities: counts,
            })
        })
        .collect()
}

/// Normalised posterior weight of every row, in table order.
///
/// The first row is taken as the best model.
pub fn region_weights(
    table: &MeritTable,
    likelihood: Likelihood,
    priors: &[ParameterPrior],
) -> GmodeResult<Vec<f64>> {
    let best = table
        .rows()
        .first()
        .ok_or_else(|| GmodeError::Validation("merit table is empty".to_string()))?
        .merit;

    let weights: Vec<f64> = table
        .rows()
        .iter()
        .map(|row| {
            priors
                .iter()
                .fold(likelihood.evaluate(row.merit - best), |w, prior| {
                    w * prior.of(&row.cells[prior.column])
                })
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(GmodeError::Numerical(format!(
            "total posterior weight is {total}; cannot normalise"
        )));
    }
    Ok(weights.into_iter().map(|w| w / total).collect())
}

/// Models within the configured credible region.
pub fn credible_region(table: &MeritTable, config: &CredibleRegionConfig) -> GmodeResult<CredibleRegion> {
    config.validate()?;
    let percentile = config.percentile()?;
    let likelihood = Likelihood::from_config(config)?;

    let mut sorted = table.clone();
    sorted.sort_by_merit();
    let priors = parameter_priors(&sorted, &config.free_parameters)?;
    let weights = region_weights(&sorted, likelihood, &priors)?;

    let mut cumulative = 0.0;
    let mut n = weights.len();
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative >= percentile {
            n = i + 1;
            break;
        }
    }

    log::info!(
        "{} credible region ({}σ): {n} of {} models, p={cumulative:.4}",
        config.merit_function.tag(),
        config.sigma,
        sorted.len()
    );
    Ok(CredibleRegion {
        table: sorted.head(n),
        probability: cumulative,
    })
}

/// Read a merit table, compute its credible region, write the region.
pub fn credible_region_files(
    input: &Path,
    output: &Path,
    config: &CredibleRegionConfig,
) -> GmodeResult<CredibleRegion> {
    let table = MeritTable::read_tsv(input)?;
    let region = credible_region(&table, config)?;
    region.table.write_tsv(output)?;
    log::info!("wrote credible region to {}", output.display());
    Ok(region)
}
