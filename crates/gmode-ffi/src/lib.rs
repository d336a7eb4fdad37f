// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the g-mode pattern kernel.
//!
//! Exposes `PatternConfig`, `PatternEngine`, `AlignedPattern`,
//! `CredibleRegionConfig` and the mode-classification helpers.
//!
//! # FFI Conventions
//!
//! - Configuration errors, data errors and unmatched anchors raise
//!   `ValueError`; file failures raise `OSError`.
//! - Absent theoretical modes are returned as `-1`, as in the tables.
//! - All config validated before storage.
//!
//! Install: `pip install -e crates/gmode-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from gmode_kernel import PatternConfig, PatternEngine
//!
//! engine = PatternEngine(PatternConfig(observable="period"))
//! [segment] = engine.build(freqs, orders, periods, period_errors)
//! print(segment.values, segment.alignment_chi_square)
//! ```

use std::path::Path;

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use gmode_bayes::credible_region_files;
use gmode_core::{build_model_pattern, ledoux_splitting, mode_k};
use gmode_grid::PatternOrchestrator;
use gmode_types::{
    AlignedPattern, CredibleRegionConfig, GmodeError, MeritFunction, Observable, ObservedPattern,
    PatternConfig, PatternMethod, TheoreticalSpectrum,
};

fn to_py_err(e: GmodeError) -> PyErr {
    match e {
        GmodeError::Io(io) => PyIOError::new_err(io.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

fn parse_observable(value: &str) -> PyResult<Observable> {
    value.parse().map_err(to_py_err)
}

// ─── PyPatternConfig ────────────────────────────────────────────────

/// Python-visible pattern-construction configuration.
#[pyclass(name = "PatternConfig")]
#[derive(Clone)]
struct PyPatternConfig {
    inner: PatternConfig,
}

#[pymethods]
impl PyPatternConfig {
    #[new]
    #[pyo3(signature = (
        observable = "period",
        method = "chisq_longest_sequence",
        anchors = None,
        threads = 0,
        parameter_columns = None,
    ))]
    fn new(
        observable: &str,
        method: &str,
        anchors: Option<Vec<f64>>,
        threads: usize,
        parameter_columns: Option<Vec<String>>,
    ) -> PyResult<Self> {
        let method = match method {
            "chisq_longest_sequence" => PatternMethod::ChisqLongestSequence,
            "highest_amplitude" => PatternMethod::HighestAmplitude {
                anchors: anchors.unwrap_or_default(),
            },
            "highest_frequency" => PatternMethod::HighestFrequency,
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown method {other:?} (expected chisq_longest_sequence, highest_amplitude or highest_frequency)"
                )))
            }
        };
        let config = PatternConfig {
            observable: parse_observable(observable)?,
            method,
            threads,
            parameter_columns,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = PatternConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    #[getter]
    fn observable(&self) -> &'static str {
        self.inner.observable.as_str()
    }

    #[getter]
    fn method(&self) -> &'static str {
        self.inner.method.name()
    }

    fn __repr__(&self) -> String {
        format!(
            "PatternConfig(observable={}, method={}, threads={})",
            self.inner.observable,
            self.inner.method.name(),
            self.inner.threads
        )
    }
}

// ─── PyAlignedPattern ───────────────────────────────────────────────

/// Theoretical counterpart of one observed segment.
#[pyclass(name = "AlignedPattern")]
#[derive(Clone)]
struct PyAlignedPattern {
    inner: AlignedPattern,
    observable: Observable,
}

#[pymethods]
impl PyAlignedPattern {
    /// Values in the configured observable, `-1` where absent.
    #[getter]
    fn values(&self) -> Vec<f64> {
        self.inner.values_with_sentinel(self.observable)
    }

    /// Radial orders, `-1` where absent.
    #[getter]
    fn orders(&self) -> Vec<i32> {
        self.inner.orders_with_sentinel()
    }

    #[getter]
    fn alignment_chi_square(&self) -> f64 {
        self.inner.alignment_chi_square
    }

    #[getter]
    fn offset(&self) -> Option<isize> {
        self.inner.offset
    }

    #[getter]
    fn matched_count(&self) -> usize {
        self.inner.matched_count()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        dict.set_item("values", self.values())?;
        dict.set_item("orders", self.orders())?;
        dict.set_item("alignment_chi_square", self.inner.alignment_chi_square)?;
        dict.set_item("offset", self.inner.offset)?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "AlignedPattern(len={}, matched={}, offset={:?}, chi2={:.4})",
            self.inner.len(),
            self.inner.matched_count(),
            self.inner.offset,
            self.inner.alignment_chi_square
        )
    }
}

// ─── PyPatternEngine ────────────────────────────────────────────────

/// Builds theoretical patterns for single models or whole grids.
#[pyclass(name = "PatternEngine")]
struct PyPatternEngine {
    orchestrator: PatternOrchestrator,
}

#[pymethods]
impl PyPatternEngine {
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<PyPatternConfig>) -> PyResult<Self> {
        let config = config.map(|c| c.inner).unwrap_or_default();
        let orchestrator = PatternOrchestrator::new(config).map_err(to_py_err)?;
        Ok(Self { orchestrator })
    }

    /// Pattern of one model against observations that may contain `0`
    /// gap markers. Returns one `AlignedPattern` per segment.
    ///
    /// `frequencies` (c/d) and `orders` describe the model spectrum;
    /// `observed` and `errors` are in the configured observable.
    fn build(
        &self,
        frequencies: Vec<f64>,
        orders: Vec<i32>,
        observed: Vec<f64>,
        errors: Vec<f64>,
    ) -> PyResult<Vec<PyAlignedPattern>> {
        let config = self.orchestrator.config();
        let spectrum =
            TheoreticalSpectrum::from_frequencies(frequencies, orders).map_err(to_py_err)?;
        let pattern = ObservedPattern::split_on_gaps(config.observable, &observed, &errors)
            .map_err(to_py_err)?;
        let model = build_model_pattern(&spectrum, &pattern, &config.method).map_err(to_py_err)?;
        Ok(model
            .segments
            .into_iter()
            .map(|inner| PyAlignedPattern {
                inner,
                observable: config.observable,
            })
            .collect())
    }

    /// Run a whole grid table against an observation table and write
    /// the pattern table. Returns a summary dict.
    fn run_files<'py>(
        &self,
        py: Python<'py>,
        grid: &str,
        observations: &str,
        output: &str,
    ) -> PyResult<Bound<'py, PyDict>> {
        let table = py
            .allow_threads(|| {
                self.orchestrator
                    .run_files(Path::new(grid), Path::new(observations), Path::new(output))
            })
            .map_err(to_py_err)?;
        let dict = PyDict::new(py);
        dict.set_item("models", table.rows.len())?;
        dict.set_item("unmatched", table.unmatched_count())?;
        dict.set_item("columns", table.value_columns.clone())?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        let config = self.orchestrator.config();
        format!(
            "PatternEngine(observable={}, method={})",
            config.observable,
            config.method.name()
        )
    }
}

// ─── PyCredibleRegionConfig ─────────────────────────────────────────

/// Python-visible credible-region configuration.
#[pyclass(name = "CredibleRegionConfig")]
#[derive(Clone)]
struct PyCredibleRegionConfig {
    inner: CredibleRegionConfig,
}

#[pymethods]
impl PyCredibleRegionConfig {
    #[new]
    #[pyo3(signature = (
        merit_function = "CS",
        n_observables = 0,
        n_free_parameters = 0,
        free_parameters = Vec::new(),
        sigma = 2,
        ln_det_v = None,
    ))]
    fn new(
        merit_function: &str,
        n_observables: usize,
        n_free_parameters: usize,
        free_parameters: Vec<String>,
        sigma: u8,
        ln_det_v: Option<f64>,
    ) -> PyResult<Self> {
        let merit_function = match merit_function {
            "CS" => MeritFunction::ChiSquare,
            "MD" => MeritFunction::Mahalanobis,
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown merit function {other:?} (expected CS or MD)"
                )))
            }
        };
        let config = CredibleRegionConfig {
            merit_function,
            n_observables,
            n_free_parameters,
            free_parameters,
            sigma,
            ln_det_v,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = CredibleRegionConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Filter a merit table down to its credible region and write it.
    /// Returns `(n_models, probability)`.
    fn run_files(&self, input: &str, output: &str) -> PyResult<(usize, f64)> {
        let region = credible_region_files(Path::new(input), Path::new(output), &self.inner)
            .map_err(to_py_err)?;
        Ok((region.table.len(), region.probability))
    }

    fn __repr__(&self) -> String {
        format!(
            "CredibleRegionConfig(merit_function={}, sigma={}, k={})",
            self.inner.merit_function.tag(),
            self.inner.sigma,
            self.inner.n_free_parameters
        )
    }
}

// ─── Mode helpers ───────────────────────────────────────────────────

/// Mode-classification parameter k.
#[pyfunction]
#[pyo3(name = "mode_k", signature = (l, m, rossby = false))]
fn py_mode_k(l: i32, m: i32, rossby: bool) -> PyResult<i32> {
    mode_k(l, m, rossby).map_err(to_py_err)
}

/// First-order rotational splitting of frequencies in c/d.
#[pyfunction]
#[pyo3(name = "ledoux_splitting")]
fn py_ledoux_splitting(
    frequencies: Vec<f64>,
    betas: Vec<f64>,
    mass_g: f64,
    radius_cm: f64,
    omega_fraction: f64,
    m: i32,
) -> PyResult<Vec<f64>> {
    ledoux_splitting(&frequencies, &betas, mass_g, radius_cm, omega_fraction, m).map_err(to_py_err)
}

// ─── Module ─────────────────────────────────────────────────────────

#[pymodule]
fn gmode_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Pattern construction
    m.add_class::<PyPatternConfig>()?;
    m.add_class::<PyAlignedPattern>()?;
    m.add_class::<PyPatternEngine>()?;
    // Credible region
    m.add_class::<PyCredibleRegionConfig>()?;
    // Mode helpers
    m.add_function(wrap_pyfunction!(py_mode_k, m)?)?;
    m.add_function(wrap_pyfunction!(py_ledoux_splitting, m)?)?;
    Ok(())
}
