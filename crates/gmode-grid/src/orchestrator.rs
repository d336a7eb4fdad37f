// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Model Pattern Orchestrator
// ─────────────────────────────────────────────────────────────────────
//! Fans pattern construction out over every model of a grid.
//!
//! Configuration and observation problems stop the run before any model
//! is touched. A model whose own data cannot be matched is logged and
//! emitted as an all-absent row, so one bad model never aborts a grid.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use rayon::prelude::*;

use gmode_core::build_model_pattern;
use gmode_types::{
    GmodeError, GmodeResult, ModelPattern, Observable, ObservedPattern, PatternConfig,
    PatternMethod,
};

use crate::observations::ObservationTable;
use crate::table::{GridModel, GridTable};

/// One output row: echoed parameters and the model's pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRow {
    pub parameters: Vec<String>,
    pub pattern: ModelPattern,
}

/// Theoretical patterns of a whole grid, in grid order.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTable {
    pub observable: Observable,
    pub parameter_names: Vec<String>,
    /// `f<row>` / `f_missing`, one per observation row.
    pub value_columns: Vec<String>,
    pub rows: Vec<PatternRow>,
}

impl PatternTable {
    /// Number of rows that matched nothing at all.
    pub fn unmatched_count(&self) -> usize {
        self.rows.iter().filter(|r| r.pattern.is_unmatched()).count()
    }

    /// Write as tab-separated text, creating parent directories.
    pub fn write_tsv(&self, path: &Path) -> GmodeResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.to_writer(file)?;
        log::info!("wrote {} patterns to {}", self.rows.len(), path.display());
        Ok(())
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> GmodeResult<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);
        let table_err = |e: csv::Error| GmodeError::Table(format!("pattern table: {e}"));

        let header: Vec<&str> = self
            .parameter_names
            .iter()
            .chain(&self.value_columns)
            .map(String::as_str)
            .collect();
        wtr.write_record(&header).map_err(table_err)?;

        for row in &self.rows {
            let values = row.pattern.flatten(self.observable);
            let record: Vec<String> = row
                .parameters
                .iter()
                .cloned()
                .chain(values.iter().map(f64::to_string))
                .collect();
            wtr.write_record(&record).map_err(table_err)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

pub struct PatternOrchestrator {
    config: PatternConfig,
}

impl PatternOrchestrator {
    pub fn new(config: PatternConfig) -> GmodeResult<Self> {
        config.validate().map_err(fatal)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// Read both tables, build every model's pattern, write the result.
    pub fn run_files(&self, grid: &Path, observations: &Path, output: &Path) -> GmodeResult<PatternTable> {
        let grid = GridTable::read_tsv(grid, self.config.parameter_columns.as_deref())?;
        let observations = ObservationTable::read_tsv(observations, self.config.observable)?;
        let table = self.run(&grid, &observations)?;
        table.write_tsv(output)?;
        Ok(table)
    }

    /// Build the pattern of every grid model against the observations.
    pub fn run(&self, grid: &GridTable, observations: &ObservationTable) -> GmodeResult<PatternTable> {
        if observations.observable() != self.config.observable {
            return Err(fatal(GmodeError::Config(format!(
                "observations are in {} but the run is configured for {}",
                observations.observable(),
                self.config.observable
            ))));
        }
        let observed = observations.pattern().map_err(fatal)?;
        check_method(&self.config.method, &observed).map_err(fatal)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
            .map_err(|e| fatal(GmodeError::Config(format!("thread pool: {e}"))))?;

        log::info!(
            "building {} patterns for {} models ({} segments, {} observed modes) on {} threads",
            self.config.method.name(),
            grid.models.len(),
            observed.segments().len(),
            observed.n_modes(),
            pool.current_num_threads()
        );

        let rows = pool.install(|| {
            grid.models
                .par_iter()
                .enumerate()
                .map(|(i, model)| self.model_row(i, model, &observed))
                .collect::<GmodeResult<Vec<_>>>()
        })?;

        let table = PatternTable {
            observable: self.config.observable,
            parameter_names: grid.parameter_names.clone(),
            value_columns: observations.output_columns(),
            rows,
        };
        log::info!(
            "done: {} models, {} without any match",
            table.rows.len(),
            table.unmatched_count()
        );
        Ok(table)
    }

    fn model_row(&self, index: usize, model: &GridModel, observed: &ObservedPattern) -> GmodeResult<PatternRow> {
        let pattern = match self.model_pattern(index, model, observed) {
            Ok(p) => p,
            Err(e) if e.is_fatal() => return Err(fatal(e)),
            Err(e) => {
                log::warn!("model {index}: {e}; emitting unmatched pattern");
                ModelPattern::unmatched(observed.segments().iter().map(|s| s.len()))
            }
        };
        Ok(PatternRow {
            parameters: model.parameters.clone(),
            pattern,
        })
    }

    fn model_pattern(&self, index: usize, model: &GridModel, observed: &ObservedPattern) -> GmodeResult<ModelPattern> {
        let spectrum = model.spectrum()?;
        if !spectrum.has_unit_order_step() {
            log::warn!(
                "model {index}: radial orders are not a unit-step sequence; run direction taken from the first two orders"
            );
        }
        build_model_pattern(&spectrum, observed, &self.config.method)
    }
}

/// Method checks that depend only on the observations.
fn check_method(method: &PatternMethod, observed: &ObservedPattern) -> GmodeResult<()> {
    method.check_segment_count(observed.segments().len())?;
    if let PatternMethod::HighestAmplitude { anchors } = method {
        for (anchor, segment) in anchors.iter().zip(observed.segments()) {
            if !segment.values().contains(anchor) {
                return Err(GmodeError::AnchorNotObserved(*anchor));
            }
        }
    }
    Ok(())
}

fn fatal(e: GmodeError) -> GmodeError {
    log::error!("{e}");
    e
}
