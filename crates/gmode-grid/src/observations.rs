// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Observation Table
// ─────────────────────────────────────────────────────────────────────
//! Tab-separated observations: one row per observed mode, with columns
//! `<observable>` and `<observable>_err`. A row whose value is `0` marks
//! an interruption of the pattern. Other columns (e.g. a label) are
//! ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use gmode_types::{GmodeError, GmodeResult, Observable, ObservedPattern, GAP_MARKER};

/// Output column name for a gap row.
pub const MISSING_COLUMN: &str = "f_missing";

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationTable {
    observable: Observable,
    values: Vec<f64>,
    errors: Vec<f64>,
}

impl ObservationTable {
    pub fn new(observable: Observable, values: Vec<f64>, errors: Vec<f64>) -> Self {
        Self {
            observable,
            values,
            errors,
        }
    }

    pub fn read_tsv(path: &Path, observable: Observable) -> GmodeResult<Self> {
        let file = File::open(path).map_err(|e| {
            log::error!("cannot open observations {}: {e}", path.display());
            GmodeError::Io(e)
        })?;
        Self::from_reader(file, observable)
    }

    pub fn from_reader<R: Read>(reader: R, observable: Observable) -> GmodeResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header = rdr
            .headers()
            .map_err(|e| GmodeError::Table(format!("observation header: {e}")))?
            .clone();
        let column = |name: &str| {
            header.iter().position(|h| h == name).ok_or_else(|| {
                GmodeError::Table(format!("observations have no {name:?} column"))
            })
        };
        let value_col = column(observable.as_str())?;
        let error_col = column(&observable.error_column())?;

        let mut values = Vec::new();
        let mut errors = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record
                .map_err(|e| GmodeError::Table(format!("observation row {}: {e}", row + 1)))?;
            let cell = |col: usize| -> GmodeResult<f64> {
                let raw = record.get(col).unwrap_or_default();
                raw.parse().map_err(|_| {
                    GmodeError::Table(format!(
                        "observation row {}, column {}: cannot parse {raw:?}",
                        row + 1,
                        &header[col]
                    ))
                })
            };
            values.push(cell(value_col)?);
            errors.push(cell(error_col)?);
        }

        if values.is_empty() {
            return Err(GmodeError::Table("observation table has no rows".to_string()));
        }
        Ok(Self::new(observable, values, errors))
    }

    pub fn observable(&self) -> Observable {
        self.observable
    }

    /// Number of rows, gap rows included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    /// Split the table into gap-free segments.
    pub fn pattern(&self) -> GmodeResult<ObservedPattern> {
        ObservedPattern::split_on_gaps(self.observable, &self.values, &self.errors)
    }

    /// Output column names: `f<row>` (1-based), `f_missing` for gap rows.
    pub fn output_columns(&self) -> Vec<String> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                if v == GAP_MARKER {
                    MISSING_COLUMN.to_string()
                } else {
                    format!("f{}", i + 1)
                }
            })
            .collect()
    }
}
