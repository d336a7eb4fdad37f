// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Merit Table
// ─────────────────────────────────────────────────────────────────────
//! Tab-separated table of models and their merit values. Cells other
//! than the merit value are kept verbatim so a filtered table can be
//! written back unchanged.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use gmode_types::{GmodeError, GmodeResult};

/// Name of the merit-value column.
pub const MERIT_COLUMN: &str = "meritValue";

#[derive(Debug, Clone, PartialEq)]
pub struct MeritRow {
    pub cells: Vec<String>,
    pub merit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeritTable {
    columns: Vec<String>,
    rows: Vec<MeritRow>,
}

impl MeritTable {
    pub fn new(columns: Vec<String>, rows: Vec<MeritRow>) -> GmodeResult<Self> {
        if !columns.iter().any(|c| c == MERIT_COLUMN) {
            return Err(GmodeError::Table(format!("merit table has no {MERIT_COLUMN} column")));
        }
        if let Some(bad) = rows.iter().position(|r| r.cells.len() != columns.len()) {
            return Err(GmodeError::Table(format!(
                "merit row {} has {} cells for {} columns",
                bad + 1,
                rows[bad].cells.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn read_tsv(path: &Path) -> GmodeResult<Self> {
        let file = File::open(path).map_err(|e| {
            log::error!("cannot open merit table {}: {e}", path.display());
            GmodeError::Io(e)
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> GmodeResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .trim(csv::Trim::All)
            .from_reader(reader);
        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| GmodeError::Table(format!("merit header: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();
        let merit_index = columns
            .iter()
            .position(|c| c == MERIT_COLUMN)
            .ok_or_else(|| GmodeError::Table(format!("merit table has no {MERIT_COLUMN} column")))?;

        let mut rows = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record =
                record.map_err(|e| GmodeError::Table(format!("merit row {}: {e}", row + 1)))?;
            let raw = record.get(merit_index).unwrap_or_default();
            let merit: f64 = raw.parse().map_err(|_| {
                GmodeError::Table(format!("merit row {}: cannot parse {raw:?}", row + 1))
            })?;
            if !merit.is_finite() {
                return Err(GmodeError::Numerical(format!(
                    "merit row {}: non-finite merit value {merit}",
                    row + 1
                )));
            }
            rows.push(MeritRow {
                cells: record.iter().map(str::to_string).collect(),
                merit,
            });
        }
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[MeritRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> GmodeResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| GmodeError::Table(format!("merit table has no {name:?} column")))
    }

    /// Stable ascending sort on merit value.
    pub fn sort_by_merit(&mut self) {
        self.rows.sort_by(|a, b| a.merit.total_cmp(&b.merit));
    }

    /// Table with only the first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows[..n.min(self.rows.len())].to_vec(),
        }
    }

    pub fn write_tsv(&self, path: &Path) -> GmodeResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.to_writer(File::create(path)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> GmodeResult<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);
        let table_err = |e: csv::Error| GmodeError::Table(format!("merit table: {e}"));
        wtr.write_record(&self.columns).map_err(table_err)?;
        for row in &self.rows {
            wtr.write_record(&row.cells).map_err(table_err)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
