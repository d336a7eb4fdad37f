// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Pulsation Grid Table
// ─────────────────────────────────────────────────────────────────────
//! Tab-separated grid of theoretical models: one row per model, model
//! parameters in free-form columns, frequencies (c/d) in columns named
//! `n_pg<order>`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use gmode_types::{GmodeError, GmodeResult, TheoreticalSpectrum};

/// Prefix of radial-order columns, e.g. `n_pg-12`.
pub const ORDER_COLUMN_PREFIX: &str = "n_pg";

/// Radial order encoded in a column name, if it is an order column.
pub fn parse_order_column(name: &str) -> Option<i32> {
    name.trim().strip_prefix(ORDER_COLUMN_PREFIX)?.parse().ok()
}

/// One model of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    /// Parameter cells, verbatim, in `GridTable::parameter_names` order.
    pub parameters: Vec<String>,
    /// `(radial order, frequency)` in column order; empty cells dropped.
    pub modes: Vec<(i32, f64)>,
}

impl GridModel {
    pub fn spectrum(&self) -> GmodeResult<TheoreticalSpectrum> {
        let (orders, frequencies) = self.modes.iter().copied().unzip();
        TheoreticalSpectrum::from_frequencies(frequencies, orders)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridTable {
    pub parameter_names: Vec<String>,
    pub models: Vec<GridModel>,
}

impl GridTable {
    pub fn read_tsv(path: &Path, parameter_columns: Option<&[String]>) -> GmodeResult<Self> {
        let file = File::open(path).map_err(|e| {
            log::error!("cannot open grid table {}: {e}", path.display());
            GmodeError::Io(e)
        })?;
        Self::from_reader(file, parameter_columns)
    }

    /// Parse a grid table.
    ///
    /// `parameter_columns` restricts (and orders) the echoed parameters;
    /// `None` keeps every column that is not an order column.
    pub fn from_reader<R: Read>(reader: R, parameter_columns: Option<&[String]>) -> GmodeResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header = rdr
            .headers()
            .map_err(|e| GmodeError::Table(format!("grid header: {e}")))?
            .clone();

        let order_columns: Vec<(usize, i32)> = header
            .iter()
            .enumerate()
            .filter_map(|(i, name)| parse_order_column(name).map(|o| (i, o)))
            .collect();
        if order_columns.is_empty() {
            return Err(GmodeError::Table(format!(
                "grid has no {ORDER_COLUMN_PREFIX}<order> columns"
            )));
        }

        let parameter_indices: Vec<usize> = match parameter_columns {
            Some(wanted) => wanted
                .iter()
                .map(|name| {
                    header.iter().position(|h| h == name).ok_or_else(|| {
                        GmodeError::Table(format!("grid has no parameter column {name:?}"))
                    })
                })
                .collect::<GmodeResult<_>>()?,
            None => (0..header.len())
                .filter(|i| !order_columns.iter().any(|(j, _)| j == i))
                .collect(),
        };
        let parameter_names = parameter_indices
            .iter()
            .map(|&i| header[i].to_string())
            .collect();

        let mut models = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record =
                record.map_err(|e| GmodeError::Table(format!("grid row {}: {e}", row + 1)))?;

            let parameters = parameter_indices
                .iter()
                .map(|&i| record.get(i).unwrap_or_default().to_string())
                .collect();

            let mut modes = Vec::with_capacity(order_columns.len());
            for &(col, order) in &order_columns {
                let cell = record.get(col).unwrap_or_default();
                if cell.is_empty() {
                    continue;
                }
                let freq: f64 = cell.parse().map_err(|_| {
                    GmodeError::Table(format!(
                        "grid row {}, column {}: cannot parse {cell:?} as a frequency",
                        row + 1,
                        &header[col]
                    ))
                })?;
                // Models differ in how many modes were computed.
                if freq.is_nan() {
                    continue;
                }
                modes.push((order, freq));
            }
            models.push(GridModel { parameters, modes });
        }

        log::info!(
            "grid: {} models, {} parameters, {} order columns",
            models.len(),
            parameter_indices.len(),
            order_columns.len()
        );
        Ok(Self {
            parameter_names,
            models,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: &str = "\
M\tZ\tn_pg-1\tn_pg-2\tn_pg-3
1.5\t0.014\t2.0\t1.0\tNaN
3.0\t0.010\t1.8\t0.9\t0.6
";

    #[test]
    fn test_parse_order_column() {
        assert_eq!(parse_order_column("n_pg-12"), Some(-12));
        assert_eq!(parse_order_column("n_pg3"), Some(3));
        assert_eq!(parse_order_column("n_pgx"), None);
        assert_eq!(parse_order_column("Xc"), None);
    }

    #[test]
    fn test_read_grid() {
        let grid = GridTable::from_reader(GRID.as_bytes(), None).unwrap();
        assert_eq!(grid.parameter_names, vec!["M", "Z"]);
        assert_eq!(grid.models.len(), 2);
        assert_eq!(grid.models[0].parameters, vec!["1.5", "0.014"]);
        // NaN cell dropped
        assert_eq!(grid.models[0].modes, vec![(-1, 2.0), (-2, 1.0)]);
        assert_eq!(grid.models[1].modes.len(), 3);

        let s = grid.models[1].spectrum().unwrap();
        assert_eq!(s.orders(), &[-1, -2, -3]);
        assert!((s.periods()[2] - 1.0 / 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_parameter_columns() {
        let cols = vec!["Z".to_string()];
        let grid = GridTable::from_reader(GRID.as_bytes(), Some(&cols)).unwrap();
        assert_eq!(grid.parameter_names, vec!["Z"]);
        assert_eq!(grid.models[1].parameters, vec!["0.010"]);
    }

    #[test]
    fn test_missing_parameter_column() {
        let cols = vec!["Xc".to_string()];
        assert!(matches!(
            GridTable::from_reader(GRID.as_bytes(), Some(&cols)),
            Err(GmodeError::Table(_))
        ));
    }

    #[test]
    fn test_grid_without_order_columns() {
        let err = GridTable::from_reader("M\tZ\n1\t2\n".as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("n_pg"));
    }

    #[test]
    fn test_unparsable_frequency() {
        let bad = "M\tn_pg-1\n1\tabc\n";
        assert!(matches!(
            GridTable::from_reader(bad.as_bytes(), None),
            Err(GmodeError::Table(_))
        ));
    }

    #[test]
    fn test_empty_cells_dropped() {
        let grid = GridTable::from_reader("M\tn_pg-1\tn_pg-2\n1\t\t0.5\n".as_bytes(), None).unwrap();
        assert_eq!(grid.models[0].modes, vec![(-2, 0.5)]);
    }
}
