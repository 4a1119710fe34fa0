pub mod errors;

pub use errors::{
    BridgeResult, ExitMapping, ParserResult, PlatmyError, PlatmyErrorCategory, PlatmyResult,
};

use serde::Serialize;
use std::collections::BTreeMap;

pub const PRESSURE_COLUMN: &str = "P";
pub const TEMPERATURE_COLUMN: &str = "T";
pub const DENSITY_COLUMN: &str = "rho";

/// One atmospheric layer sample: pressure, temperature, density and the
/// abundance of every species the solver reported.
pub type Record = BTreeMap<String, f64>;

/// Named numeric columns that all share one row count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnTable {
    columns: BTreeMap<String, Vec<f64>>,
    row_count: usize,
}

impl ColumnTable {
    /// Builds a table, rejecting columns whose length differs from the first.
    ///
    /// A repeated name replaces the earlier column.
    pub fn from_columns<I, S>(columns: I) -> ParserResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut table = BTreeMap::new();
        let mut row_count = None;

        for (name, values) in columns {
            let name = name.into();
            match row_count {
                None => row_count = Some(values.len()),
                Some(expected) if expected != values.len() => {
                    return Err(PlatmyError::format(
                        "FORMAT.COLUMN_LENGTH",
                        format!(
                            "column '{}' has {} values but the table has {} rows",
                            name,
                            values.len(),
                            expected
                        ),
                    ));
                }
                Some(_) => {}
            }
            table.insert(name, values);
        }

        Ok(Self {
            columns: table,
            row_count: row_count.unwrap_or(0),
        })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

/// Output of one chemistry solver exchange.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChemistryResult {
    pub records: Vec<Record>,
    pub mmw: Vec<f64>,
}

impl ChemistryResult {
    pub fn layer_count(&self) -> usize {
        self.records.len()
    }

    /// Per-layer values of one column, or `None` when any record lacks it.
    pub fn profile(&self, name: &str) -> Option<Vec<f64>> {
        self.records
            .iter()
            .map(|record| record.get(name).copied())
            .collect()
    }
}
