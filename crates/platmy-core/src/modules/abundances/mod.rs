//! Abundance files written by the equilibrium chemistry solver.
//!
//! The first line is a fixed-width header naming the species columns; the
//! rest is a numeric matrix whose first three columns are always pressure,
//! temperature and density.

mod model;
mod parser;

use crate::domain::{ParserResult, Record};
use std::path::Path;

pub use model::columns_to_records;
pub use parser::{
    HeaderField, canonical_species_name, decode_header, parse_abundance_source,
    read_abundance_file,
};

pub(crate) const HEADER_OFFSET: usize = 21;
pub(crate) const HEADER_SLOT_WIDTH: usize = 22;
pub(crate) const INDEX_FIELD_WIDTH: usize = 3;
pub(crate) const SPECIES_ALIASES: [(&str, &str); 1] = [("C2H2,acetylene", "C2H2")];

/// Reads an abundance file straight into per-layer records.
pub fn read_abundance_records(path: &Path) -> ParserResult<Vec<Record>> {
    let table = read_abundance_file(path)?;
    Ok(columns_to_records(&table))
}
