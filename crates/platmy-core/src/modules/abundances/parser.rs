use super::{HEADER_OFFSET, HEADER_SLOT_WIDTH, INDEX_FIELD_WIDTH, SPECIES_ALIASES};
use crate::domain::{
    ColumnTable, DENSITY_COLUMN, ParserResult, PlatmyError, PRESSURE_COLUMN, TEMPERATURE_COLUMN,
};
use crate::parser::{parse_numeric_matrix, read_text_source};
use std::path::Path;

/// A species label bound to a column of the numeric body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub species: String,
    pub column_index: usize,
}

/// Decodes the fixed-width header line of a solver abundance file.
///
/// After the first 21 characters the line is cut into 22-character slots.
/// Even slots hold a three-character column index followed by the species
/// label; odd slots carry a companion value and are skipped. A trailing
/// partial slot is ignored.
pub fn decode_header(header: &str) -> ParserResult<Vec<HeaderField>> {
    let characters: Vec<char> = header.trim_end_matches(['\r', '\n']).chars().collect();
    let slot_count = characters.len().saturating_sub(HEADER_OFFSET) / HEADER_SLOT_WIDTH;

    let mut fields = Vec::with_capacity(slot_count.div_ceil(2));
    for slot_index in (0..slot_count).step_by(2) {
        let start = HEADER_OFFSET + slot_index * HEADER_SLOT_WIDTH;
        let slot = &characters[start..start + HEADER_SLOT_WIDTH];

        let index_text: String = slot[..INDEX_FIELD_WIDTH].iter().collect();
        let column_index = index_text.trim().parse::<usize>().map_err(|_| {
            PlatmyError::format(
                "FORMAT.ABUND_HEADER",
                format!(
                    "header slot {} (offset {}) has non-numeric column index '{}'",
                    slot_index, start, index_text
                ),
            )
        })?;

        let label: String = slot[INDEX_FIELD_WIDTH..].iter().collect();
        fields.push(HeaderField {
            species: canonical_species_name(label.trim()).to_string(),
            column_index,
        });
    }

    Ok(fields)
}

pub fn canonical_species_name(label: &str) -> &str {
    SPECIES_ALIASES
        .iter()
        .find(|(alias, _)| *alias == label)
        .map_or(label, |(_, canonical)| *canonical)
}

/// Parses a complete abundance file held in memory.
pub fn parse_abundance_source(source: &str, artifact: &str) -> ParserResult<ColumnTable> {
    let mut lines = source.lines().enumerate().map(|(index, line)| (index + 1, line));
    let Some((_, header)) = lines.next() else {
        return Err(PlatmyError::format(
            "FORMAT.ABUND_EMPTY",
            format!("{} has no header line", artifact),
        ));
    };

    let fields = decode_header(header)?;
    let body = parse_numeric_matrix(lines, artifact)?;

    if body.row_count() == 0 {
        let names = [PRESSURE_COLUMN, TEMPERATURE_COLUMN, DENSITY_COLUMN]
            .into_iter()
            .map(str::to_string)
            .chain(fields.into_iter().map(|field| field.species));
        return ColumnTable::from_columns(names.map(|name| (name, Vec::new())));
    }

    let fixed = [
        (0, PRESSURE_COLUMN.to_string()),
        (1, TEMPERATURE_COLUMN.to_string()),
        (2, DENSITY_COLUMN.to_string()),
    ];
    let bindings = fixed.into_iter().chain(
        fields
            .into_iter()
            .map(|field| (field.column_index, field.species)),
    );

    let mut columns = Vec::new();
    for (column_index, name) in bindings {
        let values = body.column(column_index).ok_or_else(|| {
            PlatmyError::format(
                "FORMAT.ABUND_COLUMN",
                format!(
                    "{}: column {} for '{}' is outside the {}-column body",
                    artifact,
                    column_index,
                    name,
                    body.width()
                ),
            )
        })?;
        columns.push((name, values));
    }

    ColumnTable::from_columns(columns)
}

pub fn read_abundance_file(path: &Path) -> ParserResult<ColumnTable> {
    let source = read_text_source(path)?;
    let artifact = path.display().to_string();
    let table = parse_abundance_source(&source, &artifact)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "parsed abundance file"
    );
    Ok(table)
}
