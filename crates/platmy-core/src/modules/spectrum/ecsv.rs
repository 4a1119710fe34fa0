//! ECSV 1.0 rendering: a `#`-prefixed YAML header describing the columns and
//! metadata, then a space-delimited table.

use super::model::{SpectrumMetadata, SpectrumTable};
use crate::domain::{PlatmyError, PlatmyResult};
use serde::Serialize;

pub const ECSV_SIGNATURE: &str = "# %ECSV 1.0";
pub const WAVELENGTH_COLUMN: &str = "wl";
pub const TRANSIT_RADIUS_COLUMN: &str = "transm_rad";

#[derive(Serialize)]
struct EcsvColumn {
    name: &'static str,
    datatype: &'static str,
}

#[derive(Serialize)]
struct EcsvHeader<'a> {
    datatype: [EcsvColumn; 2],
    meta: &'a SpectrumMetadata,
    schema: &'static str,
}

pub fn render_ecsv(table: &SpectrumTable) -> PlatmyResult<String> {
    if table.wavelength.len() != table.transit_radius.len() {
        return Err(PlatmyError::format(
            "FORMAT.SPECTRUM_LENGTH",
            format!(
                "{} wavelengths but {} transit radii",
                table.wavelength.len(),
                table.transit_radius.len()
            ),
        ));
    }

    let header = EcsvHeader {
        datatype: [
            EcsvColumn {
                name: WAVELENGTH_COLUMN,
                datatype: "float64",
            },
            EcsvColumn {
                name: TRANSIT_RADIUS_COLUMN,
                datatype: "float64",
            },
        ],
        meta: &table.metadata,
        schema: "astropy-2.0",
    };
    let yaml = serde_yaml::to_string(&header).map_err(|source| {
        PlatmyError::internal(
            "INTERNAL.ECSV_HEADER",
            format!("failed to serialize ECSV header: {}", source),
        )
    })?;

    let mut rendered = String::new();
    rendered.push_str(ECSV_SIGNATURE);
    rendered.push_str("\n# ---\n");
    for line in yaml.lines() {
        rendered.push_str("# ");
        rendered.push_str(line);
        rendered.push('\n');
    }

    rendered.push_str(WAVELENGTH_COLUMN);
    rendered.push(' ');
    rendered.push_str(TRANSIT_RADIUS_COLUMN);
    rendered.push('\n');
    for (wavelength, radius) in table.wavelength.iter().zip(&table.transit_radius) {
        rendered.push_str(&format!("{wavelength} {radius}\n"));
    }

    Ok(rendered)
}
